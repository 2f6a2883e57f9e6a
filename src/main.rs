//! skg CLI: build and analyze scholarly knowledge graphs.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use scholar_kg::builder::KnowledgeGraphBuilder;
use scholar_kg::config::BuilderConfig;
use scholar_kg::graph::opportunity::find_opportunities;
use scholar_kg::serialize::GraphFormat;

#[derive(Parser)]
#[command(name = "skg", version, about = "Scholarly knowledge graph builder")]
struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a graph from a metadata record and/or a reproducibility assessment.
    Build {
        /// Paper metadata JSON.
        #[arg(long, short = 'm')]
        metadata: Option<PathBuf>,

        /// Reproducibility assessment JSON.
        #[arg(long, short = 'r')]
        reproducibility: Option<PathBuf>,

        /// Output graph file.
        #[arg(long, short = 'o', default_value = "knowledge_graph.ttl")]
        output: PathBuf,

        /// Output format (turtle, ntriples, rdfxml, jsonld). Defaults to the
        /// output file extension, then to the configured format.
        #[arg(long, short = 'f')]
        format: Option<GraphFormat>,
    },

    /// Analyze a saved graph and print the result as JSON.
    Analyze {
        /// Graph file to load.
        #[arg(long)]
        graph: PathBuf,

        /// Input format, if the extension is ambiguous.
        #[arg(long, short = 'f')]
        format: Option<GraphFormat>,

        /// Also derive research opportunities.
        #[arg(long)]
        opportunities: bool,
    },

    /// Print headline statistics for a saved graph.
    Stats {
        /// Graph file to load.
        #[arg(long)]
        graph: PathBuf,

        /// Input format, if the extension is ambiguous.
        #[arg(long, short = 'f')]
        format: Option<GraphFormat>,
    },
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Build {
            metadata,
            reproducibility,
            output,
            format,
        } => {
            let format = format
                .or_else(|| GraphFormat::from_path(&output))
                .unwrap_or(config.format);
            let builder = KnowledgeGraphBuilder::new(config);
            builder.load_and_process_files(metadata.as_deref(), reproducibility.as_deref())?;
            builder.save(&output, format)?;

            let stats = builder.statistics();
            tracing::info!(
                triples = stats.total_triples,
                papers = stats.papers,
                authors = stats.authors,
                tools = stats.tools,
                datasets = stats.datasets,
                assessments = stats.assessments,
                "knowledge graph built"
            );
            println!("Knowledge graph built: {}", output.display());
            println!(
                "Statistics: {} triples, {} papers, {} assessments",
                stats.total_triples, stats.papers, stats.assessments
            );
        }

        Commands::Analyze {
            graph,
            format,
            opportunities,
        } => {
            let builder = KnowledgeGraphBuilder::load(config, &graph, format)?;
            let analysis = builder.analyze();
            let report = if opportunities {
                let found = find_opportunities(
                    builder.store(),
                    builder.vocabulary(),
                    &analysis,
                    &builder.config().analysis,
                );
                serde_json::json!({ "analysis": analysis, "opportunities": found })
            } else {
                serde_json::to_value(&analysis).into_diagnostic()?
            };
            println!("{}", serde_json::to_string_pretty(&report).into_diagnostic()?);
        }

        Commands::Stats { graph, format } => {
            let builder = KnowledgeGraphBuilder::load(config, &graph, format)?;
            let stats = builder.statistics();
            println!("Graph: {}", graph.display());
            println!("  triples:     {}", stats.total_triples);
            println!("  papers:      {}", stats.papers);
            println!("  authors:     {}", stats.authors);
            println!("  tools:       {}", stats.tools);
            println!("  datasets:    {}", stats.datasets);
            println!("  assessments: {}", stats.assessments);
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<BuilderConfig> {
    match path {
        Some(path) => Ok(BuilderConfig::load(path)?),
        None => Ok(BuilderConfig::default()),
    }
}
