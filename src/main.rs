// Command-line entry point for Lifetrace.

use anyhow::{Context, Result};
use clap::Parser;
use lifetrace::application::{RecordUsecase, Scenario};
use lifetrace::config::{RecorderConfig, RecorderKind};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Demonstration scenario to record
    #[arg(short, long, value_enum, default_value = "move-check")]
    scenario: Scenario,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output file path (overrides config)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (overrides config)
    #[arg(short, long, value_enum)]
    format: Option<RecorderKind>,

    /// Graph layout direction, e.g. TB or LR
    #[arg(long)]
    rankdir: Option<String>,

    /// Also write a JSON summary of the graph
    #[arg(long)]
    summary: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => RecorderConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => RecorderConfig::default(),
    };
    if let Some(output) = cli.output {
        config.output = output;
    }
    if let Some(kind) = cli.format {
        config.kind = kind;
    }
    if cli.rankdir.is_some() {
        config.rankdir = cli.rankdir;
    }
    if cli.summary.is_some() {
        config.summary = cli.summary;
    }

    let usecase = RecordUsecase { config: &config };
    let snapshot = usecase
        .run(cli.scenario)
        .with_context(|| format!("Failed to record {:?}", cli.scenario))?;

    match snapshot {
        Some(graph) => println!(
            "Recording completed! {} nodes, {} edges written to {}",
            graph.nodes.len(),
            graph.edges.len(),
            config.output.display()
        ),
        None => println!("Recording completed! Output written to {}", config.output.display()),
    }
    Ok(())
}
