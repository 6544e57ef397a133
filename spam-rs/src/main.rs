//! spam-rs command line
//!
//! # Usage
//!
//! ```bash
//! # Download and unpack the corpus
//! spam-rs fetch
//!
//! # Train and evaluate on an already unpacked corpus
//! spam-rs train --config spam.toml
//!
//! # Both, printing the report as JSON
//! spam-rs run --json
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use spam_rs::config::{Config, LoggingConfig};
use spam_rs::{Pipeline, PipelineReport};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "spam-rs")]
#[command(about = "Train and evaluate a spam classifier on a public corpus", long_about = None)]
struct Cli {
    /// Configuration file (TOML); defaults are used when it does not exist
    #[arg(short, long, default_value = "spam.toml")]
    config: PathBuf,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download and unpack the corpus archives
    Fetch,
    /// Train and evaluate on the unpacked corpus
    Train,
    /// Fetch, then train and evaluate
    Run,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = if cli.config.exists() {
        Config::from_file(&cli.config)
            .with_context(|| format!("loading {}", cli.config.display()))?
    } else {
        Config::default()
    };

    init_tracing(&config.logging);
    info!("Working directory: {}", config.corpus.work_dir.display());

    let pipeline = Pipeline::new(config)?;

    match cli.command {
        Commands::Fetch => {
            let entries = pipeline.fetch().await.context("fetching corpus")?;
            for entry in entries {
                println!("{}", entry);
            }
        }
        Commands::Train => {
            let report = train(&pipeline, cli.json)?;
            print_report(&report, cli.json)?;
        }
        Commands::Run => {
            let entries = pipeline.fetch().await.context("fetching corpus")?;
            info!("Fetched corpus: {} entries", entries.len());
            let report = train(&pipeline, cli.json)?;
            print_report(&report, cli.json)?;
        }
    }

    Ok(())
}

fn train(pipeline: &Pipeline, json: bool) -> anyhow::Result<PipelineReport> {
    let (dataset, counts) = pipeline.build_dataset().context("reading corpus")?;
    // The JSON report carries the counts itself
    if !json {
        println!("{}", counts);
    }

    let report = pipeline
        .train_on(&dataset, counts)
        .context("training classifier")?;
    Ok(report)
}

fn print_report(report: &PipelineReport, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print!("{}", report.evaluation.confusion);
        println!("Accuracy: {:.2}%", report.accuracy_percent());
    }
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match logging.format.as_str() {
        "json" => builder.json().init(),
        "compact" => builder.compact().init(),
        _ => builder.pretty().init(),
    }
}
