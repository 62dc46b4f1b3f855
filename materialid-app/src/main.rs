use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use materialid_core::LiveClassifier;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod config;
mod workflow;

/// Infers product materials from titles and free-text material hints.
#[derive(Debug, Parser)]
#[command(name = "materialid", version, about)]
struct Cli {
    /// Taxonomy file (.yaml, .yml, .json) or directory. Defaults to the bundled taxonomy.
    #[arg(long, global = true)]
    taxonomy: Option<PathBuf>,

    /// Optional YAML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Classify a single product.
    Classify {
        #[arg(long)]
        title: String,
        #[arg(long)]
        hint: Option<String>,
        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Classify every row of one or more `title,material_hint` CSV files.
    Batch {
        /// Input file; repeat the flag for several files.
        #[arg(long = "input", required = true)]
        inputs: Vec<PathBuf>,
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// List materials related to MATERIAL.
    Related { material: String },
    /// Load and validate the taxonomy, then print its statistics.
    Validate,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let output_override = match &cli.command {
        Command::Batch { output_dir, .. } => output_dir.clone(),
        _ => None,
    };
    let config = config::AppConfig::load(cli.config.as_deref())?.with_overrides(cli.taxonomy.clone(), output_override);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    let store = config.taxonomy_store()?;
    let live = LiveClassifier::new(store).context("Failed to build the classifier")?;
    let classifier = live.current();

    match cli.command {
        Command::Classify { title, hint, json } => workflow::run_classify(&classifier, &title, hint.as_deref(), json)?,
        Command::Batch { inputs, .. } => {
            let run_dir = workflow::run_batch(&live, &inputs, &config.output_dir)?;
            println!("\nBatch classification complete. Results are in '{}'", run_dir.display());
        }
        Command::Related { material } => workflow::run_related(&classifier, &material),
        Command::Validate => workflow::run_validate(classifier.taxonomy())?,
    }

    Ok(())
}
