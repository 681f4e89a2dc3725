//! Flight fare trainer CLI
//!
//! Trains a random forest from the historical dataset and writes the model
//! artifact consumed by the service.

use anyhow::{Context, Result};
use clap::Parser;
use fare_trainer::{ForestConfig, ForestTrainer, ModelPaths, TrainingFrame};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "fare-train")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Random forest trainer for the flight fare predictor", long_about = None)]
struct Args {
    /// Historical flights CSV
    #[arg(short, long, default_value = "Clean_Dataset.csv")]
    input: PathBuf,

    /// Artifact path (defaults to model/fare_model.bin beside the dataset)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of trees
    #[arg(long, default_value = "100")]
    trees: usize,

    /// Maximum tree depth
    #[arg(long, default_value = "32")]
    max_depth: usize,

    /// Minimum samples required to split a node
    #[arg(long, default_value = "2")]
    min_samples_split: usize,

    /// Minimum samples per leaf
    #[arg(long, default_value = "1")]
    min_samples_leaf: usize,

    /// Features considered per split (all when omitted)
    #[arg(long)]
    max_features: Option<usize>,

    /// Train every tree on the full dataset
    #[arg(long)]
    no_bootstrap: bool,

    /// Random seed for bootstrap sampling
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Setup logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    info!("Flight Fare Trainer v{}", env!("CARGO_PKG_VERSION"));
    info!("═══════════════════════════════════════════");

    let paths = match args.output {
        Some(output) => ModelPaths::new(&args.input, output),
        None => ModelPaths::beside_dataset(&args.input),
    };

    info!("Loading dataset from: {}", paths.dataset.display());
    let (frame, summary) =
        TrainingFrame::from_csv(&paths.dataset).context("Failed to load dataset")?;
    info!(
        "Kept {} of {} rows ({} bad labels, {} without price)",
        summary.rows_kept, summary.rows_read, summary.skipped_labels, summary.skipped_price
    );

    let config = ForestConfig {
        n_trees: args.trees,
        max_depth: args.max_depth,
        min_samples_split: args.min_samples_split,
        min_samples_leaf: args.min_samples_leaf,
        max_features: args.max_features,
        bootstrap: !args.no_bootstrap,
        seed: args.seed,
    };

    info!("Training configuration:");
    info!("  Trees: {}", config.n_trees);
    info!("  Max depth: {}", config.max_depth);
    info!(
        "  Min samples split/leaf: {}/{}",
        config.min_samples_split, config.min_samples_leaf
    );
    info!("  Max features: {:?}", config.max_features);
    info!("  Bootstrap: {} (seed {})", config.bootstrap, config.seed);

    info!("═══════════════════════════════════════════");
    info!("Starting training...");
    let model = ForestTrainer::new(config).train(&frame)?;

    model
        .save(&paths.artifact)
        .with_context(|| format!("Failed to write {}", paths.artifact.display()))?;

    info!("═══════════════════════════════════════════");
    info!("✓ Training completed successfully");
    info!("  Version: {}", model.version);
    info!("  Features: {}", model.feature_names.len());
    info!("  Model: {}", paths.artifact.display());
    info!("  Hash: {}", model.forest.hash_hex()?);

    Ok(())
}
