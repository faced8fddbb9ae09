// ABOUTME: CLI entry point that aggregates host SSH public keys into a lab authorized_keys file
// ABOUTME: Loads configuration, prepares the lab directory, and runs the aggregation pass

use anyhow::{Context, Result};
use clap::Parser;
use labkeys::{Config, KeyAggregator, LabPaths};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "labkeys",
    version,
    about = "Aggregate host SSH public keys into a lab authorized_keys file"
)]
struct Cli {
    /// Lab directory that receives the authorized_keys artifact
    lab_dir: PathBuf,

    /// Alternate configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let mut config = load_config(cli.config.as_deref())?;
    config.expand_paths()?;
    config.validate()?;

    // Caller-owned step: the aggregator assumes the parent directory exists
    fs::create_dir_all(&cli.lab_dir)
        .with_context(|| format!("Failed to create lab directory: {}", cli.lab_dir.display()))?;

    let paths = LabPaths::new(&cli.lab_dir);
    let destination = paths.authorized_keys_file();

    KeyAggregator::from_config(&config.keys)
        .build(&destination)
        .with_context(|| format!("Failed to build {}", destination.display()))?;

    if destination.exists() {
        tracing::info!("authorized_keys artifact ready at {}", destination.display());
    } else {
        tracing::info!("no public keys found, nothing to aggregate");
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        return Config::load_from_file(path);
    }

    let default_path = Config::default_config_path()?;
    if default_path.exists() {
        Config::load_from_file(&default_path)
    } else {
        Ok(Config::default())
    }
}
