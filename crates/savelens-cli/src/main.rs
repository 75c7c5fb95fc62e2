mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use savelens_core::{EngineConfig, load_config};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "savelens")]
#[command(about = "Find and edit game values in save files", long_about = None)]
struct Cli {
    /// Engine configuration (JSON); defaults are used if missing or invalid
    #[arg(short, long, global = true, env = "SAVELENS_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect likely game values in a save file
    Analyze {
        /// Path to the save file
        file: PathBuf,

        /// Print the full analysis as JSON
        #[arg(long)]
        json: bool,

        /// Show at most this many candidates
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Change one detected value in place
    Rewrite {
        /// Path to the save file
        file: PathBuf,

        /// Candidate key as printed by `analyze`
        #[arg(short, long)]
        key: String,

        /// Candidate location (e.g. "Line 3" or "Offset 16") when the key is ambiguous
        #[arg(short = 'L', long)]
        location: Option<String>,

        /// New value text
        #[arg(short, long)]
        value: String,
    },

    /// Check whether a value is acceptable for a data type
    Validate {
        value: String,

        /// INTEGER, FLOAT, BOOLEAN or STRING
        #[arg(short = 't', long = "type")]
        data_type: String,
    },
}

fn engine_config(path: Option<&Path>) -> EngineConfig {
    let Some(path) = path else {
        return EngineConfig::default();
    };
    match load_config(path) {
        Ok(config) => {
            info!("Loaded config from {:?}", path);
            config
        }
        Err(e) => {
            warn!("Failed to load config: {}, using defaults", e);
            EngineConfig::default()
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("savelens=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze { file, json, limit } => {
            let config = engine_config(cli.config.as_deref());
            commands::analyze::run(config, &file, json, limit)
        }
        Commands::Rewrite {
            file,
            key,
            location,
            value,
        } => {
            let config = engine_config(cli.config.as_deref());
            commands::rewrite::run(config, &file, &key, location.as_deref(), &value)
        }
        Commands::Validate { value, data_type } => commands::validate::run(&value, &data_type),
    }
}
