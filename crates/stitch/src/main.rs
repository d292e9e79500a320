//! Stitch CLI - side-by-side comparison montages from per-camera photo directories.
//!
//! Give Stitch a directory with one subdirectory per camera model, each with
//! the same number of photos. It writes one JPEG per photo index into a
//! `Results` directory, the models' shots next to each other.
//!
//! # Usage
//!
//! ```bash
//! # Build montages for every row
//! stitch run ./shootout
//!
//! # Crop mode, blind comparison
//! stitch run ./shootout --mode crop --crop-size 600 --shuffle
//!
//! # View configuration
//! stitch config show
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;
mod logging;

/// Stitch - side-by-side comparison montages from per-camera photo directories.
#[derive(Parser, Debug)]
#[command(name = "stitch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Config file to use instead of the default location
    #[arg(short, long, global = true, env = "STITCH_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Build comparison montages for a directory of model folders
    Run(cli::run::RunArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref().map(cli::expand_path);

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match &config_path {
        Some(path) => stitch_core::Config::load_from(path)?,
        None => match stitch_core::Config::load() {
            Ok(config) => config,
            Err(e) => {
                eprintln!(
                    "Warning: Failed to load config: {e}\n  \
                     Using default configuration. Check your config file with `stitch config path`."
                );
                stitch_core::Config::default()
            }
        },
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Stitch v{}", stitch_core::VERSION);

    match cli.command {
        Commands::Run(args) => cli::run::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args, config, config_path).await,
    }
}
