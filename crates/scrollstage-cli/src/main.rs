use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use scrollstage_core::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "scrollstage")]
#[command(author, version, about = "A section-by-section scroller for the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open a deck in the viewer (the built-in demo deck when omitted)
    Run {
        /// Deck file (TOML)
        deck: Option<PathBuf>,
        /// Start in native (continuous) scroll mode
        #[arg(long)]
        native: bool,
    },
    /// Replay a gesture trace without a terminal and print what happened
    Simulate {
        /// Trace file (JSON)
        trace: PathBuf,
        /// Take section markers from a deck file
        #[arg(short, long)]
        deck: Option<PathBuf>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the configuration
    Config {
        /// Write the defaults to the configuration file
        #[arg(long)]
        init: bool,
    },
}

fn env_filter(config: &AppConfig) -> EnvFilter {
    EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()))
}

/// Log to stderr
fn init_logging(config: &AppConfig) {
    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

/// Log to a file so the alternate screen stays clean
fn init_file_logging(config: &AppConfig) -> Result<()> {
    let log_path = config.log_path();
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&log_path)?;

    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = AppConfig::load()?;

    match cli.command {
        Some(Commands::Run { deck, native }) => {
            init_file_logging(&config)?;
            commands::run::run(Arc::new(config), deck, native).await
        }
        None => {
            init_file_logging(&config)?;
            commands::run::run(Arc::new(config), None, false).await
        }
        Some(Commands::Simulate { trace, deck, json }) => {
            init_logging(&config);
            commands::simulate::run(&config, &trace, deck.as_deref(), json)
        }
        Some(Commands::Config { init }) => {
            init_logging(&config);
            commands::config::run(&config, init)
        }
    }
}
