use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use swipewall_core::AppConfig;

mod commands;

use commands::simulate::SwipeDirection;

#[derive(Parser)]
#[command(name = "swipewall")]
#[command(author, version, about = "A touch-paged animated surface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file to use instead of ~/.config/swipewall/config.toml
    #[arg(short = 'c', long = "config", global = true)]
    config_path: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the scene in the terminal (drag with the left mouse button)
    Run,
    /// Replay scripted swipes headlessly and print the offsets
    Simulate {
        /// Finger direction of each swipe
        #[arg(long, value_enum, default_value_t = SwipeDirection::Left)]
        swipe: SwipeDirection,
        /// Number of swipes
        #[arg(short = 'n', long, default_value_t = 1)]
        count: u32,
        /// Surface width in pixels
        #[arg(long, default_value_t = 1080)]
        width: u32,
        /// Surface height in pixels
        #[arg(long, default_value_t = 1920)]
        height: u32,
        /// Print one JSON object per line
        #[arg(long)]
        json: bool,
    },
    /// Show the effective configuration
    Config {
        /// Write the default configuration file if none exists
        #[arg(long)]
        init: bool,
    },
}

/// Log to stderr, or to `log_file` when the terminal is taken by the scene
fn init_tracing(config: &AppConfig, log_file: Option<PathBuf>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.general.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config_path.unwrap_or_else(AppConfig::config_path);
    let config = AppConfig::load_from(&config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;

    match cli.command {
        Some(Commands::Run) | None => {
            init_tracing(&config, Some(config.log_path()))?;
            commands::run::run(&config).await
        }
        Some(Commands::Simulate {
            swipe,
            count,
            width,
            height,
            json,
        }) => {
            init_tracing(&config, None)?;
            let options = commands::simulate::SimulateOptions {
                direction: swipe,
                count,
                width,
                height,
                json,
            };
            commands::simulate::run(&config, &options).await
        }
        Some(Commands::Config { init }) => commands::config::run(&config, &config_path, init),
    }
}
