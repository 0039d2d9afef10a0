use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use glide_core::AppConfig;

mod commands;
mod scenario;
mod site;

#[derive(Parser)]
#[command(name = "glide")]
#[command(author, version, about = "Headless driver for the Glide motion layer")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Use this config file instead of ~/.config/glide/config.toml
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a navigation/scroll scenario through the frame loop
    Simulate {
        /// Scenario TOML file (built-in rapid navigation burst if omitted)
        #[arg(short = 's', long)]
        scenario: Option<PathBuf>,
        /// Force the reduced-motion preference on
        #[arg(long)]
        reduced: bool,
        /// Print frames as JSON lines
        #[arg(long)]
        json: bool,
        /// Print every frame, not just frames with transition events
        #[arg(long)]
        every_frame: bool,
    },
    /// Print the effective configuration
    Config {
        /// Write the effective configuration to the config path
        #[arg(long)]
        write: bool,
    },
    /// Show the resolved reduced-motion preference
    Motion,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match cli.command {
        Some(Commands::Simulate {
            scenario,
            reduced,
            json,
            every_frame,
        }) => {
            let options = commands::simulate::Options {
                scenario,
                reduced,
                json,
                every_frame,
            };
            commands::simulate::run(config, options).await
        }
        Some(Commands::Config { write }) => commands::config::run(&config, write),
        Some(Commands::Motion) | None => commands::motion::run(&config),
    }
}
