use std::fs::{self, OpenOptions};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sortscope_core::{AppConfig, Algorithm};

mod commands;

#[derive(Parser)]
#[command(name = "sortscope")]
#[command(author, version, about = "A terminal sorting-algorithm visualizer")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the TUI
    Run,
    /// Print the animation steps an algorithm produces for an array
    Steps {
        /// Algorithm id (bubble, selection, insertion, merge, quick)
        #[arg(short = 'a', long)]
        algorithm: Algorithm,
        /// Comma-separated values, e.g. 5,3,8,1
        #[arg(short = 'v', long, allow_hyphen_values = true)]
        values: String,
        /// Emit JSON instead of one step per line
        #[arg(long)]
        json: bool,
    },
    /// Play an algorithm headless, logging every step
    Play {
        /// Algorithm id (bubble, selection, insertion, merge, quick)
        #[arg(short = 'a', long)]
        algorithm: Algorithm,
        /// Comma-separated values; a random array is used when omitted
        #[arg(short = 'v', long, allow_hyphen_values = true)]
        values: Option<String>,
        /// Length of the random array
        #[arg(long)]
        size: Option<usize>,
        /// Speed slider value (10 = slowest, 500 = fastest)
        #[arg(long)]
        speed: Option<u32>,
    },
    /// Ask the advisor to explain an algorithm
    Explain {
        #[arg(short = 'a', long)]
        algorithm: Algorithm,
    },
    /// Ask the advisor for a quiz about an algorithm
    Quiz {
        #[arg(short = 'a', long)]
        algorithm: Algorithm,
    },
    /// Show config and log locations
    Config {
        /// Write the default config file if none exists
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Arc::new(AppConfig::load()?);

    let command = cli.command.unwrap_or(Commands::Run);
    init_logging(&config, matches!(command, Commands::Run))?;

    match command {
        Commands::Run => commands::run::run(config).await,
        Commands::Steps {
            algorithm,
            values,
            json,
        } => commands::steps::run(algorithm, &values, json),
        Commands::Play {
            algorithm,
            values,
            size,
            speed,
        } => commands::play::run(&config, algorithm, values.as_deref(), size, speed).await,
        Commands::Explain { algorithm } => commands::advise::explain(&config, algorithm).await,
        Commands::Quiz { algorithm } => commands::advise::quiz(&config, algorithm).await,
        Commands::Config { init } => commands::config::run(&config, init),
    }
}

/// Initialize logging. RUST_LOG wins over the configured level.
fn init_logging(config: &AppConfig, to_file: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    if to_file {
        // The terminal belongs to the TUI
        let log_path = config.log_path();
        if let Some(parent) = log_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&log_path)?;
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
    Ok(())
}
