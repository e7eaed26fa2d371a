//! `ntc`: bus seat reservations from the terminal.
//!
//! Parses the command line, loads configuration, sets up logging, and
//! hands off to the CLI dispatcher.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use ntc_cli::Cli;
use ntc_core::config::ClientConfig;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ClientConfig::load(&cli.config_dir, &cli.profile) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::debug!(
        profile = %cli.profile,
        base_url = %config.api.base_url,
        "Configuration loaded"
    );

    if cli.execute(&config).await.is_err() {
        std::process::exit(1);
    }
}

/// Initialize tracing/logging on stderr so command output stays clean
fn init_logging(config: &ClientConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
