//! CLI module for the fruit classifier
//!
//! - `serve`: run the HTTP server
//! - `check`: validate configuration and the classifier, then exit

pub mod check;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Fruit Classifier - authenticated fruit image classification
#[derive(Parser)]
#[command(name = "fruit-classifier")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve,

    /// Load the configuration and classifier, run the startup checks and exit
    Check,
}

/// Load `.env`, the layered configuration and the global subscriber
fn bootstrap() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging);

    Ok(config)
}
