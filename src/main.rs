mod commands;
mod config;
mod conversation;
mod error;
mod events;
mod export;
mod session;
mod storage;
mod transport;
mod ui;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[derive(Parser)]
#[command(name = "relie")]
#[command(version = "0.1.0")]
#[command(about = "Chat with the Relie support assistant from your terminal", long_about = None)]
struct Cli {
    /// Read configuration from this file instead of ~/.relie/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Chat endpoint to POST messages to
    #[arg(long, global = true)]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List saved conversations
    History,
    /// Write a saved conversation's transcript to disk
    Export {
        /// Conversation id as shown by `relie history`
        id: String,
        /// Output file (defaults to relie_chat.txt in the download directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Send logs to ~/.relie/relie.log; the terminal belongs to the UI
fn init_logging(config: &Config) -> Result<()> {
    fs::create_dir_all(&config.relie_home)
        .context("Failed to create .relie directory")?;
    let log_file = fs::File::create(config.relie_home.join("relie.log"))
        .context("Failed to create log file")?;

    let filter = EnvFilter::try_from_env("RELIE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(endpoint) = cli.endpoint {
        config.set_endpoint(endpoint);
    }

    init_logging(&config)?;

    match cli.command {
        None => commands::start_chat(config).await,
        Some(Commands::History) => commands::list_history(&config),
        Some(Commands::Export { id, output }) => commands::export_history(&config, &id, output),
    }
}
