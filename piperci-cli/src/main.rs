//! PiperCI CLI
//!
//! Command-line interface for GMan, ArtMan and the artifact object store.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use piperci_cli::commands::{Commands, handle_command};
use piperci_cli::config::Config;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "piperci")]
#[command(about = "PiperCI task, artifact and storage CLI", long_about = None)]
struct Cli {
    /// GMan URL
    #[arg(long, env = "PIPERCI_GMAN_URL", default_value = "http://localhost:8089")]
    gman_url: String,

    /// ArtMan URL
    #[arg(long, env = "PIPERCI_ARTMAN_URL", default_value = "http://localhost:8090")]
    artman_url: String,

    /// Object store endpoint (e.g., http://localhost:9000)
    #[arg(long, env = "PIPERCI_STORAGE_URL")]
    storage_url: Option<String>,

    #[arg(long, env = "PIPERCI_STORAGE_ACCESS_KEY")]
    storage_access_key: Option<String>,

    #[arg(long, env = "PIPERCI_STORAGE_SECRET_KEY", hide_env_values = true)]
    storage_secret_key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    piperci_cli::init_logging(piperci_cli::PIPERCI_LOG_DIRECTIVE);

    let cli = Cli::parse();

    let config = Config {
        gman_url: cli.gman_url,
        artman_url: cli.artman_url,
        storage_url: cli.storage_url,
        storage_access_key: cli.storage_access_key,
        storage_secret_key: cli.storage_secret_key,
    };
    config.validate()?;
    debug!(
        "Loaded configuration: gman_url={}, artman_url={}",
        config.gman_url, config.artman_url
    );

    handle_command(cli.command, &config).await
}
