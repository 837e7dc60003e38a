//! Commands module
//!
//! Defines all `piperci` commands and their handlers.

mod artifact;
mod sri;
mod store;
mod task;
mod thread;

pub use artifact::{ArtifactCommands, GetArgs, url_safe_sri};
pub use sri::{SriCommands, Verification, decode, generate, handle_sri_command, verify};
pub use store::StoreCommands;
pub use task::TaskCommands;
pub use thread::ThreadCommands;

use std::process::ExitCode;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate, verify and decode SRI strings
    Sri {
        /// Print and accept URL-safe SRIs
        #[arg(long, global = true)]
        url_safe: bool,

        #[command(subcommand)]
        command: SriCommands,
    },
    /// Task management on GMan
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },
    /// Thread status on GMan
    Thread {
        #[command(subcommand)]
        command: ThreadCommands,
    },
    /// Artifact registry on ArtMan
    Artifact {
        #[command(subcommand)]
        command: ArtifactCommands,
    },
    /// Object store
    Store {
        #[command(subcommand)]
        command: StoreCommands,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
///
/// # Returns
/// The process exit code; only `sri verify` reports failure without an error
pub async fn handle_command(command: Commands, config: &Config) -> Result<ExitCode> {
    match command {
        Commands::Sri { url_safe, command } => sri::handle_sri_command(command, url_safe),
        Commands::Task { command } => task::handle_task_command(command, config)
            .await
            .map(|()| ExitCode::SUCCESS),
        Commands::Thread { command } => thread::handle_thread_command(command, config)
            .await
            .map(|()| ExitCode::SUCCESS),
        Commands::Artifact { command } => artifact::handle_artifact_command(command, config)
            .await
            .map(|()| ExitCode::SUCCESS),
        Commands::Store { command } => store::handle_store_command(command, config)
            .await
            .map(|()| ExitCode::SUCCESS),
    }
}
