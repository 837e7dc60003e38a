//! Artifact command handlers
//!
//! SRI arguments may be given in either form; a plain `sha256-...` string
//! is converted to the URL-safe form ArtMan expects in paths.

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::*;
use piperci_client::{ArtManClient, ArtifactLookup, ExistsLookup};
use piperci_core::domain::artifact::Artifact;
use piperci_core::dto::artifact::NewArtifact;
use piperci_sri::Digest;
use tracing::debug;

use crate::config::Config;

/// Artifact subcommands
#[derive(Subcommand, Debug)]
pub enum ArtifactCommands {
    /// Fetch artifact records by exactly one identifier
    Get(GetArgs),
    /// Check whether an artifact is registered for an SRI or task
    Exists {
        #[arg(long)]
        sri: Option<String>,

        #[arg(long)]
        task_id: Option<String>,
    },
    /// Show the status of one artifact
    Status { artifact_id: String },
    /// Register a stored object as an artifact of a task
    Post {
        #[arg(long)]
        task_id: String,

        /// Storage location (e.g., minio://host/bucket/object)
        #[arg(long)]
        uri: String,

        /// SRI of the content (`sha256-...`)
        #[arg(long)]
        sri: String,

        #[arg(long)]
        caller: String,
    },
}

#[derive(Args, Debug)]
pub struct GetArgs {
    #[arg(long)]
    pub sri: Option<String>,

    #[arg(long)]
    pub artifact_id: Option<String>,

    #[arg(long)]
    pub task_id: Option<String>,

    /// Every artifact of every task in the thread
    #[arg(long)]
    pub thread_id: Option<String>,

    /// Only show artifacts registered by this caller
    #[arg(long)]
    pub caller: Option<String>,
}

/// Handle artifact commands
///
/// Lookup arguments are validated before any request is made.
pub async fn handle_artifact_command(command: ArtifactCommands, config: &Config) -> Result<()> {
    let client = config.artman();

    match command {
        ArtifactCommands::Get(args) => get_artifacts(&client, args).await,
        ArtifactCommands::Exists { sri, task_id } => {
            let lookup = ExistsLookup::from_options(sri.map(|s| url_safe_sri(&s)), task_id)?;
            artifact_exists(&client, &lookup).await
        }
        ArtifactCommands::Status { artifact_id } => artifact_status(&client, &artifact_id).await,
        ArtifactCommands::Post {
            task_id,
            uri,
            sri,
            caller,
        } => post_artifact(&client, NewArtifact::new(task_id, uri, sri, caller)).await,
    }
}

/// Accept an SRI in either form and return the URL-safe one
pub fn url_safe_sri(sri: &str) -> String {
    match sri.parse::<Digest>() {
        Ok(digest) => digest.to_url_safe(),
        Err(_) => sri.to_string(),
    }
}

async fn get_artifacts(client: &ArtManClient, args: GetArgs) -> Result<()> {
    let lookup = ArtifactLookup::from_options(
        args.sri.map(|s| url_safe_sri(&s)),
        args.artifact_id,
        args.task_id,
        args.thread_id,
    )?;
    debug!("Looking up artifacts by {:?}", lookup);

    let caller = args.caller;
    let by_caller = |artifact: &Artifact| {
        caller
            .as_deref()
            .is_none_or(|c| artifact.caller.as_deref() == Some(c))
    };
    let artifacts = client.get_artifacts(&lookup, Some(&by_caller)).await?;

    if artifacts.is_empty() {
        println!("{}", "No artifacts found.".yellow());
        return Ok(());
    }

    println!("{}", format!("Found {} artifact(s):", artifacts.len()).bold());
    println!();
    for artifact in &artifacts {
        print_artifact(artifact);
    }

    Ok(())
}

async fn artifact_exists(client: &ArtManClient, lookup: &ExistsLookup) -> Result<()> {
    if client.artifact_exists(lookup).await? {
        println!("{}", "Artifact exists".green());
    } else {
        println!("{}", "No artifact found".yellow());
    }

    Ok(())
}

async fn artifact_status(client: &ArtManClient, artifact_id: &str) -> Result<()> {
    let status = client.artifact_status(artifact_id).await?;
    println!("{}: {}", artifact_id.bold(), status);
    Ok(())
}

async fn post_artifact(client: &ArtManClient, artifact: NewArtifact) -> Result<()> {
    let created = client.post_artifact(artifact).await?;

    println!("{}", "✓ Artifact registered".green().bold());
    println!();
    print_artifact(&created);

    Ok(())
}

fn print_artifact(artifact: &Artifact) {
    println!(
        "  {} Artifact {}",
        "▸".cyan(),
        artifact.artifact_id.as_deref().unwrap_or("-").bold()
    );
    println!("    URI:    {}", artifact.uri);
    println!("    SRI:    {}", artifact.sri);
    println!("    Type:   {}", artifact.artifact_type);
    if let Some(status) = &artifact.status {
        println!("    Status: {}", status);
    }
    if let Some(caller) = &artifact.caller {
        println!("    Caller: {}", caller);
    }
    if let Some(task) = &artifact.task {
        println!("    Task:   {}", task.task_id.dimmed());
    }
    println!();
}
