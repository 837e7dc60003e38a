//! Object store command handlers

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use futures_util::TryStreamExt;
use piperci_storage::{ObjectInfo, StorageClient, StorageUri};

use crate::config::Config;

/// Store subcommands
#[derive(Subcommand, Debug)]
pub enum StoreCommands {
    /// Upload a file, creating the bucket if needed
    Upload {
        bucket: String,
        object: String,
        file: PathBuf,
    },
    /// Download an object by its minio:// URI
    Download { uri: String, file: PathBuf },
    /// Show an object's metadata
    Stat { bucket: String, object: String },
    /// List objects in a bucket
    List {
        bucket: String,

        #[arg(long)]
        prefix: Option<String>,

        /// Descend into pseudo-directories
        #[arg(short, long)]
        recursive: bool,
    },
}

/// Handle store commands
///
/// `download` URIs are validated before storage settings are read.
pub async fn handle_store_command(command: StoreCommands, config: &Config) -> Result<()> {
    if let StoreCommands::Download { uri, .. } = &command {
        StorageUri::parse(uri)?;
    }

    let storage = config.storage()?;

    match command {
        StoreCommands::Upload {
            bucket,
            object,
            file,
        } => {
            let info = storage
                .provision_and_upload(&bucket, &object, &file)
                .await
                .with_context(|| format!("Failed to upload {}", file.display()))?;

            println!("{}", "✓ Uploaded".green().bold());
            print_object(&info);
            Ok(())
        }
        StoreCommands::Download { uri, file } => {
            storage
                .download(&uri, &file)
                .await
                .with_context(|| format!("Failed to download {}", uri))?;

            println!("{} {} -> {}", "✓".green().bold(), uri, file.display());
            Ok(())
        }
        StoreCommands::Stat { bucket, object } => {
            print_object(&storage.stat(&bucket, &object).await?);
            Ok(())
        }
        StoreCommands::List {
            bucket,
            prefix,
            recursive,
        } => list_objects(&storage, &bucket, prefix.as_deref(), recursive).await,
    }
}

async fn list_objects(
    storage: &StorageClient,
    bucket: &str,
    prefix: Option<&str>,
    recursive: bool,
) -> Result<()> {
    let mut objects = storage.list_objects(bucket, prefix, recursive);
    let mut count = 0;

    while let Some(object) = objects.try_next().await? {
        count += 1;
        if object.is_dir {
            println!("  {} {}", "DIR".blue(), object.name.bold());
        } else {
            println!(
                "  {:>12} {} {}",
                object.size,
                object.last_modified.as_deref().unwrap_or("-").dimmed(),
                object.name
            );
        }
    }

    if count == 0 {
        println!("{}", "No objects found.".yellow());
    }

    Ok(())
}

fn print_object(info: &ObjectInfo) {
    println!("  {} {}/{}", "▸".cyan(), info.bucket, info.name.bold());
    println!("    Size:     {} bytes", info.size);
    println!("    ETag:     {}", info.etag.as_deref().unwrap_or("-"));
    println!(
        "    Modified: {}",
        info.last_modified.as_deref().unwrap_or("-").dimmed()
    );
}
