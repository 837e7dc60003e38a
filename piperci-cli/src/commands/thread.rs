//! Thread command handlers

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use piperci_client::{DEFAULT_MAX_ATTEMPTS, GManClient};
use piperci_core::domain::task::{Task, TaskEvent};

use super::task::print_event;
use crate::config::Config;

/// Thread subcommands
#[derive(Subcommand, Debug)]
pub enum ThreadCommands {
    /// List the tasks of a thread
    Tasks {
        thread_id: String,

        /// Only show tasks created by this caller
        #[arg(long)]
        caller: Option<String>,
    },
    /// List the events of every task in a thread
    Events { thread_id: String },
    /// Show running, completed, pending and failed counts
    Status { thread_id: String },
    /// Block until every task in the thread has completed
    Wait {
        thread_id: String,

        #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
        max_attempts: u32,
    },
}

/// Handle thread commands
pub async fn handle_thread_command(command: ThreadCommands, config: &Config) -> Result<()> {
    let client = config.gman();

    match command {
        ThreadCommands::Tasks { thread_id, caller } => {
            list_tasks(&client, &thread_id, caller.as_deref()).await
        }
        ThreadCommands::Events { thread_id } => list_events(&client, &thread_id).await,
        ThreadCommands::Status { thread_id } => show_status(&client, &thread_id).await,
        ThreadCommands::Wait {
            thread_id,
            max_attempts,
        } => wait_for_thread(&client, &thread_id, max_attempts).await,
    }
}

async fn list_tasks(client: &GManClient, thread_id: &str, caller: Option<&str>) -> Result<()> {
    let by_caller = |task: &Task| caller.is_none_or(|c| task.caller == c);
    let tasks = client.get_thread_tasks(thread_id, Some(&by_caller)).await?;

    if tasks.is_empty() {
        println!("{}", "No tasks found.".yellow());
        return Ok(());
    }

    println!("{}", format!("Found {} task(s):", tasks.len()).bold());
    println!();
    for task in tasks {
        println!("  {} Task {}", "▸".cyan(), task.task_id.bold());
        println!("    Project: {}", task.project);
        println!("    Caller:  {}", task.caller);
        println!("    Run:     {}", task.run_id.dimmed());
        if let Some(parent_id) = &task.parent_id {
            println!("    Parent:  {}", parent_id.dimmed());
        }
        println!();
    }

    Ok(())
}

async fn list_events(client: &GManClient, thread_id: &str) -> Result<()> {
    let events: Vec<TaskEvent> = client.get_thread_events(thread_id, None).await?;

    if events.is_empty() {
        println!("{}", "No events found.".yellow());
    } else {
        println!("{}", format!("Found {} event(s):", events.len()).bold());
        println!();
        for event in &events {
            print_event(event);
        }
    }

    Ok(())
}

async fn show_status(client: &GManClient, thread_id: &str) -> Result<()> {
    let status = client.thread_status(thread_id).await?;

    println!("{}", format!("Thread {}", thread_id).bold());
    println!("  Running:   {}", status.running.to_string().yellow());
    println!("  Pending:   {}", status.pending.to_string().blue());
    println!("  Completed: {}", status.completed.to_string().green());
    println!("  Failed:    {}", status.failed.to_string().red());

    if status.has_failures() {
        println!("{}", "Thread has failures".red().bold());
    } else if status.is_complete() {
        println!("{}", "Thread complete".green().bold());
    }

    Ok(())
}

async fn wait_for_thread(client: &GManClient, thread_id: &str, max_attempts: u32) -> Result<()> {
    println!("Waiting for thread {} to complete...", thread_id.bold());

    client
        .wait_for_thread_complete(thread_id, max_attempts)
        .await?;

    println!("{} Thread {} completed", "✓".green().bold(), thread_id);
    Ok(())
}
