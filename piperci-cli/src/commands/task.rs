//! Task command handlers
//!
//! Handles task creation, updates, event listing and waiting on GMan.

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use piperci_client::{DEFAULT_MAX_ATTEMPTS, GManClient};
use piperci_core::domain::task::{TaskEvent, TaskStatus};
use piperci_core::dto::task::NewTask;

use crate::config::Config;

/// Task subcommands
#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Request a new task id
    Create {
        #[arg(long)]
        run_id: String,

        #[arg(long)]
        project: String,

        #[arg(long)]
        caller: String,

        /// started, or received for delegated work
        #[arg(long, default_value = "started")]
        status: TaskStatus,

        /// Required with --status received
        #[arg(long)]
        thread_id: Option<String>,

        /// Required with --status received
        #[arg(long)]
        parent_id: Option<String>,
    },
    /// Append an event to a task
    Update {
        task_id: String,
        status: TaskStatus,
        message: String,
    },
    /// List the events of a task
    Events {
        task_id: String,

        /// Only show events with this status
        #[arg(long)]
        status: Option<TaskStatus>,
    },
    /// Block until the task reports a status
    Wait {
        task_id: String,

        #[arg(long, default_value = "completed")]
        status: TaskStatus,

        #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
        max_attempts: u32,
    },
}

/// Handle task commands
///
/// # Arguments
/// * `command` - The task command to execute
/// * `config` - The CLI configuration
pub async fn handle_task_command(command: TaskCommands, config: &Config) -> Result<()> {
    let client = config.gman();

    match command {
        TaskCommands::Create {
            run_id,
            project,
            caller,
            status,
            thread_id,
            parent_id,
        } => {
            let task = NewTask {
                run_id,
                project,
                caller,
                status,
                thread_id,
                parent_id,
            };
            create_task(&client, task).await
        }
        TaskCommands::Update {
            task_id,
            status,
            message,
        } => update_task(&client, &task_id, status, &message).await,
        TaskCommands::Events { task_id, status } => list_events(&client, &task_id, status).await,
        TaskCommands::Wait {
            task_id,
            status,
            max_attempts,
        } => wait_for_task(&client, &task_id, status, max_attempts).await,
    }
}

async fn create_task(client: &GManClient, task: NewTask) -> Result<()> {
    let event = client.request_new_task(task).await?;

    println!("{}", "✓ Task created".green().bold());
    println!("  Task ID: {}", event.task.task_id.bold());
    if let Some(thread_id) = &event.task.thread_id {
        println!("  Thread:  {}", thread_id);
    }

    Ok(())
}

async fn update_task(
    client: &GManClient,
    task_id: &str,
    status: TaskStatus,
    message: &str,
) -> Result<()> {
    let event = client.update_task(task_id, status, message).await?;

    println!(
        "{} Task {} is now {}",
        "✓".green().bold(),
        task_id.bold(),
        colorize_status(event.status)
    );

    Ok(())
}

async fn list_events(client: &GManClient, task_id: &str, status: Option<TaskStatus>) -> Result<()> {
    let with_status = move |event: &TaskEvent| status.is_none_or(|s| event.status == s);
    let events = client.get_task_events(task_id, Some(&with_status)).await?;

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

async fn wait_for_task(
    client: &GManClient,
    task_id: &str,
    status: TaskStatus,
    max_attempts: u32,
) -> Result<()> {
    println!("Waiting for task {} to reach {}...", task_id.bold(), colorize_status(status));

    client
        .wait_for_task_status(task_id, status, max_attempts)
        .await?;

    println!("{} Task {} reached {}", "✓".green().bold(), task_id, status);
    Ok(())
}

/// Print one event line
pub(crate) fn print_event(event: &TaskEvent) {
    let timestamp = event
        .timestamp
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());

    println!(
        "  {} {} {:<10} {} {}",
        "▸".cyan(),
        timestamp.dimmed(),
        colorize_status(event.status).to_string(),
        event.task.task_id.bold(),
        event.message.as_deref().unwrap_or_default()
    );
}

/// Colorize task status for display
pub(crate) fn colorize_status(status: TaskStatus) -> ColoredString {
    match status {
        TaskStatus::Completed => status.as_str().green(),
        TaskStatus::Failed => status.as_str().red(),
        TaskStatus::Running => status.as_str().yellow(),
        TaskStatus::Started | TaskStatus::Received => status.as_str().blue(),
        TaskStatus::Info | TaskStatus::Unknown => status.as_str().normal(),
    }
}
