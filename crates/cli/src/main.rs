use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use flowdeck_api::{ExecutionClient, ExecutionService};
use flowdeck_engine::{ActionError, ActionRejected, AlwaysConfirm, ConfirmationPrompt, ExecutionListController, LoadOutcome};
use flowdeck_types::StatusFilter;
use flowdeck_util::UserPreferences;
use tracing::warn;

mod logging;
mod output;
mod prompt;

use prompt::StdinPrompt;

/// Inspect, retry and cancel workflow executions.
///
/// Run without a subcommand to open the interactive console.
#[derive(Debug, Parser)]
#[command(name = "flowdeck", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List executions, newest first
    List {
        /// Only show executions in this status (pending, running, completed, failed, cancelled, all)
        #[arg(long, short)]
        status: Option<StatusFilter>,
        /// Print raw JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show one execution
    Show {
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// Retry a failed or cancelled execution
    Retry { id: String },
    /// Cancel a running execution
    Cancel {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let interactive = cli.command.is_none();
    logging::init_tracing(interactive)?;

    let preferences = Arc::new(UserPreferences::new().unwrap_or_else(|error| {
        warn!(error = %error, "preferences unavailable; using defaults for this session");
        UserPreferences::ephemeral()
    }));
    let client = ExecutionClient::new_from_env().context("failed to configure the execution service client")?;
    let service: Arc<dyn ExecutionService> = Arc::new(client);

    let Some(command) = cli.command else {
        let controller = ExecutionListController::new(service, preferences.default_status_filter());
        flowdeck_tui::run(controller, preferences).await?;
        return Ok(ExitCode::SUCCESS);
    };

    let mut controller = ExecutionListController::new(service, StatusFilter::All);
    let succeeded = match command {
        Command::List { status, json } => {
            let filter = status.unwrap_or_else(|| preferences.default_status_filter());
            list(&mut controller, filter, json).await?
        }
        Command::Show { id, json } => show(&mut controller, &id, json).await?,
        Command::Retry { id } => retry(&mut controller, &id).await,
        Command::Cancel { id, yes } => {
            let prompt: Box<dyn ConfirmationPrompt> = if yes { Box::new(AlwaysConfirm) } else { Box::new(StdinPrompt) };
            cancel(&mut controller, &id, prompt.as_ref()).await
        }
    };

    output::print_notifications(controller.notifications_mut().drain());
    Ok(if succeeded { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

async fn list(controller: &mut ExecutionListController, filter: StatusFilter, json: bool) -> Result<bool> {
    match controller.load_filtered(filter).await {
        LoadOutcome::Applied { .. } => {
            if json {
                println!("{}", serde_json::to_string_pretty(controller.records())?);
            } else {
                output::print_table(controller.records(), filter);
            }
            Ok(true)
        }
        LoadOutcome::Stale | LoadOutcome::Failed(_) => Ok(false),
    }
}

async fn show(controller: &mut ExecutionListController, id: &str, json: bool) -> Result<bool> {
    let Ok(record) = controller.fetch_record(id).await else {
        return Ok(false);
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        output::print_record(&record);
    }
    Ok(true)
}

async fn retry(controller: &mut ExecutionListController, id: &str) -> bool {
    if controller.fetch_record(id).await.is_err() {
        return false;
    }
    report(controller.request_retry(id).await)
}

async fn cancel(controller: &mut ExecutionListController, id: &str, prompt: &dyn ConfirmationPrompt) -> bool {
    if controller.fetch_record(id).await.is_err() {
        return false;
    }
    report(controller.request_cancel(id, prompt).await)
}

/// Failures already produced a notification; only a declined prompt needs a line of its own.
fn report<T>(result: Result<T, ActionError>) -> bool {
    match result {
        Ok(_) => true,
        Err(ActionError::Rejected(ActionRejected::ConfirmationDeclined { id })) => {
            eprintln!("Left execution {id} running.");
            false
        }
        Err(_) => false,
    }
}
