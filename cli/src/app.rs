use anyhow::{Context, Result};
use colored::*;
use std::io::{self, BufRead, Write};
use tracing::info;

use crate::commands::{Action, ActionOutcome, ClickTarget, CommandHandlers};
use crate::history_controller::HistoryOutcome;
use crate::request_controller::SubmitOutcome;

/// How a one-shot run ended. A failure has already been shown to the user
/// and its cause logged, so only the status is passed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Completed,
    Failed,
}

/// Checks one description of symptoms and displays the result
pub async fn run_single_query(symptoms: String, handlers: &CommandHandlers) -> RunStatus {
    info!("Running single symptom check");

    match handlers.dispatch(Action::Submit(symptoms)).await {
        ActionOutcome::Submitted(SubmitOutcome::Success(analysis)) => {
            info!(
                conditions = analysis.possible_conditions.len(),
                red_flags = analysis.red_flags.len(),
                "Symptom check complete"
            );
            RunStatus::Completed
        }
        ActionOutcome::Submitted(SubmitOutcome::Failure(_)) => RunStatus::Failed,
        _ => RunStatus::Completed,
    }
}

/// Displays the history of past queries
pub async fn run_history(handlers: &CommandHandlers) -> RunStatus {
    let outcome = handlers.dispatch(Action::OpenHistory).await;
    handlers.dispatch(Action::CloseHistory).await;

    match outcome {
        ActionOutcome::History(HistoryOutcome::Populated(entries)) => {
            info!(entries = entries.len(), "History displayed");
            RunStatus::Completed
        }
        ActionOutcome::History(HistoryOutcome::Error(_)) => RunStatus::Failed,
        _ => RunStatus::Completed,
    }
}

/// What a line typed in interactive mode asks for
#[derive(Debug, PartialEq, Eq)]
pub enum InteractiveInput {
    Quit,
    Act(Action),
}

/// Maps one input line to an action. `history_open` decides what an empty line means.
pub fn parse_line(line: &str, history_open: bool) -> InteractiveInput {
    let trimmed = line.trim();
    if trimmed.eq_ignore_ascii_case("exit") || trimmed.eq_ignore_ascii_case("quit") {
        return InteractiveInput::Quit;
    }

    let action = match trimmed {
        "/history" => Action::OpenHistory,
        "/close" => Action::CloseHistory,
        "" if history_open => Action::OutsideClick(ClickTarget::HistoryBackdrop),
        // History covers the input until it is closed
        _ if history_open => Action::OutsideClick(ClickTarget::HistoryContent),
        _ => Action::Submit(line.to_string()),
    };
    InteractiveInput::Act(action)
}

/// Runs an interactive session until the user quits or input ends
pub async fn run_interactive(handlers: &CommandHandlers) -> Result<()> {
    println!("Describe your symptoms and press Enter to check them.");
    println!(
        "Type {} to view past queries, {} to close them, {} to leave.",
        "/history".green(),
        "/close".green(),
        "exit".green()
    );
    println!();

    let stdin = io::stdin();
    loop {
        print!("{}: ", "Symptoms".green().bold());
        io::stdout().flush().context("Failed to flush stdout")?;

        let mut line = String::new();
        let read = stdin
            .lock()
            .read_line(&mut line)
            .context("Failed to read input")?;
        if read == 0 {
            break;
        }

        match parse_line(&line, handlers.history_open()) {
            InteractiveInput::Quit => {
                println!("Exiting session.");
                break;
            }
            InteractiveInput::Act(action) => {
                // Failures were already shown by the surfaces
                if let ActionOutcome::Ignored = handlers.dispatch(action).await {
                    if handlers.history_open() {
                        println!(
                            "{}",
                            "Close the history with /close or an empty line first.".dimmed()
                        );
                    }
                }
            }
        }

        println!();
    }

    Ok(())
}
