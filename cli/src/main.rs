use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use symptom_core::config::{APP_NAME, CheckerConfig, get_default_config_file};
use symptom_core::{SymptomBackendRef, SymptomClient};
use tracing::info;

mod app;
mod cli;
mod commands;
mod history_controller;
mod in_flight;
mod logging;
mod output;
mod request_controller;
mod surface;
#[cfg(test)]
mod testing;

use crate::app::RunStatus;
use crate::cli::Args;
use crate::commands::{CommandHandlers, HistoryModal};
use crate::history_controller::HistoryController;
use crate::logging::{init_tracing, log_error, verbose_level};
use crate::output::print_usage_instructions;
use crate::request_controller::RequestController;
use crate::surface::{TerminalHistorySurface, TerminalResultSurface};

/// Layers configuration: file, then environment, then command-line flags
fn layer_config(file: &CheckerConfig, env: &CheckerConfig, args: &Args) -> CheckerConfig {
    let flags = CheckerConfig {
        base_url: args.base_url.clone(),
        request_timeout_secs: args.timeout_secs,
        log_level: None,
    };
    file.merge(env).merge(&flags)
}

fn config_path(args: &Args) -> Result<PathBuf> {
    match &args.config {
        Some(path) => Ok(path.clone()),
        None => get_default_config_file(APP_NAME).context("Failed to locate config file"),
    }
}

/// Wires each controller to the display region it owns
fn build_handlers(backend: SymptomBackendRef) -> CommandHandlers {
    let result_surface = Arc::new(TerminalResultSurface::new());
    let history_surface = Arc::new(TerminalHistorySurface::new());

    let request = Arc::new(RequestController::new(backend.clone(), result_surface));
    let history = Arc::new(HistoryController::new(backend, history_surface.clone()));
    CommandHandlers::new(request, history, HistoryModal::new(history_surface))
}

/// Main function - resolves configuration and runs the requested mode
#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before reading the environment
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let path = config_path(&args)?;
    let file_config = match CheckerConfig::load_from_file(&path) {
        Ok(config) => config,
        Err(e) => {
            log_error(&format!("Failed to load {}: {}", path.display(), e));
            return Err(e).context("Configuration error");
        }
    };
    let config = layer_config(&file_config, &CheckerConfig::from_env(), &args);

    init_tracing(&verbose_level(args.verbose, config.log_level()));
    info!("Using config file {}", path.display());

    if args.save_config {
        config
            .save_to_file(&path)
            .context("Failed to save configuration")?;
        println!("Saved configuration to {}", path.display());
    }

    let client = SymptomClient::new(&config).context("Failed to initialize backend client")?;
    info!("Using backend at {}", client.base_url());
    let handlers = build_handlers(Arc::new(client));

    let status = if args.interactive {
        app::run_interactive(&handlers).await?;
        RunStatus::Completed
    } else if let Some(symptoms) = args.symptom_text() {
        app::run_single_query(symptoms, &handlers).await
    } else if args.history {
        app::run_history(&handlers).await
    } else {
        if !args.save_config {
            print_usage_instructions();
        }
        RunStatus::Completed
    };

    // The failure was already shown; only the exit code is left to report
    if status == RunStatus::Failed {
        std::process::exit(1);
    }
    Ok(())
}
