//! Display regions owned by the controllers.
//!
//! Each controller is handed the region it drives at construction; nothing
//! else writes to it.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use crate::output::{AnalysisView, HistoryView, format_analysis, format_history};

/// Region driven by the request controller: result area, loading indicator,
/// submit control and user prompts
pub trait ResultSurface: Send + Sync {
    fn show_loading(&self);
    fn clear_loading(&self);
    fn show_analysis(&self, view: &AnalysisView);
    fn hide_analysis(&self);
    fn set_submit_enabled(&self, enabled: bool);
    /// Message the user must see (validation prompt, request failure)
    fn notify(&self, message: &str);
}

/// Region driven by the history controller and the history modal
pub trait HistorySurface: Send + Sync {
    fn show(&self, view: &HistoryView);
    fn set_visible(&self, visible: bool);
}

fn spinner(message: &'static str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
        .template("{spinner} {msg}")
    {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

/// Result region rendered on the terminal
#[derive(Default)]
pub struct TerminalResultSurface {
    spinner: Mutex<Option<ProgressBar>>,
}

impl TerminalResultSurface {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResultSurface for TerminalResultSurface {
    fn show_loading(&self) {
        if let Ok(mut slot) = self.spinner.lock() {
            if let Some(previous) = slot.replace(spinner("Checking symptoms...")) {
                previous.finish_and_clear();
            }
        }
    }

    fn clear_loading(&self) {
        if let Ok(mut slot) = self.spinner.lock() {
            if let Some(spinner) = slot.take() {
                spinner.finish_and_clear();
            }
        }
    }

    fn show_analysis(&self, view: &AnalysisView) {
        self.clear_loading();
        println!("{}", format_analysis(view));
    }

    fn hide_analysis(&self) {
        // Printed output cannot be withdrawn; nothing is shown until the next result
    }

    fn set_submit_enabled(&self, enabled: bool) {
        // The prompt only returns once the pending submit has finished
        debug!(enabled, "Submit control");
    }

    fn notify(&self, message: &str) {
        self.clear_loading();
        eprintln!("{}", message.yellow().bold());
    }
}

/// History region rendered on the terminal; prints only while visible
#[derive(Default)]
pub struct TerminalHistorySurface {
    visible: AtomicBool,
    spinner: Mutex<Option<ProgressBar>>,
}

impl TerminalHistorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn stop_spinner(&self) {
        if let Ok(mut slot) = self.spinner.lock() {
            if let Some(spinner) = slot.take() {
                spinner.finish_and_clear();
            }
        }
    }
}

impl HistorySurface for TerminalHistorySurface {
    fn show(&self, view: &HistoryView) {
        if !self.visible.load(Ordering::SeqCst) {
            return;
        }
        match view {
            HistoryView::Loading => {
                if let Ok(mut slot) = self.spinner.lock() {
                    if let Some(previous) = slot.replace(spinner("Loading history...")) {
                        previous.finish_and_clear();
                    }
                }
            }
            other => {
                self.stop_spinner();
                print!("{}", format_history(other));
            }
        }
    }

    fn set_visible(&self, visible: bool) {
        let was_visible = self.visible.swap(visible, Ordering::SeqCst);
        if visible && !was_visible {
            println!("{}", "── History ──".cyan().bold());
        } else if !visible && was_visible {
            self.stop_spinner();
            println!("{}", "── History closed ──".dimmed());
        }
    }
}
