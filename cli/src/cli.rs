use clap::Parser;
use std::path::PathBuf;

/// Terminal client for the symptom checker service
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Symptoms to check, e.g. "headache and mild fever"
    #[arg(index = 1)]
    pub symptoms: Vec<String>,

    /// Enter interactive mode
    #[arg(short, long, default_value_t = false)]
    pub interactive: bool,

    /// Show the history of past queries
    #[arg(long, default_value_t = false)]
    pub history: bool,

    /// Base URL of the symptom checker backend
    #[arg(long)]
    pub base_url: Option<String>,

    /// Timeout in seconds for each backend request
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Path to a config file (defaults to ~/.config/symptom-checker/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write the effective configuration back to the config file
    #[arg(long, default_value_t = false)]
    pub save_config: bool,

    /// Enable verbose output
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Args {
    /// Positional words joined back into one symptom description
    pub fn symptom_text(&self) -> Option<String> {
        if self.symptoms.is_empty() {
            None
        } else {
            Some(self.symptoms.join(" "))
        }
    }
}
