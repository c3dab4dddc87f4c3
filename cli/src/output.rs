use colored::*;
use symptom_core::{NormalizedHistoryEntry, SymptomAnalysis};

pub const HISTORY_LOADING_MESSAGE: &str = "Loading history...";
pub const HISTORY_EMPTY_MESSAGE: &str = "No history recorded yet.";
pub const HISTORY_ERROR_MESSAGE: &str = "Failed to load history. Please check server logs.";

/// How a list item is styled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    Plain,
    /// Red flags: urgent items
    Urgent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub text: String,
    pub emphasis: Emphasis,
}

/// Display representation of one triage result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisView {
    pub possible_conditions: Vec<ListItem>,
    pub red_flags: Vec<ListItem>,
    pub next_steps: Vec<ListItem>,
    pub reasoning: Option<String>,
    pub disclaimer: Option<String>,
}

/// One summary block in the history list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryBlock {
    pub id: String,
    pub timestamp: String,
    pub input: String,
    pub conditions: String,
}

/// What the history region shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryView {
    Loading,
    Entries(Vec<HistoryBlock>),
    Empty,
    Error,
}

impl HistoryView {
    /// Fixed message for the non-list states
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            HistoryView::Loading => Some(HISTORY_LOADING_MESSAGE),
            HistoryView::Empty => Some(HISTORY_EMPTY_MESSAGE),
            HistoryView::Error => Some(HISTORY_ERROR_MESSAGE),
            HistoryView::Entries(_) => None,
        }
    }
}

fn items(texts: &[String], emphasis: Emphasis) -> Vec<ListItem> {
    texts
        .iter()
        .map(|text| ListItem {
            text: text.clone(),
            emphasis,
        })
        .collect()
}

/// Builds the display representation of a triage result, keeping response order
pub fn render_analysis(analysis: &SymptomAnalysis) -> AnalysisView {
    AnalysisView {
        possible_conditions: items(&analysis.possible_conditions, Emphasis::Plain),
        red_flags: items(&analysis.red_flags, Emphasis::Urgent),
        next_steps: items(&analysis.recommended_next_steps, Emphasis::Plain),
        reasoning: analysis.reasoning.clone().filter(|r| !r.trim().is_empty()),
        disclaimer: analysis.disclaimer.clone().filter(|d| !d.trim().is_empty()),
    }
}

/// Builds history summary blocks in the order the backend delivered them
pub fn render_history(entries: &[NormalizedHistoryEntry]) -> HistoryView {
    HistoryView::Entries(
        entries
            .iter()
            .map(|entry| HistoryBlock {
                id: entry.id.clone(),
                timestamp: entry.timestamp.clone(),
                input: entry.symptoms_input.clone(),
                conditions: entry.conditions_summary.clone(),
            })
            .collect(),
    )
}

fn push_section(output: &mut String, title: &str, list: &[ListItem]) {
    output.push_str(&format!("{}\n", title.cyan().bold()));
    if list.is_empty() {
        output.push_str(&format!("  {}\n", "(none)".dimmed()));
    }
    for item in list {
        match item.emphasis {
            Emphasis::Plain => output.push_str(&format!("{}  {}\n", "•".yellow(), item.text)),
            Emphasis::Urgent => output.push_str(&format!(
                "{}  {}\n",
                "!".red().bold(),
                item.text.red().bold()
            )),
        }
    }
    output.push('\n');
}

/// Formats a triage result for the terminal
pub fn format_analysis(view: &AnalysisView) -> String {
    let mut output = String::new();
    push_section(&mut output, "Possible conditions", &view.possible_conditions);
    push_section(&mut output, "Red flags", &view.red_flags);
    push_section(&mut output, "Recommended next steps", &view.next_steps);

    if let Some(reasoning) = &view.reasoning {
        output.push_str(&format!("{}\n{}\n\n", "Reasoning".cyan().bold(), reasoning));
    }
    if let Some(disclaimer) = &view.disclaimer {
        output.push_str(&format!("{}\n", disclaimer.italic().dimmed()));
    }
    output
}

/// Formats the history region for the terminal
pub fn format_history(view: &HistoryView) -> String {
    let blocks = match view {
        HistoryView::Entries(blocks) => blocks,
        HistoryView::Error => return format!("{}\n", HISTORY_ERROR_MESSAGE.red()),
        other => return format!("{}\n", other.placeholder().unwrap_or_default().dimmed()),
    };

    let mut output = String::new();
    for block in blocks {
        output.push_str(&format!(
            "{}  {}\n",
            format!("ID: {}", block.id).bold(),
            block.timestamp.dimmed()
        ));
        output.push_str(&format!("  {} {}\n", "Input:".blue(), block.input));
        output.push_str(&format!("  {} {}\n\n", "Conditions:".blue(), block.conditions));
    }
    output
}

/// Show usage instructions when no symptoms or action are provided
pub fn print_usage_instructions() {
    println!("{}", "Usage:".yellow().bold());
    println!("  {}", "symptom-checker \"your symptoms\"".green().bold());
    println!("    Check a single description of symptoms");
    println!();
    println!("  {}", "symptom-checker --history".green().bold());
    println!("    Show past queries");
    println!();
    println!("  {}", "symptom-checker -i".green().bold());
    println!("    Start an interactive session");
    println!();
    println!("{}", "Options:".cyan());
    println!("  --base-url <URL>        Backend address (env SYMPTOM_CHECKER_URL)");
    println!("  --timeout-secs <SECS>   Per-request timeout");
    println!("  --config <PATH>         Config file to use");
    println!("  --help                  Show this help message");
    println!();
}
