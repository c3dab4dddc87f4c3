use thiserror::Error;

/// Prompt shown when the symptom text is empty after trimming
pub const EMPTY_SYMPTOMS_PROMPT: &str = "Please enter symptoms before checking.";

/// Message shown for any failure where no response could be used
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Check server connection.";

/// Symptom checker client errors
#[derive(Error, Debug)]
pub enum CheckerError {
    #[error("Validation Error: {0}")]
    Validation(String),

    #[error("HTTP Error: {status_code} - {}", .detail.as_deref().unwrap_or("no detail"))]
    Backend {
        status_code: u16,
        detail: Option<String>,
    },

    #[error("Transport Error: {0}")]
    Transport(String),

    #[error("Response Error: {0}")]
    Response(String),

    #[error("Configuration Error: {0}")]
    Config(String),
}

impl CheckerError {
    /// Text suitable for showing to the user. Transport causes stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            CheckerError::Validation(message) => message.clone(),
            CheckerError::Backend { detail, .. } => {
                format!("Error: {}", detail.as_deref().unwrap_or("Unknown error"))
            }
            CheckerError::Transport(_) | CheckerError::Response(_) => {
                NETWORK_ERROR_MESSAGE.to_string()
            }
            CheckerError::Config(message) => format!("Configuration error: {}", message),
        }
    }
}

/// Why a stored history payload could not be turned into a conditions list.
///
/// Always recovered per record; never escalates to the page.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordNormalizationError {
    #[error("analysis payload is absent")]
    Missing,

    #[error("analysis string is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("analysis payload has no possible_conditions list")]
    MissingConditions,
}

/// Result type for symptom checker operations
pub type CheckerResult<T> = Result<T, CheckerError>;
