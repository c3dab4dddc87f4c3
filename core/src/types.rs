use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request body for `POST /check-symptoms`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SymptomCheckRequest {
    /// Symptom text, already trimmed and non-empty
    pub symptoms: String,
}

/// Structured triage result returned by `POST /check-symptoms`.
///
/// The three lists are required on the live path; list order is the order the
/// backend produced and is never changed on the way to the display.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct SymptomAnalysis {
    pub possible_conditions: Vec<String>,
    pub red_flags: Vec<String>,
    pub recommended_next_steps: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disclaimer: Option<String>,
}

/// Error body returned with a non-2xx status.
///
/// `detail` is usually a string but some validation layers send a list of
/// objects, so it stays loosely typed.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<Value>,
}

impl ErrorBody {
    /// The human-readable detail, if the backend sent one as text
    pub fn message(&self) -> Option<String> {
        match &self.detail {
            Some(Value::String(text)) if !text.trim().is_empty() => Some(text.clone()),
            _ => None,
        }
    }
}

/// Body of `GET /history`.
///
/// Records are kept as raw JSON here; each one is decoded on its own during
/// normalization so a single bad record cannot fail the whole response.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct HistoryResponse {
    #[serde(default)]
    pub history: Option<Vec<Value>>,
}

/// One stored past query as written by the backend.
///
/// Every field is untrusted: the store has been written under several schema
/// versions, so nothing beyond "it is a JSON object" is assumed.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct HistoryRecord {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub query_timestamp: Option<Value>,
    #[serde(default)]
    pub symptoms_input: Option<Value>,
    /// Stored analysis: an object, a JSON-encoded string, or anything else
    #[serde(default, rename = "llm_response_json")]
    pub raw_analysis: Option<Value>,
}

/// Display-ready summary of a history record. Derived, never persisted.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct NormalizedHistoryEntry {
    pub id: String,
    pub timestamp: String,
    pub symptoms_input: String,
    pub conditions_summary: String,
}
