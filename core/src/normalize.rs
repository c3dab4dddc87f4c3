//! Normalization of stored history records.
//!
//! The analysis payload of a history record comes in one of three shapes:
//! an already-structured object, the same object JSON-encoded into a string,
//! or something unusable (absent, null, malformed). Each record is decoded on
//! its own and a failure only ever costs that record its conditions summary.

use serde_json::Value;
use tracing::{debug, info};

use crate::errors::RecordNormalizationError;
use crate::types::{HistoryRecord, NormalizedHistoryEntry};

/// Summary shown when a record's conditions cannot be recovered
pub const CONDITIONS_PLACEHOLDER: &str = "Conditions not available";

/// Timestamp shown when a record has none
pub const TIMESTAMP_PLACEHOLDER: &str = "Time unavailable";

/// Id shown when a record has none
pub const ID_PLACEHOLDER: &str = "unknown";

const CONDITIONS_FIELD: &str = "possible_conditions";
const LEGACY_CONDITIONS_FIELD: &str = "possibleConditions";

/// Outcome of decoding one stored analysis payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredAnalysis {
    /// The conditions list, in stored order
    Conditions(Vec<String>),
    /// Nothing usable; the summary falls back to the placeholder
    Placeholder(RecordNormalizationError),
}

impl StoredAnalysis {
    /// Comma-joined conditions, or the fixed placeholder
    pub fn summary(&self) -> String {
        match self {
            StoredAnalysis::Conditions(conditions) => conditions.join(", "),
            StoredAnalysis::Placeholder(_) => CONDITIONS_PLACEHOLDER.to_string(),
        }
    }
}

/// Decodes the stored analysis payload into its conditions list.
///
/// A string is decoded as JSON once; the decoded value (or the original
/// object) must carry a `possible_conditions` array.
pub fn decode_conditions(raw: Option<&Value>) -> Result<Vec<String>, RecordNormalizationError> {
    let decoded;
    let value = match raw {
        None | Some(Value::Null) => return Err(RecordNormalizationError::Missing),
        Some(Value::String(encoded)) => {
            decoded = serde_json::from_str::<Value>(encoded)
                .map_err(|e| RecordNormalizationError::InvalidJson(e.to_string()))?;
            &decoded
        }
        Some(other) => other,
    };

    let conditions = value
        .get(CONDITIONS_FIELD)
        .or_else(|| value.get(LEGACY_CONDITIONS_FIELD))
        .and_then(Value::as_array)
        .ok_or(RecordNormalizationError::MissingConditions)?;

    Ok(conditions.iter().map(condition_text).collect())
}

/// Tagged-variant form of [`decode_conditions`]
pub fn decode_analysis(raw: Option<&Value>) -> StoredAnalysis {
    match decode_conditions(raw) {
        Ok(conditions) => StoredAnalysis::Conditions(conditions),
        Err(reason) => StoredAnalysis::Placeholder(reason),
    }
}

/// Text of one element of a stored conditions list
fn condition_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Display text of a loosely typed scalar field; `None` when absent, null or blank
fn display_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

/// Normalizes one decoded history record. Never fails.
pub fn normalize_record(record: &HistoryRecord) -> NormalizedHistoryEntry {
    let id = display_text(record.id.as_ref()).unwrap_or_else(|| ID_PLACEHOLDER.to_string());

    let analysis = decode_analysis(record.raw_analysis.as_ref());
    if let StoredAnalysis::Placeholder(reason) = &analysis {
        debug!(record_id = %id, %reason, "Using placeholder conditions summary");
    }

    NormalizedHistoryEntry {
        timestamp: display_text(record.query_timestamp.as_ref())
            .unwrap_or_else(|| TIMESTAMP_PLACEHOLDER.to_string()),
        symptoms_input: display_text(record.symptoms_input.as_ref()).unwrap_or_default(),
        conditions_summary: analysis.summary(),
        id,
    }
}

/// Normalizes every element of a `/history` list independently, keeping the
/// backend's order. Elements that are not records at all still produce an
/// entry carrying the placeholders.
pub fn normalize_history(records: &[Value]) -> Vec<NormalizedHistoryEntry> {
    records
        .iter()
        .enumerate()
        .map(|(index, value)| {
            // Arrays would otherwise decode positionally into the record fields
            if !value.is_object() {
                info!(index, "History element is not an object");
                return normalize_record(&HistoryRecord::default());
            }
            let record = serde_json::from_value::<HistoryRecord>(value.clone())
                .unwrap_or_else(|e| {
                    info!(index, error = %e, "History element is not a record");
                    HistoryRecord::default()
                });
            normalize_record(&record)
        })
        .collect()
}
