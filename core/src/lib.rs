// Core of the symptom checker client:
// - Backend client for /check-symptoms and /history
// - Request/response data structures
// - History record normalization
// - Configuration loading
// - Shared error types

// Export client module - backend seam and HTTP implementation
pub mod client;
pub use client::*;

// Export types module - request/response data structures
pub mod types;
pub use types::*;

// Export normalize module - defensive decoding of stored history payloads
pub mod normalize;
pub use normalize::{normalize_history, normalize_record, CONDITIONS_PLACEHOLDER};

// Export config module - configuration loading
pub mod config;
pub use config::*;

// Export errors module - shared error types
pub mod errors;
pub use errors::*;
