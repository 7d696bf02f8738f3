//! Error payload surfaced to API callers.

use serde::{Deserialize, Serialize};

/// One per-field validation message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMessage {
    pub message: String,
}

/// Error shape returned to callers: `{message, code, data?}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable summary.
    pub message: String,

    /// Status code; unclassified failures report 500.
    pub code: u16,

    /// Field-level messages, present for validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<FieldMessage>>,
}

impl ErrorResponse {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Vec<FieldMessage>) -> Self {
        self.data = if data.is_empty() { None } else { Some(data) };
        self
    }

    // Common error constructors
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(404, message)
    }

    pub fn internal_error() -> Self {
        Self::new(500, "An error occurred")
    }
}
