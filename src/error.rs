//! Error types shared by the validation layer, the analyzer and the HTTP surface.

use serde::Serialize;
use thiserror::Error;

/// A single field-level validation failure, reported back to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Dotted path to the offending field, e.g. `messages.2.user_id`.
    pub loc: String,
    pub msg: String,
}

impl FieldError {
    pub fn new(loc: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            loc: loc.into(),
            msg: msg.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Structural problems with the request body (400).
    #[error("invalid payload: {} field error(s)", .0.len())]
    InvalidPayload(Vec<FieldError>),

    /// Positive window that is not part of the supported set (422).
    #[error("unsupported time window: {minutes} minutes")]
    UnsupportedTimeWindow { minutes: u32 },

    /// The caller handed the core something validation should have rejected.
    #[error("contract breach: {reason}")]
    ContractBreach { reason: String },
}

impl AnalysisError {
    /// Stable machine-readable code used in HTTP error bodies and metrics labels.
    pub fn code(&self) -> &'static str {
        match self {
            AnalysisError::InvalidPayload(_) => "INVALID_PAYLOAD",
            AnalysisError::UnsupportedTimeWindow { .. } => "UNSUPPORTED_TIME_WINDOW",
            AnalysisError::ContractBreach { .. } => "INTERNAL_ERROR",
        }
    }
}
