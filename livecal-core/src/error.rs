//! Error types for livecal.

use thiserror::Error;

/// Errors that can occur while converting a program feed.
///
/// Every variant is fatal to a run; nothing is retried or skipped.
#[derive(Error, Debug)]
pub enum LiveCalError {
    #[error("Unknown time zone '{name}': {reason}")]
    LocationLoad { name: String, reason: String },

    #[error("Feed decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid {field} '{value}': {reason}")]
    TimeParse {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("ICS parse error: {0}")]
    IcsParse(String),

    #[error("ICS print error: {0}")]
    IcsPrint(String),
}

/// Result type alias for livecal operations.
pub type LiveCalResult<T> = Result<T, LiveCalError>;
