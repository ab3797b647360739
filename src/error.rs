//! Error types for convo-edit

use thiserror::Error;

/// Result type alias for convo-edit operations
pub type Result<T> = std::result::Result<T, EditorError>;

/// Editor error types
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    #[error("Invalid pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Tokenizer `{name}` unavailable: {reason}")]
    TokenizerUnavailable { name: String, reason: String },

    #[error("No such segment: {0}")]
    NoSuchSegment(u64),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl EditorError {
    /// Build a `TokenizerUnavailable` error for a named tokenizer
    pub fn tokenizer(name: &str, reason: impl ToString) -> Self {
        EditorError::TokenizerUnavailable {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }
}
