//! Error types for the Newsdesk domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all Newsdesk operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Historical store errors ---
    #[error("History error: {0}")]
    History(#[from] HistoryError),

    // --- Knowledge base errors ---
    #[error("Knowledge base error: {0}")]
    Knowledge(#[from] KnowledgeError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid recency tiers: {0}")]
    InvalidTiers(String),
}

#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Entry not found: {0}")]
    EntryNotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_error_displays_correctly() {
        let err = Error::History(HistoryError::Storage(
            "failed to write briefing file".into(),
        ));
        assert!(err.to_string().contains("History error"));
        assert!(err.to_string().contains("briefing file"));
    }

    #[test]
    fn knowledge_error_displays_correctly() {
        let err = Error::Knowledge(KnowledgeError::EntryNotFound("crimea-2014".into()));
        assert!(err.to_string().contains("crimea-2014"));
    }
}
