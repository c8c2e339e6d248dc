//! Error types for the Palaver domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant. Remote-service failures
//! are never retried here; they propagate up to the request boundary.

use thiserror::Error;

/// The top-level error type for all Palaver operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    #[error("History error: {0}")]
    History(#[from] HistoryError),

    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures talking to the inference endpoint.
#[derive(Debug, Clone, Error)]
pub enum ModelError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Failures talking to the retrieval index.
#[derive(Debug, Clone, Error)]
pub enum SearchError {
    #[error("Index query failed: {message} (status: {status_code})")]
    QueryFailed { status_code: u16, message: String },

    #[error("Embedding generation failed: {0}")]
    EmbeddingFailed(String),

    #[error("Malformed index response: {0}")]
    MalformedResponse(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Failures talking to the history store.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("No turn found for id '{id}' in session '{session_id}'")]
    NotFound { id: String, session_id: String },
}

/// Failures executing a tool handler.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(String),

    #[error("Tool execution failed for '{tool_name}': {reason}")]
    ExecutionFailed { tool_name: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_error_displays_correctly() {
        let err = Error::Model(ModelError::ApiError {
            status_code: 429,
            message: "Too many requests".into(),
        });
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn history_not_found_names_both_keys() {
        let err = Error::History(HistoryError::NotFound {
            id: "t1".into(),
            session_id: "s1".into(),
        });
        assert!(err.to_string().contains("t1"));
        assert!(err.to_string().contains("s1"));
    }
}
