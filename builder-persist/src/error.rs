//! Error types for project persistence.

use thiserror::Error;

/// Result type for persistence operations.
pub type PersistResult<T> = Result<T, PersistError>;

/// Errors returned by project stores.
#[derive(Debug, Error)]
pub enum PersistError {
    /// No project with this id is visible to the session.
    #[error("project not found: {0}")]
    NotFound(String),

    /// The session is missing credentials or was rejected by the backend.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The backend base URL is malformed.
    #[error("invalid backend URL: {0}")]
    InvalidUrl(String),

    /// HTTP layer failed (connection, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("backend returned {code}: {body}")]
    Status {
        /// HTTP status code.
        code: u16,
        /// Response body, as text.
        body: String,
    },

    /// The backend answered with a body of the wrong shape.
    #[error("unexpected backend response: {0}")]
    UnexpectedResponse(String),

    /// Filesystem access failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Stored design data is not a valid design document.
    #[error("invalid design data: {0}")]
    Design(#[from] builder_core::BuilderError),

    /// A field failed validation before reaching the backend.
    #[error("validation failed: {0}")]
    Validation(String),
}
