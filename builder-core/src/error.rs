//! Error types for editing operations.
//!
//! Stale ids, out-of-range indices and locked elements are not errors: those
//! operations are silent no-ops. Errors cover malformed input from outside
//! the editor (documents, drag payloads) and actions that have no defined
//! behavior yet.

use thiserror::Error;

/// Result type for editing operations.
pub type BuilderResult<T> = Result<T, BuilderError>;

/// Errors that can occur in editing operations.
#[derive(Debug, Error)]
pub enum BuilderError {
    /// The action exists as an affordance but has no defined behavior.
    #[error("Unsupported action: {0}")]
    Unsupported(String),

    /// A drag payload did not name a known blueprint.
    #[error("Unknown blueprint: {0}")]
    UnknownBlueprint(String),

    /// A drag payload was used with the wrong drop semantic.
    #[error("Invalid drag payload: {0}")]
    InvalidPayload(String),

    /// A design document could not be converted into elements.
    #[error("Invalid design document: {0}")]
    InvalidDocument(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
