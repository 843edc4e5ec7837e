//! Persistence error types.
//!
//! [`PersistenceError`] covers all anticipated failure modes of the state
//! engine: version rejection, malformed records, migration gaps, and
//! propagated document, JSON, and io errors.

use thiserror::Error;

use toolcore_base::DocumentError;

/// Errors produced by state persistence operations.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The state file's recorded version is neither the current schema
    /// version nor a supported legacy version.
    #[error("unsupported schema version {0}")]
    UnsupportedSchemaVersion(u64),

    /// The state file is not a valid `{"version": N, "object": {...}}`
    /// record.
    #[error("malformed state file: {reason}")]
    MalformedRecord { reason: String },

    /// A legacy restoration hook was invoked for a version it has no
    /// migration for.
    #[error("no migration from schema version {0}")]
    UnknownLegacyVersion(u64),

    /// Typed access into a document failed.
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// An underlying filesystem operation failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
