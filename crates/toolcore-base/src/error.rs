//! Document access error types.
//!
//! Uses `thiserror` for structured, matchable error variants. Absence of a
//! key and presence of a key with the wrong JSON type are distinct failure
//! modes so callers can tell "field never written" apart from "field written
//! with a different shape".

use thiserror::Error;

/// Errors produced by typed access into a [`Document`](crate::Document).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocumentError {
    /// The requested key is not present in the document.
    #[error("missing key '{key}'")]
    MissingKey { key: String },

    /// The key is present but its value has the wrong JSON type.
    #[error("type mismatch for key '{key}': expected {expected}")]
    TypeMismatch { key: String, expected: &'static str },
}
