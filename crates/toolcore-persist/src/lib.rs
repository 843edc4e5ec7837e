//! Schema-versioned JSON state persistence.
//!
//! Provides [`StatePersistence`], which saves and restores a program's
//! in-memory state as a `{"version": N, "object": {...}}` document at a
//! single path, and the [`Stateful`] trait through which state objects
//! project themselves to and from a [`Document`](toolcore_base::Document).
//!
//! # Architecture
//!
//! `StatePersistence` holds only configuration (filesystem handle, current
//! schema version, supported legacy versions, state path) and is reusable
//! across calls. Saving merges the new projection into whatever object
//! document is already on disk, so differently shaped state types can share
//! one file without destroying each other's fields. Restoring dispatches on
//! the recorded version: the current version goes through the object's
//! primary hook, a supported legacy version goes through its migration
//! hook, and anything else is rejected.
//!
//! # Modules
//!
//! - [`error`]: PersistenceError with all failure modes
//! - [`persistence`]: StatePersistence engine and the Stateful trait

pub mod error;
pub mod persistence;

// Re-export key types for ergonomic use.
pub use error::PersistenceError;
pub use persistence::{StatePersistence, Stateful};
