//! The [`StatePersistence`] engine and the [`Stateful`] capability trait.
//!
//! A `StatePersistence` is bound to one state path, one current schema
//! version, and a set of legacy versions it can still migrate from. It holds
//! no other state and performs no locking: callers serialize access to a
//! given path.
//!
//! On-disk shape is always `{"version": <non-negative integer>, "object":
//! {...caller-defined fields...}}`. A record missing either top-level key is
//! malformed; a record whose version is neither current nor in the legacy
//! set is rejected with the version it carried.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use toolcore_base::{Document, FileSystem};

use crate::error::PersistenceError;

/// The capability contract consumed by [`StatePersistence`].
///
/// Implementors own their in-memory fields and decide which of them are
/// persisted; restoration mutates those fields in place. Field errors raised
/// mid-restore propagate without rolling back fields already written.
pub trait Stateful {
    /// Projects the current-schema fields into a document.
    fn to_document(&self) -> Document;

    /// Populates fields from a current-schema document.
    fn restore(&mut self, document: &Document) -> Result<(), PersistenceError>;

    /// Populates fields from a document written at a supported legacy
    /// version. Implementors own the field-name remapping for each version
    /// they migrate from.
    ///
    /// The default rejects every version; invoking it for a version the
    /// implementor has no migration for is a recoverable error, never a
    /// panic.
    fn restore_legacy(
        &mut self,
        document: &Document,
        from_version: u64,
    ) -> Result<(), PersistenceError> {
        let _ = document;
        Err(PersistenceError::UnknownLegacyVersion(from_version))
    }
}

/// The on-disk record wrapper.
#[derive(Serialize)]
struct PersistedRecord {
    version: u64,
    object: Document,
}

/// Saves and restores versioned state documents at a single path.
pub struct StatePersistence {
    fs: Arc<dyn FileSystem>,
    schema_version: u64,
    supported_versions: BTreeSet<u64>,
    state_path: PathBuf,
}

impl StatePersistence {
    /// Creates an engine bound to `state_path`.
    ///
    /// `supported_versions` lists the legacy schema versions this engine can
    /// still read via [`Stateful::restore_legacy`]; each must be strictly
    /// less than `schema_version`. Pass an empty iterator when no legacy
    /// records exist.
    pub fn new(
        fs: Arc<dyn FileSystem>,
        schema_version: u64,
        supported_versions: impl IntoIterator<Item = u64>,
        state_path: impl Into<PathBuf>,
    ) -> Self {
        StatePersistence {
            fs,
            schema_version,
            supported_versions: supported_versions.into_iter().collect(),
            state_path: state_path.into(),
        }
    }

    /// The path this engine reads and writes.
    pub fn state_path(&self) -> &Path {
        &self.state_path
    }

    /// The current schema version records are written at.
    pub fn schema_version(&self) -> u64 {
        self.schema_version
    }

    /// Persists `object`'s current-schema projection.
    ///
    /// When a record already exists at the path, the new projection is
    /// merged into its object document: every new key overwrites, keys only
    /// in the existing record survive. Parent directories are created as
    /// needed.
    pub fn save(&self, object: &dyn Stateful) -> Result<(), PersistenceError> {
        let mut document = object.to_document();
        if self.fs.exists(&self.state_path) {
            let (_, mut on_disk) = self.read_record()?;
            on_disk.merge_from(&document);
            document = on_disk;
        }

        let record = PersistedRecord {
            version: self.schema_version,
            object: document,
        };
        if let Some(parent) = self.state_path.parent() {
            self.fs.create_dir_all(parent)?;
        }
        let bytes = serde_json::to_vec_pretty(&record)?;
        self.fs.write_file(&self.state_path, &bytes)?;
        debug!(
            path = %self.state_path.display(),
            version = self.schema_version,
            "saved state"
        );
        Ok(())
    }

    /// Restores `object` from the record at the path.
    ///
    /// Returns `Ok(false)`, touching nothing, when no file exists. A record
    /// at the current version goes through [`Stateful::restore`]; one at a
    /// supported legacy version goes through [`Stateful::restore_legacy`]
    /// with that version; any other version is rejected.
    pub fn restore(&self, object: &mut dyn Stateful) -> Result<bool, PersistenceError> {
        if !self.fs.exists(&self.state_path) {
            return Ok(false);
        }

        let (version, document) = self.read_versioned_record()?;
        if version == self.schema_version {
            object.restore(&document)?;
        } else if self.supported_versions.contains(&version) {
            debug!(
                path = %self.state_path.display(),
                from = version,
                to = self.schema_version,
                "restoring state from legacy schema"
            );
            object.restore_legacy(&document, version)?;
        } else {
            return Err(PersistenceError::UnsupportedSchemaVersion(version));
        }
        debug!(path = %self.state_path.display(), version, "restored state");
        Ok(true)
    }

    /// Reads and validates the record, rejecting unsupported versions before
    /// the object document is required to be present.
    fn read_versioned_record(&self) -> Result<(u64, Document), PersistenceError> {
        let (version, object) = self.read_top_level()?;
        if version != self.schema_version && !self.supported_versions.contains(&version) {
            return Err(PersistenceError::UnsupportedSchemaVersion(version));
        }
        let document = Self::require_object(object)?;
        Ok((version, document))
    }

    /// Reads the record for merging during save; the object document must be
    /// present regardless of the recorded version.
    fn read_record(&self) -> Result<(u64, Document), PersistenceError> {
        let (version, object) = self.read_top_level()?;
        let document = Self::require_object(object)?;
        Ok((version, document))
    }

    fn read_top_level(&self) -> Result<(u64, Option<Value>), PersistenceError> {
        let bytes = self.fs.read_file(&self.state_path)?;
        let value: Value = serde_json::from_slice(&bytes)?;
        let Value::Object(mut map) = value else {
            return Err(PersistenceError::MalformedRecord {
                reason: "top-level value is not an object".to_string(),
            });
        };

        let version = match map.get("version") {
            None => {
                return Err(PersistenceError::MalformedRecord {
                    reason: "missing 'version' key".to_string(),
                })
            }
            Some(value) => value.as_u64().ok_or_else(|| PersistenceError::MalformedRecord {
                reason: "'version' is not a non-negative integer".to_string(),
            })?,
        };
        Ok((version, map.remove("object")))
    }

    fn require_object(object: Option<Value>) -> Result<Document, PersistenceError> {
        match object {
            Some(Value::Object(map)) => Ok(Document::from(map)),
            Some(_) => Err(PersistenceError::MalformedRecord {
                reason: "'object' is not an object".to_string(),
            }),
            None => Err(PersistenceError::MalformedRecord {
                reason: "missing 'object' key".to_string(),
            }),
        }
    }
}
