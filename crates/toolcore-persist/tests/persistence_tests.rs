//! Integration tests for state persistence: round-trip, shared-file merge
//! between differently shaped states, and legacy schema migration.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;

use toolcore_base::{Document, FileSystem, InMemoryFileSystem};
use toolcore_persist::{PersistenceError, StatePersistence, Stateful};

const STATE_PATH: &str = "/subdir/state.json";

/// A state with a legacy schema (version 0 used `old_int` / `old_path`).
struct BuildState {
    int: i64,
    path: PathBuf,
}

impl BuildState {
    fn new(int: i64, path: &str) -> Self {
        BuildState {
            int,
            path: PathBuf::from(path),
        }
    }
}

impl Stateful for BuildState {
    fn to_document(&self) -> Document {
        let mut doc = Document::new();
        doc.insert("int", self.int);
        doc.insert("path", self.path.display().to_string());
        doc
    }

    fn restore(&mut self, document: &Document) -> Result<(), PersistenceError> {
        self.int = document.get_i64("int")?;
        self.path = PathBuf::from(document.get_str("path")?);
        Ok(())
    }

    fn restore_legacy(
        &mut self,
        document: &Document,
        from_version: u64,
    ) -> Result<(), PersistenceError> {
        match from_version {
            0 => {
                self.int = document.get_i64("old_int")?;
                self.path = PathBuf::from(document.get_str("old_path")?);
                Ok(())
            }
            other => Err(PersistenceError::UnknownLegacyVersion(other)),
        }
    }
}

/// A narrow view over the shared state file: only `int`.
struct NarrowState {
    int: i64,
}

impl Stateful for NarrowState {
    fn to_document(&self) -> Document {
        let mut doc = Document::new();
        doc.insert("int", self.int);
        doc
    }

    fn restore(&mut self, document: &Document) -> Result<(), PersistenceError> {
        self.int = document.get_i64("int")?;
        Ok(())
    }
}

/// A wider view over the same file: `int` plus `string`.
struct WideState {
    int: i64,
    string: String,
}

impl Stateful for WideState {
    fn to_document(&self) -> Document {
        let mut doc = Document::new();
        doc.insert("int", self.int);
        doc.insert("string", self.string.clone());
        doc
    }

    fn restore(&mut self, document: &Document) -> Result<(), PersistenceError> {
        self.int = document.get_i64("int")?;
        self.string = document.get_str("string")?.to_string();
        Ok(())
    }
}

fn read_state_json(fs: &InMemoryFileSystem) -> Value {
    let bytes = fs.read_file(Path::new(STATE_PATH)).unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[test]
fn round_trip_and_version_rejection() {
    let fs = Arc::new(InMemoryFileSystem::new());
    let persistence = StatePersistence::new(Arc::clone(&fs) as Arc<dyn FileSystem>, 1, [0], STATE_PATH);
    let mut state = BuildState::new(1, "/hello");

    // Restoring before any save finds no state.
    assert!(!persistence.restore(&mut state).unwrap());
    assert_eq!(state.int, 1);

    // Save and check the written record.
    persistence.save(&state).unwrap();
    let json = read_state_json(&fs);
    assert_eq!(json["version"], Value::from(1));
    assert_eq!(json["object"]["int"], Value::from(1));
    assert_eq!(json["object"]["path"], Value::from("/hello"));

    // Modify local state, then restore what was saved.
    state.int = 5;
    assert!(persistence.restore(&mut state).unwrap());
    assert_eq!(state.int, 1);
    assert_eq!(state.path, PathBuf::from("/hello"));

    // Rewrite the file with a version from the future.
    fs.write_file(Path::new(STATE_PATH), br#"{"version": 2}"#)
        .unwrap();
    let err = persistence.restore(&mut state).unwrap_err();
    assert!(err.to_string().contains("unsupported schema version 2"));
    assert_eq!(state.int, 1);
}

#[test]
fn shared_file_merge_preserves_unrelated_fields() {
    let fs = Arc::new(InMemoryFileSystem::new());
    let persistence = StatePersistence::new(Arc::clone(&fs) as Arc<dyn FileSystem>, 1, [], STATE_PATH);

    // Save the wide state first.
    let mut wide = WideState {
        int: 100,
        string: "hello".to_string(),
    };
    persistence.save(&wide).unwrap();

    // Restore the narrow state from the wide file.
    let mut narrow = NarrowState { int: 1 };
    assert!(persistence.restore(&mut narrow).unwrap());
    assert_eq!(narrow.int, 100);

    // Update through the narrow view; the wide field must survive on disk.
    narrow.int = 500;
    persistence.save(&narrow).unwrap();
    let json = read_state_json(&fs);
    assert_eq!(json["object"]["string"], Value::from("hello"));

    // The wide state now sees the updated int and its own string.
    wide.string = String::new();
    assert!(persistence.restore(&mut wide).unwrap());
    assert_eq!(wide.int, 500);
    assert_eq!(wide.string, "hello");
}

#[test]
fn restores_from_a_supported_legacy_schema() {
    let fs = Arc::new(InMemoryFileSystem::new());
    fs.create_dir_all(Path::new("/subdir")).unwrap();
    fs.write_file(
        Path::new(STATE_PATH),
        br#"{
            "version": 0,
            "object": {
                "old_path": "/oldpath",
                "old_int": 4
            }
        }"#,
    )
    .unwrap();

    let persistence = StatePersistence::new(Arc::clone(&fs) as Arc<dyn FileSystem>, 1, [0], STATE_PATH);
    let mut state = BuildState::new(1, "/hello");
    assert!(persistence.restore(&mut state).unwrap());
    assert_eq!(state.int, 4);
    assert_eq!(state.path, PathBuf::from("/oldpath"));

    // Saving after a legacy restore rewrites at the current version with
    // current field names; the legacy keys are preserved by the merge.
    persistence.save(&state).unwrap();
}

#[test]
fn missing_field_during_restore_is_a_document_error() {
    let fs = Arc::new(InMemoryFileSystem::new());
    fs.create_dir_all(Path::new("/subdir")).unwrap();
    fs.write_file(Path::new(STATE_PATH), br#"{"version": 1, "object": {"int": 2}}"#)
        .unwrap();

    let persistence = StatePersistence::new(Arc::clone(&fs) as Arc<dyn FileSystem>, 1, [], STATE_PATH);
    let mut state = BuildState::new(1, "/hello");
    let err = persistence.restore(&mut state).unwrap_err();
    assert!(matches!(err, PersistenceError::Document(_)));
    // Partial mutation is permitted: "int" was applied before "path" failed.
    assert_eq!(state.int, 2);
}
