//! Foundational facilities for developer tooling.
//!
//! Provides the ordered JSON [`Document`] with typed accessors and merge
//! semantics, the [`FileSystem`] abstraction with [`LocalFileSystem`] and
//! [`InMemoryFileSystem`] as first-class backends, and executable lookup
//! over search paths.
//!
//! # Modules
//!
//! - [`document`]: ordered key/value document with typed access and merge
//! - [`error`]: DocumentError with all typed-access failure modes
//! - [`fs`]: FileSystem trait plus local and in-memory backends
//! - [`lookup`]: executable resolution and search-path string parsing

pub mod document;
pub mod error;
pub mod fs;
pub mod lookup;

// Re-export key types for ergonomic use.
pub use document::Document;
pub use error::DocumentError;
pub use fs::{FileSystem, InMemoryFileSystem, LocalFileSystem};
pub use lookup::{normalize_lexically, resolve_executable, split_search_path, PATH_LIST_SEPARATOR};
