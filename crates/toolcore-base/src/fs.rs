//! Filesystem abstraction with local and in-memory backends.
//!
//! [`FileSystem`] is the seam between this crate's pure logic and the real
//! filesystem. [`LocalFileSystem`] is a thin wrapper over `std::fs`;
//! [`InMemoryFileSystem`] is a first-class backend for tests and ephemeral
//! use, with identical semantics (writes require an existing parent
//! directory, reads of absent paths fail with `NotFound`).
//!
//! All operations are short-lived: open, act, close. No handle is retained
//! between calls, and the in-memory backend is safe to share across threads
//! behind an `Arc`.

use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// The filesystem contract consumed by executable lookup and persistence.
pub trait FileSystem: Send + Sync {
    /// Returns true if a file or directory exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Returns true if `path` is a file marked executable.
    fn is_executable(&self, path: &Path) -> bool;

    /// Reads the full contents of the file at `path`.
    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Writes `contents` to `path`, replacing any existing file. The parent
    /// directory must already exist.
    fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    /// Creates the directory at `path` and all missing ancestors.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;
}

/// The real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    #[cfg(unix)]
    fn is_executable(&self, path: &Path) -> bool {
        use std::os::unix::fs::PermissionsExt;
        match std::fs::metadata(path) {
            Ok(metadata) => metadata.is_file() && metadata.permissions().mode() & 0o111 != 0,
            Err(_) => false,
        }
    }

    #[cfg(not(unix))]
    fn is_executable(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        std::fs::write(path, contents)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }
}

#[derive(Debug, Default)]
struct InMemoryState {
    files: HashMap<PathBuf, Vec<u8>>,
    directories: HashSet<PathBuf>,
    executables: HashSet<PathBuf>,
}

/// An in-memory filesystem keyed by absolute paths.
///
/// Executability is an explicit mark set via
/// [`InMemoryFileSystem::set_executable`]; content writes never imply it.
#[derive(Debug)]
pub struct InMemoryFileSystem {
    state: Mutex<InMemoryState>,
}

impl InMemoryFileSystem {
    /// Creates an empty in-memory filesystem containing only the root
    /// directory.
    pub fn new() -> Self {
        let mut state = InMemoryState::default();
        state.directories.insert(PathBuf::from("/"));
        InMemoryFileSystem {
            state: Mutex::new(state),
        }
    }

    /// Marks an existing file as executable.
    pub fn set_executable(&self, path: &Path) -> io::Result<()> {
        let mut state = self.state.lock().unwrap();
        if !state.files.contains_key(path) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", path.display()),
            ));
        }
        state.executables.insert(path.to_path_buf());
        Ok(())
    }
}

impl Default for InMemoryFileSystem {
    fn default() -> Self {
        InMemoryFileSystem::new()
    }
}

impl FileSystem for InMemoryFileSystem {
    fn exists(&self, path: &Path) -> bool {
        let state = self.state.lock().unwrap();
        state.files.contains_key(path) || state.directories.contains(path)
    }

    fn is_executable(&self, path: &Path) -> bool {
        self.state.lock().unwrap().executables.contains(path)
    }

    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        let state = self.state.lock().unwrap();
        state.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", path.display()),
            )
        })
    }

    fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let mut state = self.state.lock().unwrap();
        match path.parent() {
            Some(parent) if state.directories.contains(parent) => {
                state.files.insert(path.to_path_buf(), contents.to_vec());
                Ok(())
            }
            Some(parent) => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such directory: {}", parent.display()),
            )),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("cannot write to {}: no parent directory", path.display()),
            )),
        }
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        let mut state = self.state.lock().unwrap();
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            state.directories.insert(current.clone());
        }
        Ok(())
    }
}
