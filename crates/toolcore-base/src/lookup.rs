//! Executable resolution and search-path string parsing.
//!
//! [`resolve_executable`] answers "which binary would run for this name":
//! an absolute name is checked directly, a bare name is probed first in the
//! current directory and then in each search path in order. First match
//! wins. [`split_search_path`] turns a `PATH`-style string into that ordered
//! list of absolute, lexically normalized directories.
//!
//! Both are pure queries: no mutation, no caching, and `split_search_path`
//! never touches the filesystem at all.

use std::path::{Component, Path, PathBuf};

use crate::fs::FileSystem;

/// Separator between entries of a `PATH`-style string.
pub const PATH_LIST_SEPARATOR: char = if cfg!(windows) { ';' } else { ':' };

/// Resolves an executable name to an absolute path.
///
/// Returns `None` for an absent or empty name. An absolute `name` resolves
/// to itself when it exists and is executable. A bare name is probed as
/// `cwd/name` before any entry of `search_paths`; the current directory
/// always takes priority over the search paths.
pub fn resolve_executable(
    name: Option<&str>,
    cwd: &Path,
    search_paths: &[PathBuf],
    fs: &dyn FileSystem,
) -> Option<PathBuf> {
    let name = match name {
        Some(name) if !name.is_empty() => name,
        _ => return None,
    };

    if Path::new(name).is_absolute() {
        let candidate = PathBuf::from(name);
        if fs.exists(&candidate) && fs.is_executable(&candidate) {
            return Some(candidate);
        }
        return None;
    }

    let local = cwd.join(name);
    if fs.exists(&local) && fs.is_executable(&local) {
        return Some(local);
    }

    search_paths
        .iter()
        .map(|directory| directory.join(name))
        .find(|candidate| fs.exists(candidate) && fs.is_executable(candidate))
}

/// Splits a `PATH`-style string into an ordered list of absolute paths.
///
/// An absent or empty `raw` yields an empty list. Relative components are
/// joined onto `cwd`, and every entry is lexically normalized. Empty
/// components produced by consecutive separators contribute no entry
/// (strict POSIX `PATH` semantics would treat them as the current
/// directory).
pub fn split_search_path(raw: Option<&str>, cwd: &Path) -> Vec<PathBuf> {
    let raw = match raw {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Vec::new(),
    };

    raw.split(PATH_LIST_SEPARATOR)
        .filter(|component| !component.is_empty())
        .map(|component| {
            let path = Path::new(component);
            if path.is_absolute() {
                normalize_lexically(path)
            } else {
                normalize_lexically(&cwd.join(path))
            }
        })
        .collect()
}

/// Resolves `.` and `..` segments and strips any trailing separator without
/// consulting the filesystem.
///
/// A `..` at the root stays at the root; leading `..` segments of a
/// relative path are preserved.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => normalized.push(prefix.as_os_str()),
            Component::RootDir => normalized.push(Component::RootDir.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                let last_is_normal = matches!(
                    normalized.components().next_back(),
                    Some(Component::Normal(_))
                );
                if last_is_normal {
                    normalized.pop();
                } else if !normalized.has_root() {
                    // Leading ".." of a relative path accumulates; ".." at
                    // the root stays at the root.
                    normalized.push(Component::ParentDir.as_os_str());
                }
            }
            Component::Normal(part) => normalized.push(part),
        }
    }
    normalized
}
