//! PathGuard - confine tool paths to the working root
//!
//! Resolution is purely lexical: the relative path is joined onto the root,
//! `.` and `..` segments are collapsed, and the result must sit under the
//! root on a path-segment boundary. Nothing here touches the filesystem.

use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// A path resolved outside the working root
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("\"{path}\" is outside the permitted working directory")]
pub struct ConfinementError {
    /// The path exactly as the caller supplied it
    pub path: String,
}

/// Collapse `.` and `..` segments without consulting the filesystem
///
/// `..` directly under the root (or a drive prefix) is dropped, the same way
/// the OS treats `/..`. Leading `..` on a relative path is preserved.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }

    out
}

/// Resolve `relative` against `root`, rejecting anything that escapes it
///
/// An absolute `relative` replaces the root entirely (as `Path::join` does),
/// so it is only accepted when it already points inside the root. The root
/// itself is an accepted resolution.
pub fn resolve(root: &Path, relative: &str) -> Result<PathBuf, ConfinementError> {
    debug!(?root, %relative, "resolve: called");
    let root = normalize(root);
    let candidate = normalize(&root.join(relative));

    // Path::starts_with compares whole components, so /work never matches /workshop
    if root.is_absolute() && candidate.starts_with(&root) {
        debug!(?candidate, "resolve: inside working root");
        Ok(candidate)
    } else {
        debug!(?candidate, "resolve: confinement violation");
        Err(ConfinementError {
            path: relative.to_string(),
        })
    }
}
