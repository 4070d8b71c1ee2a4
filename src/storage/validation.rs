//! Path validation
//!
//! Resolves client supplied paths against the session directory and keeps
//! every transfer inside the session's jail root. Containment is checked on
//! canonical paths component by component, so `..` segments, symlinks and
//! sibling directories sharing the root's name as a prefix cannot escape.

use std::io;
use std::path::{Component, Path, PathBuf};

use crate::error::StorageError;

/// True when `candidate` lies strictly below `root`. Both must be canonical.
pub fn is_within_root(root: &Path, candidate: &Path) -> bool {
    candidate != root && candidate.starts_with(root)
}

fn canonicalize(path: &Path) -> Result<PathBuf, StorageError> {
    path.canonicalize().map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => StorageError::NotFound(path.to_path_buf()),
        _ => StorageError::Io(e),
    })
}

/// Resolves the source of a download. The file must exist, be a regular
/// file and canonicalize inside `root`.
pub fn resolve_existing_file(root: &Path, cwd: &Path, raw: &str) -> Result<PathBuf, StorageError> {
    let real = canonicalize(&cwd.join(raw))?;
    if !is_within_root(root, &real) {
        return Err(StorageError::OutsideRoot(real));
    }
    if !real.is_file() {
        return Err(StorageError::NotAFile(real));
    }
    Ok(real)
}

/// Resolves the destination of an upload.
///
/// The parent directory must exist inside the jail and the last component
/// must be a plain file name. An existing target is resolved through any
/// symlink and must itself stay inside the jail and not be a directory.
pub fn resolve_upload_target(root: &Path, cwd: &Path, raw: &str) -> Result<PathBuf, StorageError> {
    let joined = cwd.join(raw);

    let name = match joined.components().next_back() {
        Some(Component::Normal(name)) => name.to_os_string(),
        _ => return Err(StorageError::InvalidName(raw.to_string())),
    };
    let parent = joined
        .parent()
        .ok_or_else(|| StorageError::InvalidName(raw.to_string()))?;

    let parent = canonicalize(parent)?;
    if parent != root && !is_within_root(root, &parent) {
        return Err(StorageError::OutsideRoot(parent));
    }

    let target = parent.join(name);
    if target.symlink_metadata().is_err() {
        return Ok(target);
    }

    let real = canonicalize(&target)?;
    if !is_within_root(root, &real) {
        return Err(StorageError::OutsideRoot(real));
    }
    if real.is_dir() {
        return Err(StorageError::NotAFile(real));
    }
    Ok(real)
}
