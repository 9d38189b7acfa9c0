//! Relative path handling for lookups inside a tree

use crate::error::{Result, VfsError};

/// Split a relative, slash-separated path into its components.
///
/// Repeated and trailing separators are ignored, as are `.` components.
/// `"a/b/"` and `"a//b"` both yield `["a", "b"]`. Components are otherwise
/// kept byte for byte, whitespace included.
pub fn split_path(path: &str) -> Result<Vec<&str>> {
    if path.is_empty() {
        return Err(VfsError::EmptyPath);
    }
    if path.starts_with('/') {
        return Err(VfsError::AbsolutePath(path.to_string()));
    }

    let parts: Vec<&str> = path
        .split('/')
        .filter(|part| !part.is_empty() && *part != ".")
        .collect();
    if parts.is_empty() {
        return Err(VfsError::EmptyPath);
    }
    Ok(parts)
}
