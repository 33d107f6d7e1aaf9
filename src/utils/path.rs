//! Path utilities

use std::path::{Path, PathBuf};

/// Render a path with forward slashes regardless of platform
pub fn to_forward_slashes(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Quote a path for an ffmpeg concat manifest line
pub fn concat_manifest_entry(path: &Path) -> String {
    let escaped = to_forward_slashes(path).replace('\'', r"'\''");
    format!("file '{}'", escaped)
}

/// Resolve a path against the working directory without touching the file system
pub fn absolutize(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Directory containing `path`; `.` for a bare file name
pub fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
