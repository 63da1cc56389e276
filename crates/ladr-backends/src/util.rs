//! Utility functions shared across backends

use std::path::{Path, PathBuf};

/// Expands `~` to the user's home directory in paths.
///
/// # Examples
///
/// ```
/// use ladr_backends::util::expand_home_dir;
/// use std::path::PathBuf;
///
/// // Paths starting with ~/ are expanded
/// if let Some(path) = expand_home_dir("~/ladr/bin") {
///     assert!(path.to_string_lossy().ends_with("ladr/bin"));
/// }
///
/// // Absolute paths are returned as-is
/// let path = expand_home_dir("/opt/ladr/bin");
/// assert_eq!(path, Some(PathBuf::from("/opt/ladr/bin")));
/// ```
#[must_use]
pub fn expand_home_dir(path: &str) -> Option<PathBuf> {
    if let Some(rest) = path.strip_prefix("~/") {
        dirs::home_dir().map(|home| home.join(rest))
    } else {
        Some(PathBuf::from(path))
    }
}

/// Locate `name` inside `dir`, preferring the Windows `.exe` form.
///
/// Returns the plain path as the error value so callers can report where
/// they looked.
pub fn find_binary(dir: &Path, name: &str) -> Result<PathBuf, PathBuf> {
    let exe = dir.join(format!("{name}.exe"));
    if exe.is_file() {
        return Ok(exe);
    }
    let plain = dir.join(name);
    if plain.is_file() {
        Ok(plain)
    } else {
        Err(plain)
    }
}

/// Collapse a tool report to its first lines for log messages
pub fn head_lines(text: &str, n: usize) -> String {
    text.lines().take(n).collect::<Vec<_>>().join("; ")
}
