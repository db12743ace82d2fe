//! Newline-separated URL list files.
//!
//! The format is deliberately plain: one raw URL per line, no header. Files
//! round-trip losslessly through save/load except that surrounding blank
//! lines are trimmed away on load.

use crate::error::Result;
use std::fs;
use std::path::Path;

/// Save a URL list, creating parent directories as needed.
pub fn save_urls(path: impl AsRef<Path>, urls: &[String]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut content = urls.join("\n");
    content.push('\n');
    fs::write(path, content)?;

    tracing::debug!(path = %path.display(), count = urls.len(), "url list saved");
    Ok(())
}

/// Load a URL list saved by [`save_urls`].
///
/// Blank lines and surrounding whitespace are dropped; an empty file yields
/// an empty list.
pub fn load_urls(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToString::to_string)
        .collect())
}
