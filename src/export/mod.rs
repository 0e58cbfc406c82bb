//! Writes downloaded report files to disk.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::api::reports::Download;

/// Strips anything that could escape `dir` or upset a filesystem.
pub(crate) fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.').to_string();
    if cleaned.is_empty() {
        "relatorio".to_string()
    } else {
        cleaned
    }
}

/// Saves the download under `dir`, staging it in a temp file in the same
/// directory so a failed write never leaves a partial file behind.
pub(crate) fn save(download: &Download, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let target = dir.join(sanitize_filename(&download.filename));
    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
    tmp.write_all(&download.bytes)
        .context("Failed to write export")?;
    tmp.flush().context("Failed to write export")?;
    tmp.persist(&target)
        .with_context(|| format!("Failed to save {}", target.display()))?;

    tracing::info!(path = %target.display(), size = download.bytes.len(), "Export saved");
    Ok(target)
}
