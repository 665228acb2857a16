//! Persisted download link list.
//!
//! The harvested list is a pretty-printed JSON array of
//! `{"filename": …, "download_link": …}` records, in traversal order. Saving
//! writes a sibling temporary file and renames it over the destination, so a
//! failed save never leaves a truncated list behind.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

/// One resolved direct link.
///
/// `filename` is the raw item title and may contain characters that are not
/// valid in file names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadLinkEntry {
    /// Raw media title.
    pub filename: String,
    /// Time-limited direct download URL.
    pub download_link: String,
}

impl DownloadLinkEntry {
    /// Creates an entry.
    #[must_use]
    pub fn new(filename: impl Into<String>, download_link: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            download_link: download_link.into(),
        }
    }
}

/// Errors raised while saving or loading a link list.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Filesystem failure (permissions, disk full, missing file).
    #[error("IO error on link list {}: {source}", path.display())]
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The list could not be encoded or decoded as JSON.
    #[error("invalid link list {}: {source}", path.display())]
    Json {
        /// Path being read or written.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

impl PersistenceError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn json(path: &Path, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Writes `entries` to `path`, replacing any previous content.
///
/// # Errors
///
/// Returns [`PersistenceError`] when the file cannot be written or renamed.
#[instrument(skip(entries), fields(path = %path.display(), count = entries.len()))]
pub fn save_links(entries: &[DownloadLinkEntry], path: &Path) -> Result<(), PersistenceError> {
    let tmp_path = temporary_path(path);
    let result = write_json(entries, &tmp_path).and_then(|()| {
        fs::rename(&tmp_path, path).map_err(|e| PersistenceError::io(path, e))
    });
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result?;
    debug!("link list saved");
    Ok(())
}

/// Reads a link list previously written by [`save_links`].
///
/// # Errors
///
/// Returns [`PersistenceError`] when the file is missing, unreadable, or not a
/// JSON list of entries.
#[instrument(fields(path = %path.display()))]
pub fn load_links(path: &Path) -> Result<Vec<DownloadLinkEntry>, PersistenceError> {
    let file = File::open(path).map_err(|e| PersistenceError::io(path, e))?;
    let entries: Vec<DownloadLinkEntry> = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| PersistenceError::json(path, e))?;
    debug!(count = entries.len(), "link list loaded");
    Ok(entries)
}

fn write_json(entries: &[DownloadLinkEntry], path: &Path) -> Result<(), PersistenceError> {
    let file = File::create(path).map_err(|e| PersistenceError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, entries)
        .map_err(|e| PersistenceError::json(path, e))?;
    writer
        .flush()
        .map_err(|e| PersistenceError::io(path, e))?;
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| PersistenceError::io(path, e))
}

fn temporary_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(std::ffi::OsStr::to_os_string)
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
