//! Chunked media fetching from a harvested link list.
//!
//! # Features
//!
//! - Streaming downloads (memory-efficient for large media)
//! - Bounded concurrency: one chunk of files in flight at a time
//! - Resume from any chunk index
//! - Duplicate filename handling (adds numeric suffix)
//! - Per-file failures are logged and counted, never fatal
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! use mediaserver_core::download::{ChunkedFetcher, HttpFileFetcher};
//! use mediaserver_core::links::load_links;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let entries = load_links(Path::new("download.json"))?;
//! let fetcher = Arc::new(HttpFileFetcher::new("./media")?);
//! let stats = ChunkedFetcher::new(fetcher, 5)?.fetch_all(&entries, 0).await?;
//! println!("{} saved, {} failed", stats.completed, stats.failed);
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

use async_trait::async_trait;

use crate::links::DownloadLinkEntry;

mod client;
mod constants;
mod engine;
mod error;
mod filename;

pub use client::HttpFileFetcher;
pub use constants::{
    CONNECT_TIMEOUT_SECS, DEFAULT_CHUNK_SIZE, DEFAULT_LINKS_FILE, FALLBACK_EXTENSION,
    READ_TIMEOUT_SECS,
};
pub use engine::{ChunkedFetcher, FetchStats, chunk_count, chunk_ranges};
pub use error::{ChunkError, FetchError};

/// Saves one link list entry somewhere and returns where it went.
#[async_trait]
pub trait FileFetcher: Send + Sync {
    /// Fetches `entry`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when the transfer or the write fails.
    async fn fetch(&self, entry: &DownloadLinkEntry) -> Result<PathBuf, FetchError>;
}
