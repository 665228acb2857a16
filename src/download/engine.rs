//! Chunked fetching of a harvested link list.
//!
//! The list is split into consecutive chunks of at most `chunk_size` entries.
//! All fetches of a chunk run concurrently and the next chunk starts only
//! after every fetch in the current one has settled. A failed fetch is logged
//! and counted; it never aborts the batch.

use std::ops::Range;
use std::sync::Arc;

use futures_util::future::join_all;
use tracing::{info, instrument, warn};

use super::FileFetcher;
use super::error::ChunkError;
use crate::links::DownloadLinkEntry;

/// Outcome counters for one [`ChunkedFetcher::fetch_all`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchStats {
    /// Entries saved to disk.
    pub completed: usize,
    /// Entries whose fetch failed.
    pub failed: usize,
    /// Chunks processed in this run.
    pub processed_chunks: usize,
    /// Chunks before the start index that were not touched.
    pub skipped_chunks: usize,
}

impl FetchStats {
    /// Entries attempted in this run.
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.completed + self.failed
    }

    /// `true` when every attempted entry was saved.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

/// Number of chunks needed for `len` entries. A `chunk_size` of `0` yields `0`.
#[must_use]
pub fn chunk_count(len: usize, chunk_size: usize) -> usize {
    if chunk_size == 0 {
        return 0;
    }
    len.div_ceil(chunk_size)
}

/// Index ranges of the consecutive chunks of a `len`-entry list.
#[must_use]
pub fn chunk_ranges(len: usize, chunk_size: usize) -> Vec<Range<usize>> {
    (0..chunk_count(len, chunk_size))
        .map(|idx| {
            let start = idx * chunk_size;
            start..(start + chunk_size).min(len)
        })
        .collect()
}

/// Fetches a link list chunk by chunk through a [`FileFetcher`].
pub struct ChunkedFetcher {
    fetcher: Arc<dyn FileFetcher>,
    chunk_size: usize,
}

impl std::fmt::Debug for ChunkedFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkedFetcher")
            .field("chunk_size", &self.chunk_size)
            .finish_non_exhaustive()
    }
}

impl ChunkedFetcher {
    /// Creates a chunked fetcher.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::InvalidChunkSize`] when `chunk_size` is zero.
    pub fn new(fetcher: Arc<dyn FileFetcher>, chunk_size: usize) -> Result<Self, ChunkError> {
        if chunk_size == 0 {
            return Err(ChunkError::InvalidChunkSize { value: chunk_size });
        }
        Ok(Self {
            fetcher,
            chunk_size,
        })
    }

    /// Returns the configured chunk size.
    #[must_use]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Fetches `entries` starting at the zero-based chunk `start_chunk`.
    ///
    /// An empty list is a no-op. Individual fetch failures are reported in
    /// the returned [`FetchStats`].
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::StartOutOfRange`] when `start_chunk` does not
    /// name a chunk of a non-empty list.
    #[instrument(skip(self, entries), fields(entries = entries.len(), chunk_size = self.chunk_size))]
    pub async fn fetch_all(
        &self,
        entries: &[DownloadLinkEntry],
        start_chunk: usize,
    ) -> Result<FetchStats, ChunkError> {
        if entries.is_empty() {
            info!("link list is empty, nothing to download");
            return Ok(FetchStats::default());
        }

        let ranges = chunk_ranges(entries.len(), self.chunk_size);
        let total = ranges.len();
        if start_chunk >= total {
            return Err(ChunkError::StartOutOfRange {
                start: start_chunk,
                total,
            });
        }

        let mut stats = FetchStats {
            skipped_chunks: start_chunk,
            ..FetchStats::default()
        };
        if start_chunk > 0 {
            info!(skipped = start_chunk, "resuming after skipped chunks");
        }

        for (idx, range) in ranges.into_iter().enumerate().skip(start_chunk) {
            info!("downloading chunk {} of {total}", idx + 1);
            let chunk = &entries[range];
            let results = join_all(chunk.iter().map(|entry| self.fetcher.fetch(entry))).await;

            for (entry, result) in chunk.iter().zip(results) {
                match result {
                    Ok(_) => stats.completed += 1,
                    Err(error) => {
                        stats.failed += 1;
                        warn!(
                            filename = %entry.filename,
                            url = %entry.download_link,
                            error = %error,
                            "download failed"
                        );
                    }
                }
            }
            stats.processed_chunks += 1;
        }

        info!(
            completed = stats.completed,
            failed = stats.failed,
            chunks = stats.processed_chunks,
            "download batch finished"
        );
        Ok(stats)
    }
}
