//! Error types for the download module.
//!
//! [`FetchError`] describes a single file transfer failure; it is logged and
//! counted by the chunked fetcher, never propagated. [`ChunkError`] rejects
//! invalid batching parameters before any transfer starts.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while fetching one file.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error downloading {url}: {source}")]
    Network {
        /// The URL that failed to download.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout downloading {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// HTTP error response. Direct links are time-limited, so 403/410 usually
    /// mean the link list is stale.
    #[error("HTTP {status} downloading {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// File system error during download (create file, write, etc.)
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The provided URL is malformed or invalid.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },

    /// The HTTP client could not be constructed.
    #[error("HTTP client construction failed: {source}")]
    Client {
        /// The underlying builder error.
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// Creates a network error, mapping timeouts to [`FetchError::Timeout`].
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout { url: url.into() }
        } else {
            Self::Network {
                url: url.into(),
                source,
            }
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }
}

/// Invalid batching parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChunkError {
    /// Chunk size of zero.
    #[error("invalid chunk size {value}: must be at least 1")]
    InvalidChunkSize {
        /// The rejected value.
        value: usize,
    },

    /// Resume index does not name an existing chunk.
    #[error("start chunk {start} is out of range: the list has {total} chunk(s)")]
    StartOutOfRange {
        /// Requested zero-based start index.
        start: usize,
        /// Number of chunks in the list.
        total: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_http_status_display() {
        let msg = FetchError::http_status("https://cdn.example.com/a.mp4", 410).to_string();
        assert!(msg.contains("410"), "Expected '410' in: {msg}");
        assert!(msg.contains("https://cdn.example.com/a.mp4"), "Expected URL in: {msg}");
    }

    #[test]
    fn test_fetch_error_io_display() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let msg = FetchError::io(PathBuf::from("/tmp/a.mp4"), io_error).to_string();
        assert!(msg.contains("/tmp/a.mp4"), "Expected path in: {msg}");
    }

    #[test]
    fn test_fetch_error_timeout_display() {
        let msg = FetchError::Timeout {
            url: "https://cdn.example.com/a.mp4".to_string(),
        }
        .to_string();
        assert!(msg.contains("timeout"));
    }

    #[test]
    fn test_chunk_error_display() {
        let msg = ChunkError::StartOutOfRange { start: 4, total: 3 }.to_string();
        assert!(msg.contains('4') && msg.contains('3'), "{msg}");
        let msg = ChunkError::InvalidChunkSize { value: 0 }.to_string();
        assert!(msg.contains("at least 1"), "{msg}");
    }
}
