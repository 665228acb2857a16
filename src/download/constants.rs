//! Constants for the download module (timeouts, batching, file naming).

/// Default HTTP connect timeout for file transfers (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default HTTP read timeout for file transfers (30 minutes for large media).
pub const READ_TIMEOUT_SECS: u64 = 1800;

/// Default number of files fetched concurrently in one chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 5;

/// Default file the harvested link list is written to.
pub const DEFAULT_LINKS_FILE: &str = "download.json";

/// Extension used when neither the URL nor the response names one.
pub const FALLBACK_EXTENSION: &str = ".bin";
