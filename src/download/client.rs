//! HTTP file fetcher streaming resolved links to disk.
//!
//! Each [`DownloadLinkEntry`] is saved as `<sanitized title><ext>` inside the
//! output directory. The extension comes from the URL path, then from the
//! `Content-Type` header, else `.bin`. Existing files are never overwritten:
//! `name_2.mp4`, `name_3.mp4`, ... are tried in turn.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument};
use url::Url;

use super::FileFetcher;
use super::constants::{CONNECT_TIMEOUT_SECS, FALLBACK_EXTENSION, READ_TIMEOUT_SECS};
use super::error::FetchError;
use super::filename::{extension_from_content_type, extension_from_url, sanitize_filename};
use crate::links::DownloadLinkEntry;
use crate::user_agent;

/// Upper bound on numeric suffixes tried for a taken filename.
const MAX_NAME_SUFFIX: usize = 1000;

/// Fetches direct links over HTTP into one output directory.
///
/// Create once and share; the reqwest client pools connections across the
/// concurrent fetches of a chunk.
#[derive(Debug, Clone)]
pub struct HttpFileFetcher {
    client: Client,
    output_dir: PathBuf,
}

impl HttpFileFetcher {
    /// Creates a fetcher with default timeouts.
    ///
    /// Default configuration:
    /// - Connect timeout: 30 seconds
    /// - Read timeout: 30 minutes between body reads
    /// - Gzip decompression: enabled
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] when the HTTP client cannot be built.
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self, FetchError> {
        Self::with_timeouts(output_dir, CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS)
    }

    /// Creates a fetcher with explicit timeout values.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] when the HTTP client cannot be built.
    pub fn with_timeouts(
        output_dir: impl Into<PathBuf>,
        connect_timeout_secs: u64,
        read_timeout_secs: u64,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .read_timeout(Duration::from_secs(read_timeout_secs))
            .gzip(true)
            .user_agent(user_agent::default_download_user_agent())
            .build()
            .map_err(|source| FetchError::Client { source })?;
        Ok(Self {
            client,
            output_dir: output_dir.into(),
        })
    }

    /// Returns the directory files are written to.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Downloads one entry and returns the path it was saved to.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if:
    /// - The URL is invalid
    /// - The request fails (network error, timeout)
    /// - The server returns an error status (4xx, 5xx)
    /// - Writing to disk fails
    #[instrument(skip(self, entry), fields(url = %entry.download_link))]
    pub async fn download_entry(&self, entry: &DownloadLinkEntry) -> Result<PathBuf, FetchError> {
        let url = entry.download_link.as_str();
        let parsed_url = Url::parse(url).map_err(|_| FetchError::invalid_url(url))?;
        debug!("starting download");

        let response = self
            .client
            .get(parsed_url.clone())
            .send()
            .await
            .map_err(|e| FetchError::network(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::http_status(url, status.as_u16()));
        }

        let extension = extension_from_url(&parsed_url)
            .or_else(|| {
                response
                    .headers()
                    .get(CONTENT_TYPE)
                    .and_then(|value| value.to_str().ok())
                    .and_then(extension_from_content_type)
                    .map(str::to_string)
            })
            .unwrap_or_else(|| FALLBACK_EXTENSION.to_string());
        let stem = sanitize_filename(&entry.filename);

        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| FetchError::io(self.output_dir.clone(), e))?;
        let (mut file, file_path) = create_unique_file(&self.output_dir, &stem, &extension).await?;
        debug!(path = %file_path.display(), "resolved output path");

        let stream_result = stream_to_file(&mut file, response, url, &file_path).await;
        let bytes = match stream_result {
            Ok(bytes) => bytes,
            Err(error) => {
                debug!(path = %file_path.display(), "cleaning up partial file after error");
                drop(file);
                let _ = tokio::fs::remove_file(&file_path).await;
                return Err(error);
            }
        };

        info!(path = %file_path.display(), bytes, "download complete");
        Ok(file_path)
    }
}

#[async_trait]
impl FileFetcher for HttpFileFetcher {
    async fn fetch(&self, entry: &DownloadLinkEntry) -> Result<PathBuf, FetchError> {
        self.download_entry(entry).await
    }
}

/// Atomically creates `<stem><ext>`, or the first free `<stem>_<n><ext>`.
///
/// `create_new` keeps two concurrent fetches of equally titled entries from
/// writing into the same file.
async fn create_unique_file(
    dir: &Path,
    stem: &str,
    extension: &str,
) -> Result<(File, PathBuf), FetchError> {
    let candidates = std::iter::once(format!("{stem}{extension}"))
        .chain((2..MAX_NAME_SUFFIX).map(|n| format!("{stem}_{n}{extension}")));

    for name in candidates {
        let path = dir.join(name);
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => return Ok((file, path)),
            Err(error) if error.kind() == ErrorKind::AlreadyExists => {}
            Err(error) => return Err(FetchError::io(path, error)),
        }
    }

    let path = dir.join(format!("{stem}{extension}"));
    Err(FetchError::io(
        path,
        std::io::Error::new(ErrorKind::AlreadyExists, "no free filename suffix left"),
    ))
}

async fn stream_to_file(
    file: &mut File,
    response: reqwest::Response,
    url: &str,
    file_path: &Path,
) -> Result<u64, FetchError> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| FetchError::network(url, e))?;

        writer
            .write_all(&chunk)
            .await
            .map_err(|e| FetchError::io(file_path.to_path_buf(), e))?;

        bytes_written += chunk.len() as u64;
    }

    writer
        .flush()
        .await
        .map_err(|e| FetchError::io(file_path.to_path_buf(), e))?;

    Ok(bytes_written)
}
