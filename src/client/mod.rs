//! MediaServer API surface consumed by the harvesting pipeline.
//!
//! # Architecture
//!
//! - [`MediaServerApi`] - Async trait with the five operations the pipeline needs
//! - [`HttpMediaServerClient`] - Production implementation over reqwest
//! - [`ChannelInfo`], [`ChannelContent`], [`MediaResource`] - Response models
//! - [`ApiError`] - Transport, status, and decoding failures
//!
//! The walker and resolver only ever see `Arc<dyn MediaServerApi>`, so tests
//! substitute scripted implementations without a network.

mod error;
mod http;

pub use error::ApiError;
pub use http::HttpMediaServerClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::item::Item;

/// Content mask requesting sub-channels, videos, and photo groups.
pub const CHANNEL_CONTENT_MASK: &str = "cvp";

/// Format tag of adaptive-streaming manifests (not a single downloadable file).
pub const MANIFEST_FORMAT: &str = "m3u8";

/// Metadata describing a channel node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelInfo {
    /// Channel identifier (`c…`).
    pub oid: String,
    /// Channel title.
    #[serde(default)]
    pub title: String,
}

impl ChannelInfo {
    /// Creates channel metadata.
    #[must_use]
    pub fn new(oid: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            oid: oid.into(),
            title: title.into(),
        }
    }
}

/// Direct children of one channel, in server order.
///
/// Missing lists in the response are treated as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ChannelContent {
    /// Sub-channels.
    #[serde(default)]
    pub channels: Vec<ChannelInfo>,
    /// Videos.
    #[serde(default)]
    pub videos: Vec<Item>,
    /// Photo groups.
    #[serde(default)]
    pub photos_groups: Vec<Item>,
}

impl ChannelContent {
    /// Consumes the content and returns the leaf items: videos, then photo groups.
    #[must_use]
    pub fn into_leaf_items(self) -> (Vec<ChannelInfo>, Vec<Item>) {
        let mut leaves = self.videos;
        leaves.extend(self.photos_groups);
        (self.channels, leaves)
    }
}

/// One encoded rendition of a video.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MediaResource {
    /// Format tag (`mp4`, `m3u8`, ...).
    #[serde(default)]
    pub format: String,
    /// Size in bytes; absent sizes sort last.
    #[serde(default)]
    pub file_size: u64,
    /// Source locator passed back to the download endpoint.
    pub file: String,
}

impl MediaResource {
    /// Returns true for adaptive-streaming manifests.
    #[must_use]
    pub fn is_manifest(&self) -> bool {
        self.format.eq_ignore_ascii_case(MANIFEST_FORMAT)
    }
}

/// Capability contract for the remote media service.
///
/// # Object Safety
///
/// Uses `async_trait` so implementations can be shared as
/// `Arc<dyn MediaServerApi>` across the walker and resolver.
#[async_trait]
pub trait MediaServerApi: Send + Sync {
    /// Fetches metadata for one channel.
    async fn fetch_channel_metadata(&self, oid: &str) -> Result<ChannelInfo, ApiError>;

    /// Lists the direct content of a channel, filtered by `mask`.
    async fn fetch_channel_content(
        &self,
        parent_oid: &str,
        mask: &str,
    ) -> Result<ChannelContent, ApiError>;

    /// Lists every encoded resource of a media item.
    async fn list_media_resources(&self, oid: &str) -> Result<Vec<MediaResource>, ApiError>;

    /// Obtains a time-limited direct URL for one resource.
    ///
    /// With `redirect == false` the service returns the target URL instead of
    /// redirecting to it.
    async fn resolve_download_url(
        &self,
        oid: &str,
        locator: &str,
        redirect: bool,
    ) -> Result<String, ApiError>;

    /// Verifies the service is reachable and the credentials are accepted.
    async fn health_check(&self) -> Result<(), ApiError>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_content_missing_lists_default_empty() {
        let content: ChannelContent = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(content.channels.is_empty());
        assert!(content.videos.is_empty());
        assert!(content.photos_groups.is_empty());
    }

    #[test]
    fn test_leaf_items_videos_before_photos() {
        let content = ChannelContent {
            channels: vec![ChannelInfo::new("c2", "sub")],
            videos: vec![Item::new("v1", "a"), Item::new("v2", "b")],
            photos_groups: vec![Item::new("p1", "c")],
        };
        let (channels, leaves) = content.into_leaf_items();
        assert_eq!(channels.len(), 1);
        let oids: Vec<_> = leaves.iter().map(|item| item.oid.as_str()).collect();
        assert_eq!(oids, ["v1", "v2", "p1"]);
    }

    #[test]
    fn test_manifest_detection_is_case_insensitive() {
        let resource = MediaResource {
            format: "M3U8".to_string(),
            file_size: 1,
            file: "x".to_string(),
        };
        assert!(resource.is_manifest());
    }
}
