//! Direct download link resolution for single media items.
//!
//! Only videos yield a link. For a video the resolver lists its encoded
//! resources, prefers the largest one that is not a streaming manifest, and
//! asks the service for a time-limited direct URL to it.

mod error;

pub use error::ResolutionError;

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::client::{MediaServerApi, MediaResource};
use crate::item::{Item, ItemKind};
use crate::links::DownloadLinkEntry;

/// Resolves media items to [`DownloadLinkEntry`] values.
#[derive(Clone)]
pub struct LinkResolver {
    api: Arc<dyn MediaServerApi>,
}

impl std::fmt::Debug for LinkResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkResolver").finish_non_exhaustive()
    }
}

impl LinkResolver {
    /// Creates a resolver backed by `api`.
    #[must_use]
    pub fn new(api: Arc<dyn MediaServerApi>) -> Self {
        Self { api }
    }

    /// Resolves one item.
    ///
    /// Returns `Ok(None)` without any API call for non-video items (and for
    /// identifiers of unknown kind), and `Ok(None)` when the video has no
    /// downloadable, non-manifest resource.
    ///
    /// The entry's `filename` is the raw item title; it is not filesystem-safe.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError`] when listing resources or resolving the
    /// download URL fails.
    #[instrument(skip(self, item), fields(oid = %item.oid))]
    pub async fn resolve(&self, item: &Item) -> Result<Option<DownloadLinkEntry>, ResolutionError> {
        match item.kind() {
            Ok(ItemKind::Video) => {}
            Ok(kind) => {
                debug!(%kind, "no direct file for this kind");
                return Ok(None);
            }
            Err(error) => {
                warn!(error = %error, "excluding item from resolution");
                return Ok(None);
            }
        }

        let resources = self
            .api
            .list_media_resources(&item.oid)
            .await
            .map_err(|e| ResolutionError::new(&item.oid, e))?;
        let available = resources.len();

        let Some(best) = select_best_resource(resources) else {
            debug!(available, "no downloadable resource");
            return Ok(None);
        };
        debug!(format = %best.format, size = best.file_size, "selected resource");

        let url = self
            .api
            .resolve_download_url(&item.oid, &best.file, false)
            .await
            .map_err(|e| ResolutionError::new(&item.oid, e))?;

        Ok(Some(DownloadLinkEntry::new(item.title.clone(), url)))
    }
}

/// Picks the largest resource that is not a streaming manifest.
///
/// Sorting is stable, so equal sizes keep response order. Returns `None` for
/// an empty list or when every resource is a manifest.
#[must_use]
pub fn select_best_resource(mut resources: Vec<MediaResource>) -> Option<MediaResource> {
    resources.sort_by(|a, b| b.file_size.cmp(&a.file_size));
    resources.into_iter().find(|resource| !resource.is_manifest())
}
