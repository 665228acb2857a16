//! Channel tree traversal.
//!
//! The walker visits a channel, descends into every sub-channel (each
//! subtree completes before its next sibling starts), and only then resolves
//! the channel's own videos and photo groups. Traversal uses an explicit
//! worklist instead of recursion, so hierarchy depth is bounded by memory,
//! not by the call stack.
//!
//! # Concurrency Model
//!
//! Strictly sequential: one API request in flight at a time, with a pacing
//! delay between successive leaf item resolutions. Do not parallelize; the
//! delay exists to respect the service's rate limits.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::client::{ApiError, CHANNEL_CONTENT_MASK, ChannelInfo, MediaServerApi};
use crate::item::{Item, describe};
use crate::links::DownloadLinkEntry;
use crate::resolver::LinkResolver;

/// Delay inserted between successive leaf item resolutions.
pub const DEFAULT_PACING_DELAY: Duration = Duration::from_millis(500);

/// Fatal traversal failures.
#[derive(Debug, Error)]
pub enum TraversalError {
    /// The root channel could not be looked up.
    #[error(
        "invalid or inaccessible channel '{oid}': {source}\n  Suggestion: check the channel oid and the access permissions of the API key"
    )]
    InvalidChannel {
        /// The requested root identifier.
        oid: String,
        /// The API failure.
        #[source]
        source: ApiError,
    },

    /// Listing a channel's content failed.
    #[error("failed to list content of channel '{oid}': {source}")]
    Content {
        /// The channel whose content listing failed.
        oid: String,
        /// The API failure.
        #[source]
        source: ApiError,
    },

    /// A channel is its own ancestor.
    #[error("channel hierarchy contains a cycle through '{oid}'")]
    ChannelCycle {
        /// The channel reached twice on one root-to-leaf path.
        oid: String,
    },
}

/// Counters collected during one walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraversalReport {
    /// Channels whose content was listed.
    pub channels_visited: usize,
    /// Leaf items handed to the resolver.
    pub items_visited: usize,
    /// Entries appended to the accumulator.
    pub entries_produced: usize,
    /// Items that resolved to no link (non-video or no usable resource).
    pub items_skipped: usize,
    /// Items whose resolution failed at the API.
    pub resolution_failures: usize,
}

enum Frame {
    Enter(ChannelInfo),
    Leaves { oid: String, items: Vec<Item> },
}

/// Walks a channel tree and resolves every leaf item.
pub struct ChannelWalker {
    api: Arc<dyn MediaServerApi>,
    resolver: LinkResolver,
    pacing_delay: Duration,
}

impl std::fmt::Debug for ChannelWalker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelWalker")
            .field("pacing_delay", &self.pacing_delay)
            .finish_non_exhaustive()
    }
}

impl ChannelWalker {
    /// Creates a walker with the default pacing delay.
    #[must_use]
    pub fn new(api: Arc<dyn MediaServerApi>) -> Self {
        Self {
            resolver: LinkResolver::new(Arc::clone(&api)),
            api,
            pacing_delay: DEFAULT_PACING_DELAY,
        }
    }

    /// Overrides the delay inserted between successive leaf resolutions.
    #[must_use]
    pub fn with_pacing_delay(mut self, pacing_delay: Duration) -> Self {
        self.pacing_delay = pacing_delay;
        self
    }

    /// Returns the configured pacing delay.
    #[must_use]
    pub fn pacing_delay(&self) -> Duration {
        self.pacing_delay
    }

    /// Looks up `root_oid` and walks its whole tree.
    ///
    /// # Errors
    ///
    /// Returns [`TraversalError::InvalidChannel`] when the root lookup fails;
    /// no entries are produced in that case. Other variants are returned as
    /// described on [`walk`](Self::walk).
    #[instrument(skip(self))]
    pub async fn run_traversal(
        &self,
        root_oid: &str,
    ) -> Result<Vec<DownloadLinkEntry>, TraversalError> {
        info!("gathering download links");
        let root = self
            .api
            .fetch_channel_metadata(root_oid)
            .await
            .map_err(|source| TraversalError::InvalidChannel {
                oid: root_oid.to_string(),
                source,
            })?;

        let mut entries = Vec::new();
        let report = self.walk(root, &mut entries).await?;
        info!(
            channels = report.channels_visited,
            items = report.items_visited,
            entries = report.entries_produced,
            skipped = report.items_skipped,
            failed = report.resolution_failures,
            "traversal complete"
        );
        Ok(entries)
    }

    /// Walks `channel`, appending one entry per resolved leaf to `accumulator`.
    ///
    /// Resolution failures are logged and skipped. A channel reached again
    /// after its subtree completed is skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`TraversalError::Content`] when a content listing fails and
    /// [`TraversalError::ChannelCycle`] when a channel is its own ancestor.
    /// Entries appended before the error remain in `accumulator`.
    pub async fn walk(
        &self,
        channel: ChannelInfo,
        accumulator: &mut Vec<DownloadLinkEntry>,
    ) -> Result<TraversalReport, TraversalError> {
        let mut report = TraversalReport::default();
        let mut ancestors: HashSet<String> = HashSet::new();
        let mut completed: HashSet<String> = HashSet::new();
        let mut stack = vec![Frame::Enter(channel)];
        let mut first_resolution = true;

        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Enter(channel) => {
                    if ancestors.contains(&channel.oid) {
                        return Err(TraversalError::ChannelCycle { oid: channel.oid });
                    }
                    if completed.contains(&channel.oid) {
                        warn!(oid = %channel.oid, "channel already walked, skipping");
                        continue;
                    }
                    info!(oid = %channel.oid, title = %channel.title, "processing channel");

                    let content = self
                        .api
                        .fetch_channel_content(&channel.oid, CHANNEL_CONTENT_MASK)
                        .await
                        .map_err(|source| TraversalError::Content {
                            oid: channel.oid.clone(),
                            source,
                        })?;
                    report.channels_visited += 1;

                    let (sub_channels, items) = content.into_leaf_items();
                    debug!(
                        oid = %channel.oid,
                        sub_channels = sub_channels.len(),
                        items = items.len(),
                        "listed channel content"
                    );
                    ancestors.insert(channel.oid.clone());
                    stack.push(Frame::Leaves {
                        oid: channel.oid,
                        items,
                    });
                    stack.extend(sub_channels.into_iter().rev().map(Frame::Enter));
                }
                Frame::Leaves { oid, items } => {
                    self.resolve_items(&items, accumulator, &mut report, &mut first_resolution)
                        .await;
                    ancestors.remove(&oid);
                    completed.insert(oid);
                }
            }
        }

        Ok(report)
    }

    async fn resolve_items(
        &self,
        items: &[Item],
        accumulator: &mut Vec<DownloadLinkEntry>,
        report: &mut TraversalReport,
        first_resolution: &mut bool,
    ) {
        let total = items.len();
        for (index, item) in items.iter().enumerate() {
            if !*first_resolution && !self.pacing_delay.is_zero() {
                tokio::time::sleep(self.pacing_delay).await;
            }
            *first_resolution = false;

            info!("processing item {}/{total}: {}", index + 1, describe(item));
            report.items_visited += 1;

            match self.resolver.resolve(item).await {
                Ok(Some(entry)) => {
                    accumulator.push(entry);
                    report.entries_produced += 1;
                }
                Ok(None) => report.items_skipped += 1,
                Err(error) => {
                    warn!(oid = %error.oid, error = %error, "error retrieving link, skipping item");
                    report.resolution_failures += 1;
                }
            }
        }
    }
}
