//! Exit code logic for the mediaserver-dl process.
//!
//! Single responsibility: map command results to the process exit outcome.

use std::path::Path;

use mediaserver_core::{FetchStats, TraversalError};
use tracing::{error, info, warn};

use crate::ProcessExit;

/// Determines the exit outcome of a `fetch` run that went through every chunk.
///
/// Per-file failures are already logged one by one; they are summarized here
/// and never fail the process.
pub(crate) fn determine_fetch_outcome(stats: &FetchStats, output_dir: &Path) -> ProcessExit {
    if stats.all_succeeded() {
        info!(
            completed = stats.completed,
            output_dir = %output_dir.display(),
            "fetch finished"
        );
    } else {
        warn!(
            completed = stats.completed,
            failed = stats.failed,
            output_dir = %output_dir.display(),
            "fetch finished with failed files"
        );
    }
    ProcessExit::Success
}

/// Reports a fatal traversal error and returns the failing outcome.
pub(crate) fn traversal_failure(error: &TraversalError) -> ProcessExit {
    match error {
        TraversalError::InvalidChannel { oid, .. } => {
            error!(
                oid = %oid,
                "please enter a valid channel oid or check access permissions: {error}"
            );
        }
        TraversalError::Content { .. } | TraversalError::ChannelCycle { .. } => {
            error!("traversal aborted: {error}");
        }
    }
    ProcessExit::Failure
}
