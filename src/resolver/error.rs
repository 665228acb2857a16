//! Error type for link resolution.

use thiserror::Error;

use crate::client::ApiError;

/// Link resolution for one media item failed at the API.
///
/// Carries the item identifier so the walker can log and skip it.
#[derive(Debug, Error)]
#[error("failed to resolve download link for '{oid}': {source}")]
pub struct ResolutionError {
    /// Identifier of the item being resolved.
    pub oid: String,
    /// The API failure.
    #[source]
    pub source: ApiError,
}

impl ResolutionError {
    /// Creates a resolution error for `oid`.
    pub fn new(oid: impl Into<String>, source: ApiError) -> Self {
        Self {
            oid: oid.into(),
            source,
        }
    }
}
