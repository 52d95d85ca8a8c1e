//! Error types for cache operations.

use cachet_backend::BackendError;
use thiserror::Error;

/// Error type for facade operations.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The storage backend failed.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// The compute callback of a `remember` call failed.
    ///
    /// The cache was left untouched: nothing was written.
    #[error("upstream source failed: {0}")]
    Upstream(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl CacheError {
    /// Whether this error is the backend's missing-key kind.
    pub fn is_missing_key(&self) -> bool {
        matches!(self, Self::Backend(error) if error.is_missing_key())
    }
}
