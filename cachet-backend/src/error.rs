//! Error types for backend operations.

use thiserror::Error;

use crate::format::FormatError;

/// Error type for backend operations.
///
/// This is a closed set: callers branch on the variant, never on error
/// messages. [`MissingKey`](Self::MissingKey) is the only variant a caller
/// is expected to handle programmatically; everything else is a failure to
/// surface.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The key is not present in the backend.
    ///
    /// Returned by `get_string`/`get_raw` for keys that were never written,
    /// have been removed, or have expired. The in-memory backend also
    /// returns it from `forget` when the key is in neither namespace.
    #[error("missing key")]
    MissingKey,

    /// Serialization or deserialization error.
    ///
    /// A stored payload could not be decoded into the requested shape, or a
    /// value could not be encoded before a write. Always distinct from
    /// [`MissingKey`](Self::MissingKey).
    #[error(transparent)]
    Format(#[from] FormatError),

    /// Internal backend error, state or computation error.
    ///
    /// Any failure not related to network interaction.
    #[error(transparent)]
    Internal(Box<dyn std::error::Error + Send + Sync>),

    /// Network interaction error.
    ///
    /// Failures reported while communicating with remote backends
    /// (e.g. Redis). The original client error is preserved as the source.
    #[error(transparent)]
    Connection(Box<dyn std::error::Error + Send + Sync>),
}

impl BackendError {
    /// Wraps an arbitrary error as an internal backend failure.
    pub fn internal<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Internal(Box::new(error))
    }

    /// Wraps an arbitrary error as a network interaction failure.
    pub fn connection<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Connection(Box::new(error))
    }

    /// Whether this error is the missing-key kind.
    pub fn is_missing_key(&self) -> bool {
        matches!(self, Self::MissingKey)
    }
}
