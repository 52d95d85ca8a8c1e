//! Error types for Redis backend operations.

use cachet_backend::BackendError;
use redis::RedisError;

/// Error type for Redis backend operations.
///
/// Wraps errors from the underlying [`redis`] crate. Conversion into
/// [`BackendError`] classifies every client failure as a connection-kind
/// error; a nil reply for an absent key is translated to
/// [`BackendError::MissingKey`] before it ever reaches this type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An error from the underlying Redis client: connection failures,
    /// protocol errors, authentication failures, command errors.
    #[error("redis backend error: {0}")]
    Redis(#[from] RedisError),
}

impl From<Error> for BackendError {
    fn from(error: Error) -> Self {
        Self::connection(error)
    }
}
