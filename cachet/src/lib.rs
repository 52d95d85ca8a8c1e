#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// The cache facade and the remember pattern.
pub mod cache;

/// Error types for cache operations.
pub mod error;

#[doc(inline)]
pub use crate::cache::Cache;
pub use crate::error::CacheError;

pub use cachet_backend::{Backend, BackendError, BackendResult, CacheBackend, FormatError};

/// The `cachet` prelude.
///
/// ```rust
/// use cachet::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{Backend, Cache, CacheBackend, CacheError};
}
