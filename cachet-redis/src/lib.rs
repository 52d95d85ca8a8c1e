#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod backend;
pub mod error;
pub mod multiplexed;

#[doc(inline)]
pub use crate::backend::{RedisBackend, RedisBackendBuilder};
pub use crate::error::Error;
#[doc(inline)]
pub use crate::multiplexed::MultiplexedRedisBackend;
