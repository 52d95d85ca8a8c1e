#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod backend;

#[doc(inline)]
pub use crate::backend::MemoryBackend;
