//! Structured value codec.
//!
//! Structured values cross the [`Backend`](crate::Backend) boundary as raw
//! bytes; this module owns the encoding between caller types and those
//! bytes. JSON is the single wire format.

use bytes::Bytes;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

/// Error type for codec failures.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The value could not be encoded.
    #[error(transparent)]
    Serialize(Box<dyn std::error::Error + Send + Sync>),

    /// The stored payload could not be decoded into the requested shape.
    #[error(transparent)]
    Deserialize(Box<dyn std::error::Error + Send + Sync>),
}

/// JSON codec for structured values.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat;

impl JsonFormat {
    /// Encodes a value to its JSON byte representation.
    pub fn serialize<T>(&self, value: &T) -> Result<Bytes, FormatError>
    where
        T: Serialize + ?Sized,
    {
        serde_json::to_vec(value)
            .map(Bytes::from)
            .map_err(|error| FormatError::Serialize(Box::new(error)))
    }

    /// Decodes a JSON payload into a caller-owned value.
    ///
    /// A payload whose shape does not match `T` is a
    /// [`Deserialize`](FormatError::Deserialize) error, not a partial fill.
    pub fn deserialize<T>(&self, data: &[u8]) -> Result<T, FormatError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_slice(data)
            .map_err(|error| FormatError::Deserialize(Box::new(error)))
    }
}
