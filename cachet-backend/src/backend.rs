//! The storage backend contract.

use std::{future::Future, sync::Arc, time::Duration};

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Serialize, de::DeserializeOwned};

use crate::{error::BackendError, format::JsonFormat};

/// Result alias for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;

/// The contract every storage engine satisfies.
///
/// Keys are opaque strings. A backend holds two kinds of payloads: plain
/// strings and raw encoded bytes (the structured-value representation
/// produced by [`CacheBackend`]). Whether the two occupy separate
/// namespaces is backend-defined: the in-memory backend keeps them in
/// separate maps, while remote backends address one shared keyspace per
/// key — callers must tolerate this difference.
///
/// TTL semantics: `None` and `Some(Duration::ZERO)` both mean "no
/// expiration". Backends that cannot enforce expiry accept the parameter
/// and document the limitation.
///
/// All operations are cancel-safe in the usual async sense: dropping the
/// returned future abandons the operation.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Fetches the string stored under `key`.
    ///
    /// Fails with [`BackendError::MissingKey`] when the key is absent.
    async fn get_string(&self, key: &str) -> BackendResult<String>;

    /// Stores `value` under `key`, overwriting any previous value.
    async fn put_string(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> BackendResult<()>;

    /// Fetches the raw encoded payload stored under `key`.
    ///
    /// Fails with [`BackendError::MissingKey`] when the key is absent.
    async fn get_raw(&self, key: &str) -> BackendResult<Bytes>;

    /// Stores a raw encoded payload under `key`, overwriting any previous
    /// value.
    async fn put_raw(&self, key: &str, value: Bytes, ttl: Option<Duration>) -> BackendResult<()>;

    /// Removes `key` from the backend.
    ///
    /// Semantics for an absent key are backend-defined: the in-memory
    /// backend fails with [`BackendError::MissingKey`], remote backends
    /// succeed (deletion is idempotent at the protocol level).
    async fn forget(&self, key: &str) -> BackendResult<()>;
}

#[async_trait]
impl Backend for Box<dyn Backend> {
    async fn get_string(&self, key: &str) -> BackendResult<String> {
        (**self).get_string(key).await
    }

    async fn put_string(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> BackendResult<()> {
        (**self).put_string(key, value, ttl).await
    }

    async fn get_raw(&self, key: &str) -> BackendResult<Bytes> {
        (**self).get_raw(key).await
    }

    async fn put_raw(&self, key: &str, value: Bytes, ttl: Option<Duration>) -> BackendResult<()> {
        (**self).put_raw(key, value, ttl).await
    }

    async fn forget(&self, key: &str) -> BackendResult<()> {
        (**self).forget(key).await
    }
}

#[async_trait]
impl Backend for Arc<dyn Backend> {
    async fn get_string(&self, key: &str) -> BackendResult<String> {
        (**self).get_string(key).await
    }

    async fn put_string(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> BackendResult<()> {
        (**self).put_string(key, value, ttl).await
    }

    async fn get_raw(&self, key: &str) -> BackendResult<Bytes> {
        (**self).get_raw(key).await
    }

    async fn put_raw(&self, key: &str, value: Bytes, ttl: Option<Duration>) -> BackendResult<()> {
        (**self).put_raw(key, value, ttl).await
    }

    async fn forget(&self, key: &str) -> BackendResult<()> {
        (**self).forget(key).await
    }
}

/// Typed operations over any [`Backend`].
///
/// Provides generic `get_value`/`put_value` that handle the JSON encoding
/// between caller types and the raw byte representation backends store.
/// Implemented for every `Backend` via the blanket impl; the default
/// method bodies are the implementation.
pub trait CacheBackend: Backend {
    /// Fetches and decodes the structured value stored under `key`.
    ///
    /// Fails with [`BackendError::MissingKey`] when the key is absent, and
    /// with [`BackendError::Format`] when the stored payload does not match
    /// the shape of `T` — the two are never conflated.
    fn get_value<T>(&self, key: &str) -> impl Future<Output = BackendResult<T>> + Send
    where
        T: DeserializeOwned,
    {
        async move {
            let raw = self.get_raw(key).await?;
            let value = JsonFormat.deserialize(&raw)?;
            Ok(value)
        }
    }

    /// Encodes `value` and stores it under `key`, overwriting any previous
    /// value.
    ///
    /// Encoding failure short-circuits before the backend is touched.
    fn put_value<T>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<Duration>,
    ) -> impl Future<Output = BackendResult<()>> + Send
    where
        T: Serialize + Sync + ?Sized,
    {
        async move {
            let encoded = JsonFormat.serialize(value)?;
            self.put_raw(key, encoded, ttl).await
        }
    }
}

impl<B: Backend + ?Sized> CacheBackend for B {}
