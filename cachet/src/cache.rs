//! The cache facade and the remember pattern.

use std::{future::Future, time::Duration};

use async_trait::async_trait;
use bytes::Bytes;
use cachet_backend::{Backend, BackendError, BackendResult, CacheBackend};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, trace};

use crate::error::CacheError;

/// Cache facade over any [`Backend`].
///
/// Holds no storage state of its own: every operation delegates to the
/// wrapped backend, and the `remember_*` helpers compose the backend's
/// primitives into the cache-aside pattern. `Cache` itself implements
/// [`Backend`], so caches can wrap other caches and anything accepting a
/// backend accepts a `Cache`.
#[derive(Clone, Debug)]
pub struct Cache<B> {
    backend: B,
}

impl<B> Cache<B> {
    /// Wraps a backend.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Shared access to the wrapped backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Consumes the facade and returns the wrapped backend.
    pub fn into_backend(self) -> B {
        self.backend
    }
}

impl<B: Backend> Cache<B> {
    /// Fetches the string stored under `key`.
    pub async fn get_string(&self, key: &str) -> Result<String, CacheError> {
        Ok(self.backend.get_string(key).await?)
    }

    /// Stores `value` under `key`, overwriting any previous value.
    pub async fn put_string(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> Result<(), CacheError> {
        Ok(self.backend.put_string(key, value, ttl).await?)
    }

    /// Fetches and decodes the structured value stored under `key`.
    pub async fn get_value<T>(&self, key: &str) -> Result<T, CacheError>
    where
        T: DeserializeOwned,
    {
        Ok(self.backend.get_value(key).await?)
    }

    /// Encodes `value` and stores it under `key`, overwriting any previous
    /// value.
    pub async fn put_value<T>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<Duration>,
    ) -> Result<(), CacheError>
    where
        T: Serialize + Sync + ?Sized,
    {
        Ok(self.backend.put_value(key, value, ttl).await?)
    }

    /// Removes `key` from the backend.
    ///
    /// Absent-key behavior is the backend's own: the memory backend fails
    /// with the missing-key kind, Redis backends succeed idempotently.
    pub async fn forget(&self, key: &str) -> Result<(), CacheError> {
        Ok(self.backend.forget(key).await?)
    }

    /// Returns the string under `key`, computing and storing it on a miss.
    ///
    /// A single pass with no retries: on a hit the value is returned and
    /// `compute` is never invoked; only the missing-key error triggers
    /// `compute`, and every other failure — backend, compute, or write —
    /// aborts immediately and surfaces unchanged. After a successful write
    /// the value is re-read from the backend, so the result travels the
    /// same path as a genuine hit.
    ///
    /// Concurrent callers racing on the same absent key may each invoke
    /// their compute and write; the last write wins. There is no
    /// de-duplication of in-flight computations.
    pub async fn remember_string<F, Fut, E>(
        &self,
        key: &str,
        ttl: Option<Duration>,
        compute: F,
    ) -> Result<String, CacheError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, E>>,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        match self.backend.get_string(key).await {
            Ok(value) => {
                trace!(key, "cache hit");
                return Ok(value);
            }
            Err(BackendError::MissingKey) => debug!(key, "cache miss, computing value"),
            Err(error) => return Err(error.into()),
        }

        let value = compute()
            .await
            .map_err(|error| CacheError::Upstream(error.into()))?;
        self.backend.put_string(key, &value, ttl).await?;
        Ok(self.backend.get_string(key).await?)
    }

    /// Returns the structured value under `key`, computing and storing it
    /// on a miss.
    ///
    /// Same contract as [`remember_string`](Self::remember_string); the
    /// returned value is decoded from the backend after the write rather
    /// than handed back directly, so encoding mismatches surface here and
    /// not on some later read.
    pub async fn remember_value<T, F, Fut, E>(
        &self,
        key: &str,
        ttl: Option<Duration>,
        compute: F,
    ) -> Result<T, CacheError>
    where
        T: Serialize + DeserializeOwned + Sync,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        match self.backend.get_value(key).await {
            Ok(value) => {
                trace!(key, "cache hit");
                return Ok(value);
            }
            Err(BackendError::MissingKey) => debug!(key, "cache miss, computing value"),
            Err(error) => return Err(error.into()),
        }

        let value = compute()
            .await
            .map_err(|error| CacheError::Upstream(error.into()))?;
        self.backend.put_value(key, &value, ttl).await?;
        Ok(self.backend.get_value(key).await?)
    }
}

#[async_trait]
impl<B: Backend> Backend for Cache<B> {
    async fn get_string(&self, key: &str) -> BackendResult<String> {
        self.backend.get_string(key).await
    }

    async fn put_string(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> BackendResult<()> {
        self.backend.put_string(key, value, ttl).await
    }

    async fn get_raw(&self, key: &str) -> BackendResult<Bytes> {
        self.backend.get_raw(key).await
    }

    async fn put_raw(&self, key: &str, value: Bytes, ttl: Option<Duration>) -> BackendResult<()> {
        self.backend.put_raw(key, value, ttl).await
    }

    async fn forget(&self, key: &str) -> BackendResult<()> {
        self.backend.forget(key).await
    }
}
