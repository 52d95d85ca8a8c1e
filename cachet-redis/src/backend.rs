//! Request/response Redis backend.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use cachet_backend::{Backend, BackendError, BackendResult};
use redis::{Client, aio::ConnectionManager};
use tokio::sync::OnceCell;
use tracing::trace;

use crate::error::Error;

/// Translates a write-time TTL into the argument for `PX`.
///
/// `None` and zero both mean "no expiry"; nonzero sub-millisecond TTLs are
/// clamped up to 1 ms, the smallest expiry the server accepts.
pub(crate) fn expiry_millis(ttl: Option<Duration>) -> Option<u64> {
    let ttl = ttl.filter(|ttl| !ttl.is_zero())?;
    Some(u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1))
}

/// Redis cache backend based on the redis-rs crate.
///
/// Issues one command per operation over a [`ConnectionManager`], which is
/// established lazily on first use and reconnects on failure. Cloning is
/// cheap; clones share the underlying client.
///
/// String and structured values address the same Redis keyspace: a
/// structured write to key `k` overwrites a string previously stored under
/// `k`. This differs from the in-memory backend's separate namespaces.
///
/// # Examples
///
/// ```no_run
/// use cachet_redis::RedisBackend;
///
/// # fn main() -> Result<(), cachet_redis::Error> {
/// let backend = RedisBackend::builder()
///     .server("redis://127.0.0.1:6379/")
///     .build()?;
/// # Ok(())
/// # }
/// ```
///
/// [`ConnectionManager`]: redis::aio::ConnectionManager
#[derive(Clone)]
pub struct RedisBackend {
    client: Client,
    connection: OnceCell<ConnectionManager>,
}

impl RedisBackend {
    /// Creates a backend with default settings (`redis://127.0.0.1/`).
    pub fn new() -> Result<Self, Error> {
        Self::builder().build()
    }

    /// Creates a new builder with default settings.
    #[must_use]
    pub fn builder() -> RedisBackendBuilder {
        RedisBackendBuilder::default()
    }

    /// Creates a backend over an externally constructed [`Client`].
    ///
    /// Connection configuration (addresses, TLS, credentials) stays with
    /// the caller; this backend only issues commands.
    pub fn from_client(client: Client) -> Self {
        Self {
            client,
            connection: OnceCell::new(),
        }
    }

    /// Lazily established connection to Redis via [`ConnectionManager`].
    pub async fn connection(&self) -> Result<&ConnectionManager, BackendError> {
        let manager = self
            .connection
            .get_or_try_init(|| {
                trace!("initialize redis connection manager");
                self.client.get_connection_manager()
            })
            .await
            .map_err(Error::from)?;
        Ok(manager)
    }
}

/// Part of builder pattern implementation for [`RedisBackend`].
pub struct RedisBackendBuilder {
    connection_info: String,
}

impl Default for RedisBackendBuilder {
    fn default() -> Self {
        Self {
            connection_info: "redis://127.0.0.1/".to_owned(),
        }
    }
}

impl RedisBackendBuilder {
    /// Sets connection info (host, port, database, etc.).
    pub fn server(mut self, connection_info: impl Into<String>) -> Self {
        self.connection_info = connection_info.into();
        self
    }

    /// Creates a new [`RedisBackend`] with the configured settings.
    pub fn build(self) -> Result<RedisBackend, Error> {
        Ok(RedisBackend {
            client: Client::open(self.connection_info)?,
            connection: OnceCell::new(),
        })
    }
}

#[async_trait]
impl Backend for RedisBackend {
    async fn get_string(&self, key: &str) -> BackendResult<String> {
        let mut con = self.connection().await?.clone();
        let value: Option<String> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut con)
            .await
            .map_err(Error::from)?;
        value.ok_or(BackendError::MissingKey)
    }

    async fn put_string(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> BackendResult<()> {
        let mut con = self.connection().await?.clone();
        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(value);
        if let Some(millis) = expiry_millis(ttl) {
            cmd.arg("PX").arg(millis);
        }
        cmd.query_async::<()>(&mut con).await.map_err(Error::from)?;
        Ok(())
    }

    async fn get_raw(&self, key: &str) -> BackendResult<Bytes> {
        let mut con = self.connection().await?.clone();
        let value: Option<Vec<u8>> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut con)
            .await
            .map_err(Error::from)?;
        value.map(Bytes::from).ok_or(BackendError::MissingKey)
    }

    async fn put_raw(&self, key: &str, value: Bytes, ttl: Option<Duration>) -> BackendResult<()> {
        let mut con = self.connection().await?.clone();
        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(value.as_ref());
        if let Some(millis) = expiry_millis(ttl) {
            cmd.arg("PX").arg(millis);
        }
        cmd.query_async::<()>(&mut con).await.map_err(Error::from)?;
        Ok(())
    }

    async fn forget(&self, key: &str) -> BackendResult<()> {
        let mut con = self.connection().await?.clone();
        // DEL is idempotent; removing an absent key is still a success.
        let deleted: i64 = redis::cmd("DEL")
            .arg(key)
            .query_async(&mut con)
            .await
            .map_err(Error::from)?;
        trace!(key, deleted, "removed key");
        Ok(())
    }
}
