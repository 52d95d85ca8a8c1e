//! Pipelining Redis backend over a shared multiplexed connection.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use cachet_backend::{Backend, BackendError, BackendResult};
use redis::{Client, IntoConnectionInfo, aio::MultiplexedConnection};
use tracing::trace;

use crate::{backend::expiry_millis, error::Error};

/// Redis cache backend sharing one multiplexed connection.
///
/// All clones and all concurrent callers interleave their commands on a
/// single [`MultiplexedConnection`], and writes batch the `SET` and its
/// `PEXPIRE` into one pipelined round trip. Prefer this variant under high
/// concurrency; prefer [`RedisBackend`](crate::RedisBackend) when
/// automatic reconnection matters more than pipelining.
///
/// Same keyspace behavior as [`RedisBackend`](crate::RedisBackend): string
/// and structured values share one Redis key namespace.
///
/// # Examples
///
/// ```no_run
/// use cachet_redis::MultiplexedRedisBackend;
///
/// # async fn example() -> Result<(), cachet_redis::Error> {
/// let backend = MultiplexedRedisBackend::connect("redis://127.0.0.1:6379/").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct MultiplexedRedisBackend {
    connection: MultiplexedConnection,
}

impl MultiplexedRedisBackend {
    /// Connects to the given server and establishes the shared connection.
    pub async fn connect(server: impl IntoConnectionInfo) -> Result<Self, Error> {
        let client = Client::open(server)?;
        trace!("establish multiplexed redis connection");
        let connection = client.get_multiplexed_async_connection().await?;
        Ok(Self { connection })
    }

    /// Creates a backend over an externally established connection.
    pub fn from_connection(connection: MultiplexedConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl Backend for MultiplexedRedisBackend {
    async fn get_string(&self, key: &str) -> BackendResult<String> {
        let mut con = self.connection.clone();
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
        let mut con = self.connection.clone();
        // Pipeline: SET + optional PEXPIRE in a single round trip.
        let mut pipe = redis::pipe();
        pipe.cmd("SET").arg(key).arg(value).ignore();
        if let Some(millis) = expiry_millis(ttl) {
            pipe.cmd("PEXPIRE").arg(key).arg(millis).ignore();
        }
        pipe.query_async::<()>(&mut con)
            .await
            .map_err(Error::from)?;
        Ok(())
    }

    async fn get_raw(&self, key: &str) -> BackendResult<Bytes> {
        let mut con = self.connection.clone();
        let value: Option<Vec<u8>> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut con)
            .await
            .map_err(Error::from)?;
        value.map(Bytes::from).ok_or(BackendError::MissingKey)
    }

    async fn put_raw(&self, key: &str, value: Bytes, ttl: Option<Duration>) -> BackendResult<()> {
        let mut con = self.connection.clone();
        let mut pipe = redis::pipe();
        pipe.cmd("SET").arg(key).arg(value.as_ref()).ignore();
        if let Some(millis) = expiry_millis(ttl) {
            pipe.cmd("PEXPIRE").arg(key).arg(millis).ignore();
        }
        pipe.query_async::<()>(&mut con)
            .await
            .map_err(Error::from)?;
        Ok(())
    }

    async fn forget(&self, key: &str) -> BackendResult<()> {
        let mut con = self.connection.clone();
        let deleted: i64 = redis::cmd("DEL")
            .arg(key)
            .query_async(&mut con)
            .await
            .map_err(Error::from)?;
        trace!(key, deleted, "removed key");
        Ok(())
    }
}
