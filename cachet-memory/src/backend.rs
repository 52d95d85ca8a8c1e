//! Memory backend implementation.

use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
    time::Duration,
};

use async_trait::async_trait;
use bytes::Bytes;
use cachet_backend::{Backend, BackendError, BackendResult};

/// In-process cache backend over two plain hash maps.
///
/// String values and structured values live in separate maps, each guarded
/// by its own [`RwLock`]: concurrent reads of one namespace never block
/// each other, a write excludes readers and writers of its own namespace
/// only, and string operations never contend with structured ones. A key
/// written through the string API is invisible to the structured API and
/// vice versa.
///
/// Cloning is cheap — clones share the same underlying maps, so one
/// instance can be constructed and handed to as many callers as needed.
///
/// # Caveats
///
/// - TTL is accepted on writes but **not enforced**: nothing expires on
///   its own. A process-local cache of this shape is expected to be
///   bounded by the lifetime of the process, not by per-entry timers.
/// - There is no eviction; entries live until [`forget`](Backend::forget)
///   removes them.
/// - Data is not shared across processes — use a Redis backend for that.
#[derive(Clone, Debug, Default)]
pub struct MemoryBackend {
    shared: Arc<Shared>,
}

#[derive(Debug, Default)]
struct Shared {
    strings: RwLock<HashMap<String, String>>,
    values: RwLock<HashMap<String, Bytes>>,
}

// Lock poisoning is recovered: a panicked writer leaves the map coherent.
fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

impl MemoryBackend {
    /// Creates a new empty backend.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn get_string(&self, key: &str) -> BackendResult<String> {
        let strings = read_lock(&self.shared.strings);
        strings.get(key).cloned().ok_or(BackendError::MissingKey)
    }

    async fn put_string(
        &self,
        key: &str,
        value: &str,
        _ttl: Option<Duration>,
    ) -> BackendResult<()> {
        let mut strings = write_lock(&self.shared.strings);
        strings.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn get_raw(&self, key: &str) -> BackendResult<Bytes> {
        let values = read_lock(&self.shared.values);
        values.get(key).cloned().ok_or(BackendError::MissingKey)
    }

    async fn put_raw(&self, key: &str, value: Bytes, _ttl: Option<Duration>) -> BackendResult<()> {
        let mut values = write_lock(&self.shared.values);
        values.insert(key.to_owned(), value);
        Ok(())
    }

    async fn forget(&self, key: &str) -> BackendResult<()> {
        // Inspects both namespaces. Lock order is strings then values; this
        // is the only path that holds both locks.
        let mut strings = write_lock(&self.shared.strings);
        let mut values = write_lock(&self.shared.values);
        let removed = strings.remove(key).is_some() | values.remove(key).is_some();
        if removed {
            Ok(())
        } else {
            Err(BackendError::MissingKey)
        }
    }
}
