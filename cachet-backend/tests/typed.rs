//! Tests for the typed `CacheBackend` layer over a simple DashMap backend.

use std::{collections::BTreeMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use bytes::Bytes;
use cachet_backend::{Backend, BackendError, BackendResult, CacheBackend};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

/// Simple in-memory backend for testing using DashMap.
///
/// Thread-safe and cheap to clone (Arc internally).
#[derive(Clone, Default)]
struct TestBackend {
    strings: Arc<DashMap<String, String>>,
    values: Arc<DashMap<String, Bytes>>,
}

#[async_trait]
impl Backend for TestBackend {
    async fn get_string(&self, key: &str) -> BackendResult<String> {
        self.strings
            .get(key)
            .map(|entry| entry.clone())
            .ok_or(BackendError::MissingKey)
    }

    async fn put_string(
        &self,
        key: &str,
        value: &str,
        _ttl: Option<Duration>,
    ) -> BackendResult<()> {
        self.strings.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn get_raw(&self, key: &str) -> BackendResult<Bytes> {
        self.values
            .get(key)
            .map(|entry| entry.clone())
            .ok_or(BackendError::MissingKey)
    }

    async fn put_raw(&self, key: &str, value: Bytes, _ttl: Option<Duration>) -> BackendResult<()> {
        self.values.insert(key.to_owned(), value);
        Ok(())
    }

    async fn forget(&self, key: &str) -> BackendResult<()> {
        self.strings.remove(key);
        self.values.remove(key);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Demo {
    data: String,
}

#[derive(Debug, Deserialize)]
struct Numeric {
    #[allow(dead_code)]
    count: u32,
}

#[tokio::test]
async fn get_value_missing_key() {
    let backend = TestBackend::default();

    let result = backend.get_value::<Demo>("bongo").await;

    assert!(matches!(result, Err(BackendError::MissingKey)));
}

#[tokio::test]
async fn put_then_get_value_round_trips() {
    let backend = TestBackend::default();
    let demo = Demo {
        data: "bingo".to_owned(),
    };

    backend.put_value("bongo", &demo, None).await.unwrap();
    let out: Demo = backend.get_value("bongo").await.unwrap();

    assert_eq!(out, demo);
}

#[tokio::test]
async fn get_value_incompatible_shape_is_format_error() {
    let backend = TestBackend::default();
    backend
        .put_value(
            "bongo",
            &Demo {
                data: "bingo".to_owned(),
            },
            None,
        )
        .await
        .unwrap();

    let err = backend.get_value::<Numeric>("bongo").await.unwrap_err();

    assert!(matches!(err, BackendError::Format(_)));
    assert!(!err.is_missing_key());
}

#[tokio::test]
async fn put_value_encode_failure_short_circuits() {
    let backend = TestBackend::default();
    // JSON requires string map keys; tuple keys fail to encode.
    let mut unencodable = BTreeMap::new();
    unencodable.insert((1u32, 2u32), "x".to_owned());

    let err = backend
        .put_value("bongo", &unencodable, None)
        .await
        .unwrap_err();

    assert!(matches!(err, BackendError::Format(_)));
    // The backend was never touched.
    assert!(matches!(
        backend.get_raw("bongo").await,
        Err(BackendError::MissingKey)
    ));
}

#[tokio::test]
async fn typed_layer_works_through_trait_objects() {
    let backend: Arc<dyn Backend> = Arc::new(TestBackend::default());
    let demo = Demo {
        data: "bingo".to_owned(),
    };

    backend.put_string("bongo", "bingo", None).await.unwrap();
    backend.put_value("demo", &demo, None).await.unwrap();

    assert_eq!(backend.get_string("bongo").await.unwrap(), "bingo");
    let out: Demo = backend.get_value("demo").await.unwrap();
    assert_eq!(out, demo);
}
