//! Shared test doubles for integration tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use proxyvet::core::response::ProxyResponse;
use proxyvet::core::saver::ResultSaver;
use proxyvet::core::store::{RemoteStore, StoreError};
use tokio::sync::Mutex;

/// Saver that records everything it is asked to persist
#[derive(Default)]
pub struct RecordingSaver {
    saved: Mutex<Vec<(String, String, Option<u16>)>>,
}

impl RecordingSaver {
    pub async fn saved(&self) -> Vec<(String, String, Option<u16>)> {
        self.saved.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl ResultSaver for RecordingSaver {
    async fn save_result(
        &self,
        pattern: &str,
        proxy: &str,
        response: &dyn ProxyResponse,
    ) -> Result<(), String> {
        self.saved
            .lock()
            .await
            .push((pattern.to_string(), proxy.to_string(), response.status()));
        Ok(())
    }
}

/// Response whose body read always fails
#[derive(Debug, Default)]
pub struct FailingResponse;

#[async_trait::async_trait]
impl ProxyResponse for FailingResponse {
    fn status(&self) -> Option<u16> {
        Some(200)
    }

    async fn text(&self) -> Result<String, String> {
        Err("connection reset while reading body".to_string())
    }
}

/// Store whose operations fail, for exercising open-failure paths
#[derive(Default)]
pub struct FailingStore {
    closed: AtomicBool,
}

impl FailingStore {
    pub fn closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn unavailable() -> StoreError {
        StoreError::Unavailable("connection refused".to_string())
    }
}

#[async_trait::async_trait]
impl RemoteStore for FailingStore {
    async fn hgetall(&self, _key: &str) -> Result<HashMap<String, String>, StoreError> {
        Err(Self::unavailable())
    }

    async fn hset(&self, _key: &str, _field: &str, _value: &str) -> Result<(), StoreError> {
        Err(Self::unavailable())
    }

    async fn hset_all(&self, _key: &str, _fields: &[(String, String)]) -> Result<(), StoreError> {
        Err(Self::unavailable())
    }

    async fn hdel(&self, _key: &str, _field: &str) -> Result<(), StoreError> {
        Err(Self::unavailable())
    }

    async fn sadd(&self, _key: &str, _member: &str) -> Result<(), StoreError> {
        Err(Self::unavailable())
    }

    async fn srandmember(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(Self::unavailable())
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}
