use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::GameStore;
use crate::{error::Result, models::GameState};

/// Process-local store holding the same JSON text the Redis store writes.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn raw(&self, key: &str) -> Option<String> {
        self.entries.read().await.get(key).cloned()
    }

    #[cfg(test)]
    pub async fn insert_raw(&self, key: &str, payload: impl Into<String>) {
        self.entries
            .write()
            .await
            .insert(key.to_string(), payload.into());
    }
}

#[async_trait::async_trait]
impl GameStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<GameState>> {
        let guard = self.entries.read().await;
        match guard.get(key) {
            Some(payload) => Ok(Some(serde_json::from_str(payload)?)),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, state: &GameState) -> Result<()> {
        let payload = serde_json::to_string(state)?;
        self.entries.write().await.insert(key.to_string(), payload);
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

/// Store whose reads or writes always fail, for exercising the 500 path.
#[cfg(test)]
pub(crate) struct FailingStore {
    fail_get: Option<String>,
    fail_set: Option<String>,
    inner: MemoryStore,
}

#[cfg(test)]
impl FailingStore {
    pub(crate) fn on_get(cause: &str) -> Self {
        Self {
            fail_get: Some(cause.to_string()),
            fail_set: None,
            inner: MemoryStore::new(),
        }
    }

    /// Reads return a default board under `key`; every write fails.
    pub(crate) fn on_set(key: &str, cause: &str) -> Self {
        let payload = serde_json::to_string(&GameState::default()).unwrap_or_default();
        let entries = HashMap::from([(key.to_string(), payload)]);
        Self {
            fail_get: None,
            fail_set: Some(cause.to_string()),
            inner: MemoryStore {
                entries: Arc::new(RwLock::new(entries)),
            },
        }
    }
}

#[cfg(test)]
#[async_trait::async_trait]
impl GameStore for FailingStore {
    async fn get(&self, key: &str) -> Result<Option<GameState>> {
        match &self.fail_get {
            Some(cause) => Err(crate::error::AppError::Internal(cause.clone())),
            None => self.inner.get(key).await,
        }
    }

    async fn set(&self, key: &str, state: &GameState) -> Result<()> {
        match &self.fail_set {
            Some(cause) => Err(crate::error::AppError::Internal(cause.clone())),
            None => self.inner.set(key, state).await,
        }
    }

    async fn ping(&self) -> Result<()> {
        match &self.fail_get {
            Some(cause) => Err(crate::error::AppError::Internal(cause.clone())),
            None => Ok(()),
        }
    }
}
