use async_trait::async_trait;
use seer_core::scenarios::analytics::EventCache;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Process-local stand-in for the browser's key/value storage.
#[derive(Clone, Default)]
pub struct InMemoryEventCache {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryEventCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set(&self, key: &str, value: impl Into<String>) {
        self.entries.write().await.insert(key.to_string(), value.into());
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        self.entries.read().await.get(key).cloned()
    }
}

#[async_trait]
impl EventCache for InMemoryEventCache {
    async fn get_or_seed(&self, key: &str, seed: &str) -> String {
        if let Some(value) = self.entries.read().await.get(key) {
            return value.clone();
        }

        let mut entries = self.entries.write().await;
        entries
            .entry(key.to_string())
            .or_insert_with(|| {
                debug!("Seeding event cache key {}", key);
                seed.to_string()
            })
            .clone()
    }
}
