use crate::core::cache::Cache;
use async_trait::async_trait;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

struct Entry<V> {
    value: V,
    expires_at: Option<Instant>,
}

/// In-memory cache backed by a HashMap behind an async mutex.
pub struct MemoryCache<K, V>
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    inner: Arc<Mutex<HashMap<K, Entry<V>>>>,
}

impl<K, V> MemoryCache<K, V>
where
    K: Eq + Hash + Send + Sync,
    V: Clone + Send + Sync,
{
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl<K, V> Default for MemoryCache<K, V>
where
    K: Eq + Hash + Send + Sync,
    V: Clone + Send + Sync,
{
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<K, V> Cache<K, V> for MemoryCache<K, V>
where
    K: Eq + Hash + Send + Sync + std::fmt::Debug + 'static,
    V: Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &K) -> Option<V> {
        let cache = self.inner.lock().await;
        if let Some(entry) = cache.get(key) {
            if let Some(expiry) = entry.expires_at {
                if expiry < Instant::now() {
                    debug!("Cache entry expired for key: {:?}", key);
                    return None;
                }
            }
            debug!("Cache HIT for key: {:?}", key);
            return Some(entry.value.clone());
        }
        debug!("Cache MISS for key: {:?}", key);
        None
    }

    async fn put(&self, key: K, value: V, ttl: Option<Duration>) {
        let expires_at = ttl.map(|duration| Instant::now() + duration);
        let mut cache = self.inner.lock().await;
        debug!("Cache PUT for key: {:?}", key);
        cache.insert(key, Entry { value, expires_at });
    }

    async fn remove(&self, key: &K) {
        let mut cache = self.inner.lock().await;
        cache.remove(key);
        debug!("Cache REMOVE for key: {:?}", key);
    }
}
