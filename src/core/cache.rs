//! Cache abstraction for backend lookups

use async_trait::async_trait;
use std::time::Duration;

/// An async key-value cache with optional per-entry TTL.
#[async_trait]
pub trait Cache<K, V>: Send + Sync {
    async fn get(&self, key: &K) -> Option<V>;

    /// Stores a value; `ttl` of `None` keeps it until removed.
    async fn put(&self, key: K, value: V, ttl: Option<Duration>);

    async fn remove(&self, key: &K);
}
