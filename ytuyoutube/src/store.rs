//! Write-once in-memory stores
//!
//! Resolved channel ids and scraped profiles never change for the lifetime
//! of the process. The stores keep the first value written for a key and
//! ignore later writes, so two concurrent lookups of the same key produce
//! two fetches but a single stored value.

use async_trait::async_trait;
use moka::future::Cache as MokaCache;
use std::sync::Arc;

/// A concurrent key/value store where the first write wins
#[async_trait]
pub trait OnceStore<V>: Send + Sync
where
    V: Clone + Send + Sync + 'static,
{
    /// Value stored for `key`, if any
    async fn get(&self, key: &str) -> Option<V>;

    /// Stores `value` unless `key` already has one; returns the stored value
    async fn put_once(&self, key: String, value: V) -> V;

    /// Number of stored entries
    async fn len(&self) -> u64;
}

/// [`OnceStore`] on top of an unbounded `moka` cache (no TTL, no eviction)
#[derive(Clone)]
pub struct MokaOnceStore<V>
where
    V: Clone + Send + Sync + 'static,
{
    cache: Arc<MokaCache<String, V>>,
}

impl<V> MokaOnceStore<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            cache: Arc::new(MokaCache::builder().build()),
        }
    }

    /// Shared handle, ready to be passed to a `ClientBuilder`
    pub fn shared() -> Arc<dyn OnceStore<V>> {
        Arc::new(Self::new())
    }
}

impl<V> Default for MokaOnceStore<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<V> OnceStore<V> for MokaOnceStore<V>
where
    V: Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &str) -> Option<V> {
        self.cache.get(key).await
    }

    async fn put_once(&self, key: String, value: V) -> V {
        self.cache.entry(key).or_insert(value).await.into_value()
    }

    async fn len(&self) -> u64 {
        self.cache.run_pending_tasks().await;
        self.cache.entry_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_writer_wins() {
        let store: MokaOnceStore<String> = MokaOnceStore::new();

        assert_eq!(store.get("k").await, None);
        assert_eq!(store.put_once("k".into(), "first".into()).await, "first");
        assert_eq!(store.put_once("k".into(), "second".into()).await, "first");
        assert_eq!(store.get("k").await.as_deref(), Some("first"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_writers_store_one_value() {
        let store = MokaOnceStore::<u32>::shared();

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move { store.put_once("same".into(), i).await })
            })
            .collect();

        let mut seen = Vec::new();
        for handle in handles {
            seen.push(handle.await.unwrap());
        }

        let stored = store.get("same").await.unwrap();
        assert!(seen.iter().all(|v| *v == stored));
        assert_eq!(store.len().await, 1);
    }
}
