//! Process-lifetime memoization with explicit invalidation.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared key-value memo; clones share the same storage
pub struct MemoCache<K, V> {
    entries: Arc<RwLock<HashMap<K, V>>>,
}

impl<K, V> MemoCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.entries.read().await.get(key).cloned()
    }

    pub async fn insert(&self, key: K, value: V) {
        self.entries.write().await.insert(key, value);
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl<K, V> Clone for MemoCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<K, V> Default for MemoCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for MemoCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoCache").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_get_clear() {
        let cache: MemoCache<String, u64> = MemoCache::new();
        assert!(cache.is_empty().await);

        cache.insert("Avatar".to_string(), 19995).await;
        assert_eq!(cache.get("Avatar").await, Some(19995));
        assert_eq!(cache.get("Heat").await, None);
        assert_eq!(cache.len().await, 1);

        cache.clear().await;
        assert_eq!(cache.get("Avatar").await, None);
    }

    #[tokio::test]
    async fn test_clones_share_storage() {
        let cache: MemoCache<u64, String> = MemoCache::new();
        let other = cache.clone();

        other.insert(7, "seven".to_string()).await;
        assert_eq!(cache.get(&7).await.as_deref(), Some("seven"));

        cache.clear().await;
        assert!(other.is_empty().await);
    }
}
