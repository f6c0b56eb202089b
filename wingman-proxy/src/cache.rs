use std::hash::Hash;
use std::sync::Arc;

use tokio::time::{Duration, Instant};

const CAPACITY: usize = 64;

pub struct Config {
    pub enabled: bool,
    pub ttl: Duration,
}

pub struct Cache<K, V> {
    enabled: bool,
    inner: quick_cache::sync::Cache<K, (Instant, Arc<V>)>,
    ttl: Duration,
}

impl<K, V> Cache<K, V>
where
    K: Clone + Eq + Hash,
{
    pub fn new(config: Config) -> Arc<Self> {
        Arc::new(Self {
            enabled: config.enabled,
            ttl: config.ttl,
            inner: quick_cache::sync::Cache::new(CAPACITY),
        })
    }

    pub fn insert(&self, key: K, value: V) -> Arc<V> {
        let arcd = Arc::new(value);
        if !self.enabled {
            return arcd;
        }

        self.inner
            .insert(key, (Instant::now() + self.ttl, Arc::clone(&arcd)));

        arcd
    }

    /// Expired entries are left in place. The next `insert` for the key
    /// overwrites them, so a read never drops a value stored concurrently.
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        if !self.enabled {
            return None;
        }

        let (expires, value) = self.inner.get(key)?;
        if expires <= Instant::now() {
            return None;
        }

        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn entries_expire_after_ttl() {
        let cache = Cache::new(Config {
            enabled: true,
            ttl: Duration::from_secs(60),
        });

        cache.insert("feed", 1);
        assert_eq!(cache.get(&"feed").as_deref(), Some(&1));

        tokio::time::advance(Duration::from_secs(59)).await;
        assert_eq!(cache.get(&"feed").as_deref(), Some(&1));

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(cache.get(&"feed"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn replacing_an_entry_restarts_its_ttl() {
        let cache = Cache::new(Config {
            enabled: true,
            ttl: Duration::from_secs(60),
        });

        cache.insert("feed", 1);
        tokio::time::advance(Duration::from_secs(45)).await;
        cache.insert("feed", 2);
        tokio::time::advance(Duration::from_secs(45)).await;

        assert_eq!(cache.get(&"feed").as_deref(), Some(&2));
    }

    #[tokio::test(start_paused = true)]
    async fn expired_reads_do_not_drop_newer_values() {
        let cache = Cache::new(Config {
            enabled: true,
            ttl: Duration::from_secs(60),
        });

        cache.insert("feed", 1);
        tokio::time::advance(Duration::from_secs(60)).await;

        // A stale read followed by a refresh, as two overlapping requests see it.
        assert_eq!(cache.get(&"feed"), None);
        assert_eq!(cache.inner.len(), 1);
        cache.insert("feed", 2);
        assert_eq!(cache.get(&"feed").as_deref(), Some(&2));
    }

    #[test]
    fn disabled_cache_stores_nothing() {
        let cache = Cache::new(Config {
            enabled: false,
            ttl: Duration::from_secs(60),
        });

        assert_eq!(*cache.insert("feed", 1), 1);
        assert_eq!(cache.get(&"feed"), None);
    }
}
