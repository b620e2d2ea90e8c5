//! Time-bounded response cache.
//!
//! Uses `DashMap` keyed by the full request identity. Entries are
//! immutable once stored; invalidation is purely time-based, with
//! expired entries dropped lazily on the next read.

use std::future::Future;
use std::time::{Duration, Instant};

use common::Result;
use dashmap::DashMap;

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    expires_at: Instant,
}

/// TTL cache from request key to normalized result.
#[derive(Debug)]
pub struct TtlCache<V> {
    entries: DashMap<String, Entry<V>>,
    ttl: Duration,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Look up a live entry, evicting it if it has expired.
    pub fn get(&self, key: &str) -> Option<V> {
        let expired = match self.entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => {
                return Some(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            self.entries.remove(key);
        }
        None
    }

    /// Store a value with a fresh expiry, replacing any previous entry.
    pub fn insert(&self, key: String, value: V) {
        self.entries.insert(
            key,
            Entry {
                value,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    /// Return the cached value, or run `compute` and store its result.
    ///
    /// Only successful results are stored, so a transient upstream
    /// failure is retried on the next call instead of being pinned for
    /// the full TTL.
    pub async fn get_or_compute<F, Fut>(&self, key: &str, compute: F) -> Result<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        if let Some(value) = self.get(key) {
            return Ok(value);
        }
        let value = compute().await?;
        self.insert(key.to_string(), value.clone());
        Ok(value)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use common::Error;

    use super::*;

    #[tokio::test]
    async fn test_hit_within_ttl_skips_compute() {
        let cache: TtlCache<u32> = TtlCache::new(Duration::from_secs(60));
        let computes = AtomicUsize::new(0);

        for _ in 0..3 {
            let value = cache
                .get_or_compute("key", || async {
                    computes.fetch_add(1, Ordering::SeqCst);
                    Ok(7)
                })
                .await
                .expect("compute succeeds");
            assert_eq!(value, 7);
        }

        assert_eq!(computes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_expiry_triggers_recompute() {
        let cache: TtlCache<u32> = TtlCache::new(Duration::from_secs(0));
        let computes = AtomicUsize::new(0);

        for _ in 0..2 {
            cache
                .get_or_compute("key", || async {
                    computes.fetch_add(1, Ordering::SeqCst);
                    Ok(7)
                })
                .await
                .expect("compute succeeds");
        }

        assert_eq!(computes.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failure_is_not_cached() {
        let cache: TtlCache<u32> = TtlCache::new(Duration::from_secs(60));

        let err = cache
            .get_or_compute("key", || async {
                Err(Error::Transport("connection refused".into()))
            })
            .await
            .unwrap_err();
        assert!(err.is_transport());
        assert_eq!(cache.len(), 0);

        let value = cache
            .get_or_compute("key", || async { Ok(9) })
            .await
            .expect("retry succeeds");
        assert_eq!(value, 9);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let cache: TtlCache<u32> = TtlCache::new(Duration::from_secs(60));

        cache.insert("a".into(), 1);
        cache.insert("b".into(), 2);

        assert_eq!(cache.get("a"), Some(1));
        assert_eq!(cache.get("b"), Some(2));
        assert_eq!(cache.get("c"), None);
    }
}
