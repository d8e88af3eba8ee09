//! Time-bounded memoization of analysis results, keyed by subject name.

use std::num::NonZeroUsize;
use std::time::Duration;

use lru::LruCache;
use tokio::sync::Mutex;
use tokio::time::Instant;

struct Entry<V> {
    stored_at: Instant,
    value: V,
}

/// LRU cache whose entries expire `ttl` after insertion.
pub struct TtlCache<V> {
    ttl: Duration,
    entries: Mutex<LruCache<String, Entry<V>>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            ttl,
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Names differing only in case or spacing share an entry.
    pub fn cache_key(name: &str) -> String {
        name.split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub async fn get(&self, name: &str) -> Option<V> {
        let key = Self::cache_key(name);
        let mut entries = self.entries.lock().await;
        let expired = match entries.get(&key) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => {
                return Some(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            entries.pop(&key);
        }
        None
    }

    pub async fn insert(&self, name: &str, value: V) {
        let entry = Entry {
            stored_at: Instant::now(),
            value,
        };
        self.entries.lock().await.put(Self::cache_key(name), entry);
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}
