use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

pub struct Cache<K, V> {
    inner: LruCache<K, V>,
}

impl<K: std::hash::Hash + Eq, V> Cache<K, V> {
    pub fn new(capacity: usize) -> Self {
        Cache {
            inner: LruCache::new(NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)),
        }
    }

    pub fn get(&mut self, key: &K) -> Option<&V> {
        self.inner.get(key)
    }

    pub fn insert(&mut self, key: K, value: V) {
        self.inner.put(key, value);
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.inner.pop(key)
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[derive(Debug, Clone)]
struct CachedPage {
    body: String,
    stored_at: Instant,
}

/// Whole-page response cache with a fixed time-to-live.
///
/// Entries are keyed by whatever the caller considers a distinct rendering
/// (viewer + request URI for the index). Writes elsewhere do not invalidate
/// entries; they simply age out.
#[derive(Clone)]
pub struct PageCache {
    inner: Arc<Mutex<Cache<String, CachedPage>>>,
    ttl: Duration,
}

impl PageCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Cache::new(capacity))),
            ttl,
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        if !self.is_enabled() {
            return None;
        }
        let key = key.to_string();
        let mut cache = self.inner.lock().await;
        let expired = match cache.get(&key) {
            Some(page) if page.stored_at.elapsed() < self.ttl => return Some(page.body.clone()),
            Some(_) => true,
            None => false,
        };
        if expired {
            cache.remove(&key);
        }
        None
    }

    pub async fn insert(&self, key: impl Into<String>, body: String) {
        if !self.is_enabled() {
            return;
        }
        let page = CachedPage {
            body,
            stored_at: Instant::now(),
        };
        self.inner.lock().await.insert(key.into(), page);
    }

    pub async fn clear(&self) {
        self.inner.lock().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }
}

impl std::fmt::Debug for PageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageCache").field("ttl", &self.ttl).finish()
    }
}
