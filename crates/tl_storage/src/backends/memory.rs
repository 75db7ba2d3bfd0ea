use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tl_core::{Result, Timeline, TimelineCache};
use tokio::sync::RwLock;

struct CacheEntry {
    timeline: Timeline,
    expires_at: Instant,
}

pub struct MemoryStore {
    entries: HashMap<String, CacheEntry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn get(&mut self, key: &str, now: Instant) -> Option<Timeline> {
        match self.entries.get(key) {
            Some(entry) if entry.expires_at > now => Some(entry.timeline.clone()),
            Some(_) => {
                self.entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Stores `timeline` until `expires_at`, sweeping entries already
    /// expired at `now`.
    pub fn put(&mut self, key: &str, timeline: &Timeline, now: Instant, expires_at: Instant) {
        self.entries.retain(|_, entry| entry.expires_at > now);
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                timeline: timeline.clone(),
                expires_at,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-local timeline cache with per-entry expiry.
#[derive(Clone, Default)]
pub struct InMemoryCache {
    store: Arc<RwLock<MemoryStore>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }
}

#[async_trait]
impl TimelineCache for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Timeline>> {
        let mut store = self.store.write().await;
        Ok(store.get(key, Instant::now()))
    }

    async fn put(&self, key: &str, timeline: &Timeline, ttl: Duration) -> Result<()> {
        let mut store = self.store.write().await;
        let now = Instant::now();
        store.put(key, timeline, now, now + ttl);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tl_core::Event;

    fn timeline(name: &str) -> Timeline {
        Timeline::new(vec![Event {
            name: name.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            articles: vec![],
            summary: None,
        }])
    }

    #[tokio::test]
    async fn test_memory_cache() {
        let cache = InMemoryCache::new();
        assert!(cache.get("timeline-storm").await.unwrap().is_none());

        cache
            .put("timeline-storm", &timeline("Storm"), Duration::from_secs(60))
            .await
            .unwrap();
        let cached = cache.get("timeline-storm").await.unwrap().unwrap();
        assert_eq!(cached.events[0].name, "Storm");
        assert!(cache.get("timeline-other").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_entries_are_evicted() {
        let cache = InMemoryCache::new();
        cache
            .put("timeline-storm", &timeline("Storm"), Duration::ZERO)
            .await
            .unwrap();
        assert_eq!(cache.len().await, 1);
        assert!(cache.get("timeline-storm").await.unwrap().is_none());
        assert_eq!(cache.len().await, 0);
    }

    #[test]
    fn test_store_expiry_is_relative_to_now() {
        let mut store = MemoryStore::new();
        let now = Instant::now();
        store.put("k", &timeline("Storm"), now, now + Duration::from_secs(10));
        assert!(store.get("k", now).is_some());
        assert!(store.get("k", now + Duration::from_secs(10)).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_put_sweeps_expired_entries() {
        let mut store = MemoryStore::new();
        let now = Instant::now();
        store.put("old", &timeline("Old"), now, now + Duration::from_secs(5));
        store.put("fresh", &timeline("Fresh"), now, now + Duration::from_secs(60));

        let later = now + Duration::from_secs(10);
        store.put("new", &timeline("New"), later, later + Duration::from_secs(60));
        assert_eq!(store.len(), 2);
        assert!(store.get("fresh", later).is_some());
        assert!(store.get("new", later).is_some());
    }
}
