//! Read cache keyed by `(collection, detail)`.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use learnhub_config::CacheConfig;
use moka::future::Cache;
use serde_json::Value;
use tracing::debug;

/// Groups of cached reads that a mutation can make stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Courses,
    Users,
    Requests,
    Enrollments,
    Progress,
    Stats,
}

impl Collection {
    pub fn as_str(self) -> &'static str {
        match self {
            Collection::Courses => "courses",
            Collection::Users => "users",
            Collection::Requests => "requests",
            Collection::Enrollments => "enrollments",
            Collection::Progress => "progress",
            Collection::Stats => "stats",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub collection: Collection,
    pub detail: String,
}

impl CacheKey {
    pub fn new(collection: Collection, detail: impl Into<String>) -> Self {
        Self {
            collection,
            detail: detail.into(),
        }
    }
}

/// Decoded JSON responses, evicted by size and age.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    inner: Cache<CacheKey, Value>,
}

impl ResponseCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(config.max_capacity)
                .time_to_live(Duration::from_secs(config.ttl_secs))
                .build(),
        }
    }

    pub async fn get(&self, key: &CacheKey) -> Option<Value> {
        self.inner.get(key).await
    }

    pub async fn insert(&self, key: CacheKey, value: Value) {
        self.inner.insert(key, value).await;
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.inner.contains_key(key)
    }

    /// Number of live entries belonging to `collection`.
    pub fn count(&self, collection: Collection) -> usize {
        self.inner
            .iter()
            .filter(|(key, _)| key.collection == collection)
            .count()
    }

    /// Drop every entry belonging to one of `collections`.
    pub async fn invalidate(&self, collections: &[Collection]) {
        let stale: Vec<Arc<CacheKey>> = self
            .inner
            .iter()
            .filter(|(key, _)| collections.contains(&key.collection))
            .map(|(key, _)| key)
            .collect();
        for key in &stale {
            self.inner.invalidate(key.as_ref()).await;
        }
        debug!(?collections, dropped = stale.len(), "cache invalidated");
    }

    pub fn clear(&self) {
        self.inner.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn invalidation_only_touches_named_collections() {
        let cache = ResponseCache::new(CacheConfig::default());
        cache.insert(CacheKey::new(Collection::Courses, ""), json!([])).await;
        cache.insert(CacheKey::new(Collection::Courses, "id"), json!({})).await;
        cache.insert(CacheKey::new(Collection::Users, ""), json!([])).await;

        cache.invalidate(&[Collection::Courses, Collection::Stats]).await;

        assert!(!cache.contains(&CacheKey::new(Collection::Courses, "")));
        assert!(!cache.contains(&CacheKey::new(Collection::Courses, "id")));
        assert!(cache.contains(&CacheKey::new(Collection::Users, "")));
        assert_eq!(cache.count(Collection::Users), 1);
    }
}
