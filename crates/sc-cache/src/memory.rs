//! In-memory cache implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::{Cache, CacheBucket};

type Entries = HashMap<(String, String), (String, Vec<u8>)>;

/// Process-local [`Cache`].
///
/// Clones and buckets opened from the same instance share storage, so a
/// second registry built against a clone sees what the first one wrote.
#[derive(Clone, Default)]
pub struct MemoryCache {
    entries: Arc<RwLock<Entries>>,
}

impl MemoryCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored entries across all buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().map_or(0, |entries| entries.len())
    }

    /// Returns `true` if nothing has been stored yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Cache for MemoryCache {
    fn bucket(&self, name: &str) -> Box<dyn CacheBucket> {
        Box::new(MemoryCacheBucket {
            name: name.to_owned(),
            entries: Arc::clone(&self.entries),
        })
    }
}

struct MemoryCacheBucket {
    name: String,
    entries: Arc<RwLock<Entries>>,
}

impl CacheBucket for MemoryCacheBucket {
    fn get(&self, key: &str, etag: &str) -> Option<Vec<u8>> {
        let entries = self.entries.read().ok()?;
        let (stored_etag, value) = entries.get(&(self.name.clone(), key.to_owned()))?;
        if !etag.is_empty() && stored_etag != etag {
            return None;
        }
        Some(value.clone())
    }

    fn set(&self, key: &str, etag: &str, value: &[u8]) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(
                (self.name.clone(), key.to_owned()),
                (etag.to_owned(), value.to_vec()),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_get() {
        let cache = MemoryCache::new();
        let bucket = cache.bucket("handlers");
        bucket.set("definitions", "v1", b"[]");

        assert_eq!(bucket.get("definitions", "v1"), Some(b"[]".to_vec()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_etag_mismatch_misses() {
        let cache = MemoryCache::new();
        let bucket = cache.bucket("handlers");
        bucket.set("definitions", "v1", b"[]");

        assert_eq!(bucket.get("definitions", "v2"), None);
        assert_eq!(bucket.get("definitions", ""), Some(b"[]".to_vec()));
    }

    #[test]
    fn test_buckets_are_isolated() {
        let cache = MemoryCache::new();
        cache.bucket("a").set("k", "", b"1");

        assert_eq!(cache.bucket("b").get("k", ""), None);
        assert_eq!(cache.bucket("a").get("k", ""), Some(b"1".to_vec()));
    }

    #[test]
    fn test_clones_share_storage() {
        let cache = MemoryCache::new();
        let other = cache.clone();
        assert!(other.is_empty());

        cache.bucket("handlers").set("definitions", "v1", b"x");

        assert_eq!(
            other.bucket("handlers").get("definitions", "v1"),
            Some(b"x".to_vec())
        );
    }
}
