//! Key-value cache collaborators for shortcode discovery.
//!
//! The discovery-backed registry in `sc-registry` never owns an invalidation
//! policy. It reads and writes a single entry through the traits defined here
//! and lets the cache decide when that entry stops being valid.
//!
//! - [`Cache`]: Factory for named buckets
//! - [`CacheBucket`]: Raw byte store keyed by `(key, etag)`
//! - [`CacheBucketExt`]: Typed JSON/string access on top of any bucket
//!
//! # Implementations
//!
//! - [`NullCache`]: Always misses (caching disabled)
//! - [`MemoryCache`]: Process-local, shared between handles
//! - [`FileCache`]: On-disk, wiped when the cache version changes
//!
//! # Example
//!
//! ```
//! use sc_cache::{Cache, CacheBucketExt, MemoryCache};
//!
//! let cache = MemoryCache::new();
//! let bucket = cache.bucket("handlers");
//! assert_eq!(bucket.get_json::<Vec<String>>("definitions", "v1"), None);
//!
//! bucket.set_json("definitions", "v1", &Vec::<String>::new());
//! assert_eq!(bucket.get_json::<Vec<String>>("definitions", "v1"), Some(vec![]));
//! ```

mod ext;
mod file;
mod memory;

pub use ext::CacheBucketExt;
pub use file::FileCache;
pub use memory::MemoryCache;

/// A named partition within a [`Cache`].
///
/// A hit requires both the key and the etag to match. The etag is opaque to
/// the bucket; callers typically pass a version string so that entries written
/// by an older build are ignored.
pub trait CacheBucket: Send + Sync {
    /// Retrieve a cached value.
    ///
    /// Returns `None` on a miss or etag mismatch. An empty `etag` accepts
    /// whatever etag the entry was stored with.
    fn get(&self, key: &str, etag: &str) -> Option<Vec<u8>>;

    /// Store a value, replacing any previous entry under `key`.
    fn set(&self, key: &str, etag: &str, value: &[u8]);
}

/// Factory for named [`CacheBucket`]s.
///
/// Buckets with different names never see each other's entries. Opening the
/// same name twice yields handles over the same storage.
pub trait Cache: Send + Sync {
    /// Open or create the bucket called `name`.
    fn bucket(&self, name: &str) -> Box<dyn CacheBucket>;
}

/// Bucket that stores nothing.
pub struct NullCacheBucket;

impl CacheBucket for NullCacheBucket {
    fn get(&self, _key: &str, _etag: &str) -> Option<Vec<u8>> {
        None
    }

    fn set(&self, _key: &str, _etag: &str, _value: &[u8]) {}
}

/// [`Cache`] used when caching is disabled; every lookup misses.
pub struct NullCache;

impl Cache for NullCache {
    fn bucket(&self, _name: &str) -> Box<dyn CacheBucket> {
        Box::new(NullCacheBucket)
    }
}
