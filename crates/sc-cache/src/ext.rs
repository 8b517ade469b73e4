//! Typed access for [`CacheBucket`].

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::CacheBucket;

/// JSON helpers available on every [`CacheBucket`].
///
/// Kept separate from [`CacheBucket`] so that the bucket trait stays
/// object-safe and implementors only deal with bytes.
pub trait CacheBucketExt: CacheBucket {
    /// Read and deserialize a JSON entry.
    ///
    /// A payload that no longer deserializes (for example after a struct
    /// change) is reported as a miss.
    fn get_json<T: DeserializeOwned>(&self, key: &str, etag: &str) -> Option<T> {
        let bytes = self.get(key, etag)?;
        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!(key, error = %e, "discarding undecodable cache entry");
                None
            }
        }
    }

    /// Serialize `value` as JSON and store it. Serialization failures are logged and dropped.
    fn set_json<T: Serialize>(&self, key: &str, etag: &str, value: &T) {
        match serde_json::to_vec(value) {
            Ok(bytes) => self.set(key, etag, &bytes),
            Err(e) => tracing::warn!(key, error = %e, "failed to serialize cache entry"),
        }
    }
}

impl<B: CacheBucket + ?Sized> CacheBucketExt for B {}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde::Deserialize;

    use super::*;
    use crate::{Cache, MemoryCache};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Entry {
        tag: String,
        wraps: bool,
    }

    #[test]
    fn test_json_round_trip_through_bucket() {
        let cache = MemoryCache::new();
        let bucket = cache.bucket("handlers");
        let entries = vec![Entry {
            tag: "off".to_owned(),
            wraps: true,
        }];

        bucket.set_json("definitions", "v1", &entries);

        assert_eq!(
            bucket.get_json::<Vec<Entry>>("definitions", "v1"),
            Some(entries)
        );
    }

    #[test]
    fn test_get_json_treats_garbage_as_miss() {
        let cache = MemoryCache::new();
        let bucket = cache.bucket("handlers");
        bucket.set("definitions", "v1", b"not json");

        assert_eq!(bucket.get_json::<Vec<Entry>>("definitions", "v1"), None);
    }

    #[test]
    fn test_empty_list_is_a_hit() {
        let cache = MemoryCache::new();
        let bucket = cache.bucket("handlers");
        bucket.set_json("definitions", "v1", &Vec::<Entry>::new());

        assert_eq!(
            bucket.get_json::<Vec<Entry>>("definitions", "v1"),
            Some(Vec::new())
        );
    }
}
