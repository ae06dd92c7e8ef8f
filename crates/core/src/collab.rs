// ABOUTME: Interfaces to the collaborators the pipeline calls out to: page fetch, cache, image download.
// ABOUTME: Includes no-op implementations so the pipeline works without a cache or image store.

use std::path::PathBuf;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{trace, warn};

use crate::error::ScoutError;

/// Retrieves a page body. Implementations perform no retries of their own
/// beyond what the transport does.
pub trait Fetcher {
    fn fetch(&self, url: &str, headers: &[(String, String)]) -> Result<String, ScoutError>;
}

/// A string-valued store with per-read expiry.
pub trait Cache {
    /// Returns the stored value if it is younger than `max_age`.
    fn load(&self, key: &str, max_age: Duration) -> Option<String>;

    fn store(&self, key: &str, value: &str) -> Result<(), ScoutError>;
}

/// Computes fresh every time.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl Cache for NoCache {
    fn load(&self, _key: &str, _max_age: Duration) -> Option<String> {
        None
    }

    fn store(&self, _key: &str, _value: &str) -> Result<(), ScoutError> {
        Ok(())
    }
}

/// Returns the cached value for `key`, or runs `producer` and stores its output.
///
/// Values are stored as JSON. `keep` decides whether a produced value is worth
/// storing; unreadable entries are treated as misses.
pub fn cached<C, T, F, K>(cache: &C, key: &str, max_age: Duration, producer: F, keep: K) -> T
where
    C: Cache + ?Sized,
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> T,
    K: FnOnce(&T) -> bool,
{
    if let Some(stored) = cache.load(key, max_age) {
        match serde_json::from_str(&stored) {
            Ok(value) => {
                trace!(key, "cache hit");
                return value;
            }
            Err(err) => warn!(key, %err, "discarding unreadable cache entry"),
        }
    }

    let value = producer();
    if keep(&value) {
        let stored = serde_json::to_string(&value)
            .map_err(ScoutError::from)
            .and_then(|json| cache.store(key, &json));
        if let Err(err) = stored {
            warn!(key, %err, "could not store cache entry");
        }
    }
    value
}

/// Downloads a listing image and persists it under the item identifier.
pub trait ImageStore {
    fn fetch_image(&self, image_url: &str, item_id: &str) -> Option<PathBuf>;
}

/// Never downloads anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoImages;

impl ImageStore for NoImages {
    fn fetch_image(&self, _image_url: &str, _item_id: &str) -> Option<PathBuf> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemoryCache {
        entries: RefCell<HashMap<String, String>>,
    }

    impl Cache for MemoryCache {
        fn load(&self, key: &str, _max_age: Duration) -> Option<String> {
            self.entries.borrow().get(key).cloned()
        }

        fn store(&self, key: &str, value: &str) -> Result<(), ScoutError> {
            self.entries
                .borrow_mut()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    const AGE: Duration = Duration::from_secs(60);

    #[test]
    fn cached_computes_once() {
        let cache = MemoryCache::default();
        let calls = Cell::new(0);
        let produce = || {
            calls.set(calls.get() + 1);
            vec![1u32, 2, 3]
        };

        let first: Vec<u32> = cached(&cache, "k", AGE, produce, |_| true);
        let second: Vec<u32> = cached(&cache, "k", AGE, produce, |_| true);
        assert_eq!(first, second);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn cached_skips_store_when_rejected() {
        let cache = MemoryCache::default();
        let value: Vec<u32> = cached(&cache, "empty", AGE, Vec::new, |v: &Vec<u32>| !v.is_empty());
        assert!(value.is_empty());
        assert!(cache.entries.borrow().is_empty());
    }

    #[test]
    fn cached_recovers_from_corrupt_entry() {
        let cache = MemoryCache::default();
        cache.store("k", "{not json").unwrap();
        let value: Vec<u32> = cached(&cache, "k", AGE, || vec![7], |_| true);
        assert_eq!(value, vec![7]);
        assert_eq!(cache.entries.borrow().get("k").map(String::as_str), Some("[7]"));
    }

    #[test]
    fn no_cache_always_produces() {
        let calls = Cell::new(0);
        for _ in 0..2 {
            let _: u32 = cached(&NoCache, "k", AGE, || {
                calls.set(calls.get() + 1);
                1
            }, |_| true);
        }
        assert_eq!(calls.get(), 2);
    }
}
