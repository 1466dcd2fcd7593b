//! LRU memoization for reading lookups.

use std::cell::{Cell, RefCell};
use std::num::NonZeroUsize;

use lru::LruCache;

use crate::reading::ReadingProvider;
use crate::Result;

/// Caches successful lookups of an inner provider.
///
/// Failed lookups are not cached, so an error is reported every time the
/// offending text is looked up.
pub struct CachedReading<P> {
    inner: P,
    cache: RefCell<LruCache<String, String>>,
    hits: Cell<u64>,
}

impl<P: ReadingProvider> CachedReading<P> {
    pub fn new(inner: P, capacity: NonZeroUsize) -> Self {
        Self {
            inner,
            cache: RefCell::new(LruCache::new(capacity)),
            hits: Cell::new(0),
        }
    }

    /// Number of lookups answered from the cache so far.
    pub fn hits(&self) -> u64 {
        self.hits.get()
    }
}

impl<P: ReadingProvider> ReadingProvider for CachedReading<P> {
    fn reading(&self, text: &str) -> Result<String> {
        if let Some(reading) = self.cache.borrow_mut().get(text) {
            self.hits.set(self.hits.get() + 1);
            return Ok(reading.clone());
        }
        let reading = self.inner.reading(text)?;
        self.cache.borrow_mut().put(text.to_string(), reading.clone());
        Ok(reading)
    }
}
