use std::num::NonZeroUsize;
use std::sync::{Mutex, PoisonError};

use lru::LruCache;

use crate::geo::Coordinate;

/// Coordinates are bucketed to 4 decimals (~11 m) before lookup.
const KEY_SCALE: f64 = 10_000.0;

fn key(coordinate: Coordinate) -> (i64, i64) {
    (
        (coordinate.latitude * KEY_SCALE).round() as i64,
        (coordinate.longitude * KEY_SCALE).round() as i64,
    )
}

/// Reverse-geocoding cache so small movements do not trigger a new lookup.
/// Only resolved addresses are cached; misses are retried next time.
#[derive(Debug)]
pub struct AddressCache {
    cache: Mutex<LruCache<(i64, i64), String>>,
}

impl AddressCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn get(&self, coordinate: Coordinate) -> Option<String> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        cache.get(&key(coordinate)).cloned()
    }

    pub fn insert(&self, coordinate: Coordinate, address: String) {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        cache.put(key(coordinate), address);
    }

    pub fn len(&self) -> usize {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for AddressCache {
    fn default() -> Self {
        Self::new(NonZeroUsize::new(256).unwrap_or(NonZeroUsize::MIN))
    }
}
