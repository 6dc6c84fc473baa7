use crate::types::PriceSeries;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub instrument: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl CacheKey {
    pub fn new(instrument: &str, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            instrument: instrument.to_string(),
            start,
            end,
        }
    }
}

struct CacheEntry {
    series: PriceSeries,
    stored_at: Instant,
}

/// Fetched price series keyed by instrument and date range.
///
/// Entries older than `ttl` are stale and never returned.
pub struct PriceCache {
    data: Mutex<HashMap<CacheKey, CacheEntry>>,
    capacity: usize,
    ttl: Duration,
}

impl PriceCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            data: Mutex::new(HashMap::with_capacity(capacity)),
            capacity: capacity.max(1),
            ttl,
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<PriceSeries> {
        let mut data = self.lock();
        let entry = data.get(key)?;
        if entry.stored_at.elapsed() < self.ttl {
            return Some(entry.series.clone());
        }

        log::warn!(
            "Stale cache entry for {} ({} to {}), dropping",
            key.instrument,
            key.start,
            key.end
        );
        data.remove(key);
        None
    }

    pub fn insert(&self, key: CacheKey, series: PriceSeries) {
        let mut data = self.lock();
        if data.len() >= self.capacity && !data.contains_key(&key) {
            let ttl = self.ttl;
            data.retain(|_, entry| entry.stored_at.elapsed() < ttl);
            if data.len() >= self.capacity {
                // Still full: clear the cache
                data.clear();
            }
        }
        data.insert(
            key,
            CacheEntry {
                series,
                stored_at: Instant::now(),
            },
        );
    }

    /// Drops every cached range for `instrument`.
    pub fn invalidate(&self, instrument: &str) -> usize {
        let mut data = self.lock();
        let before = data.len();
        data.retain(|key, _| key.instrument != instrument);
        before - data.len()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<CacheKey, CacheEntry>> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
