use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
struct CacheEntry {
    value: f64,
    stored_at: Instant,
}

/// Estimates keyed by (brand, title) so a listing re-seen within a session
/// keeps the same noisy value.
#[derive(Debug, Clone)]
pub struct EstimateCache {
    ttl: Duration,
    entries: HashMap<(String, String), CacheEntry>,
}

impl EstimateCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn get(&self, brand: &str, title: &str) -> Option<f64> {
        self.get_at(brand, title, Instant::now())
    }

    pub fn get_at(&self, brand: &str, title: &str, now: Instant) -> Option<f64> {
        let entry = self.entries.get(&(brand.to_string(), title.to_string()))?;
        if now.saturating_duration_since(entry.stored_at) < self.ttl {
            Some(entry.value)
        } else {
            None
        }
    }

    pub fn insert(&mut self, brand: &str, title: &str, value: f64) {
        self.insert_at(brand, title, value, Instant::now());
    }

    pub fn insert_at(&mut self, brand: &str, title: &str, value: f64, now: Instant) {
        self.entries.insert(
            (brand.to_string(), title.to_string()),
            CacheEntry {
                value,
                stored_at: now,
            },
        );
    }

    /// Drop expired entries; returns how many were removed.
    pub fn purge_expired(&mut self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        let ttl = self.ttl;
        self.entries
            .retain(|_, entry| now.saturating_duration_since(entry.stored_at) < ttl);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
