// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded, TTL'd response cache keyed by full request URL.
//! No invalidation API; overflow evicts oldest-insertion-first, and expired
//! entries are skipped first to keep the working set small.

use ar_core::Clock;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

struct Entry<V> {
    value: V,
    expires_at_ms: i64,
}

pub struct TtlCache<V: Clone> {
    clock: Arc<dyn Clock>,
    capacity: usize,
    ttl: Duration,
    entries: Mutex<HashMap<String, Entry<V>>>,
    order: Mutex<VecDeque<String>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(clock: Arc<dyn Clock>, capacity: usize, ttl: Duration) -> Self {
        Self {
            clock,
            capacity,
            ttl,
            entries: Mutex::new(HashMap::new()),
            order: Mutex::new(VecDeque::new()),
        }
    }

    pub fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now_ms();
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some(entry) if entry.expires_at_ms > now => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn put(&self, key: String, value: V) {
        let expires_at_ms = self.clock.now_ms() + self.ttl.as_millis() as i64;
        let mut entries = self.entries.lock();
        let mut order = self.order.lock();

        if !entries.contains_key(&key) {
            order.push_back(key.clone());
        }
        entries.insert(key, Entry { value, expires_at_ms });

        if entries.len() <= self.capacity {
            return;
        }

        // Drop expired entries first; only fall back to oldest-insertion
        // eviction if that alone doesn't bring the map back under capacity.
        let now = self.clock.now_ms();
        let mut i = 0;
        while entries.len() > self.capacity && i < order.len() {
            let candidate = &order[i];
            let expired = entries.get(candidate).map(|e| e.expires_at_ms <= now).unwrap_or(true);
            if expired {
                entries.remove(candidate);
                order.remove(i);
            } else {
                i += 1;
            }
        }
        while entries.len() > self.capacity {
            if let Some(oldest) = order.pop_front() {
                entries.remove(&oldest);
            } else {
                break;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ar_core::FakeClock;

    fn cache(capacity: usize, ttl_secs: u64) -> (TtlCache<String>, Arc<FakeClock>) {
        let clock = Arc::new(FakeClock::new(0));
        let cache = TtlCache::new(clock.clone() as Arc<dyn Clock>, capacity, Duration::from_secs(ttl_secs));
        (cache, clock)
    }

    #[test]
    fn get_returns_none_for_missing_key() {
        let (cache, _clock) = cache(10, 60);
        assert!(cache.get("x").is_none());
    }

    #[test]
    fn entries_expire_after_ttl() {
        let (cache, clock) = cache(10, 60);
        cache.put("k".into(), "v".into());
        assert_eq!(cache.get("k"), Some("v".to_string()));
        clock.advance_ms(61_000);
        assert!(cache.get("k").is_none());
    }

    #[test]
    fn overflow_evicts_oldest_insertion_first() {
        let (cache, _clock) = cache(2, 60);
        cache.put("a".into(), "1".into());
        cache.put("b".into(), "2".into());
        cache.put("c".into(), "3".into());
        assert!(cache.get("a").is_none());
        assert_eq!(cache.get("b"), Some("2".to_string()));
        assert_eq!(cache.get("c"), Some("3".to_string()));
    }

    #[test]
    fn overflow_prefers_evicting_expired_entries_over_fresh_ones() {
        let (cache, clock) = cache(2, 60);
        cache.put("a".into(), "1".into());
        clock.advance_ms(61_000);
        cache.put("b".into(), "2".into());
        clock.advance_ms(0);
        cache.put("c".into(), "3".into());
        // "a" is expired and should be dropped first, leaving "b" and "c".
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("c"), Some("3".to_string()));
    }
}
