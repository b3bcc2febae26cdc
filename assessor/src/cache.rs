//! Time-bounded assessment cache.
//!
//! Entries are keyed by the normalized address and expire after a fixed TTL
//! measured on an injected [`Clock`]. Overwriting a key resets its TTL.
//! Expired entries are swept out by [`AssessmentCache::set`] at most once per
//! TTL period, so the map never holds more than two periods of inserts.

use safereg_types::{Address, Assessment, Clock, Timestamp};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

pub const CACHE_KEY_PREFIX: &str = "check_";
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Cache key for an address: `check_` followed by the lowercase hex form.
pub fn cache_key(address: &Address) -> String {
    format!("{CACHE_KEY_PREFIX}{}", address.normalized())
}

/// Storage for built assessments.
pub trait AssessmentCache: Send + Sync {
    /// The cached value, unless absent or expired.
    fn get(&self, key: &str) -> Option<Assessment>;
    fn set(&self, key: &str, assessment: Assessment);
}

struct CacheEntry {
    value: Assessment,
    inserted_at: Timestamp,
}

struct Entries {
    map: HashMap<String, CacheEntry>,
    last_sweep: Timestamp,
}

/// In-memory [`AssessmentCache`] with a single TTL for all entries.
///
/// Time is read from the [`Clock`] in whole seconds. An entry inserted at
/// second `t` is a miss from second `t + ttl` onward, so its wall-clock
/// lifetime lies in `(ttl - 1, ttl]` seconds. Sub-second TTLs round down.
pub struct TtlCache {
    entries: RwLock<Entries>,
    ttl_secs: u64,
    clock: Arc<dyn Clock>,
}

impl TtlCache {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        let last_sweep = clock.now();
        Self {
            entries: RwLock::new(Entries {
                map: HashMap::new(),
                last_sweep,
            }),
            ttl_secs: ttl.as_secs(),
            clock,
        }
    }

    /// Number of stored entries, expired ones not yet swept included.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every expired entry. Returns how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let Ok(mut entries) = self.entries.write() else {
            return 0;
        };
        self.sweep(&mut entries, now)
    }

    fn sweep(&self, entries: &mut Entries, now: Timestamp) -> usize {
        let before = entries.map.len();
        entries
            .map
            .retain(|_, e| !e.inserted_at.has_expired(self.ttl_secs, now));
        entries.last_sweep = now;
        before - entries.map.len()
    }
}

impl AssessmentCache for TtlCache {
    fn get(&self, key: &str) -> Option<Assessment> {
        let now = self.clock.now();
        let entries = self.entries.read().ok()?;
        let entry = entries.map.get(key)?;
        if entry.inserted_at.has_expired(self.ttl_secs, now) {
            return None;
        }
        Some(entry.value.clone())
    }

    fn set(&self, key: &str, assessment: Assessment) {
        let now = self.clock.now();
        let Ok(mut entries) = self.entries.write() else {
            return;
        };
        if entries.last_sweep.has_expired(self.ttl_secs, now) {
            self.sweep(&mut entries, now);
        }
        entries.map.insert(
            key.to_string(),
            CacheEntry {
                value: assessment,
                inserted_at: now,
            },
        );
    }
}
