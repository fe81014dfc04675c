//! Time-expiring set of rate-limited credentials.
//!
//! GitHub's reset timestamps are wall-clock, not monotonic, so eviction is
//! driven by `chrono::Utc::now()` rather than `Instant`. A `BTreeMap` keyed
//! by eviction instant gives "evict earliest reset first" on overflow; a
//! parallel `HashMap` gives O(1) `contains`. Both are guarded by one
//! `RwLock` so a `mark` followed by a `contains` on another thread observes
//! a consistent view.

use chrono::{DateTime, Duration, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use crate::credential::CredentialKey;

/// `(credentialOrigin, credentialName) -> resetInstant` with automatic,
/// wall-clock-driven eviction.
pub struct RateLimitMap {
    /// `resetAt + padding -> keys evicted at that instant`. `BTreeMap`
    /// iteration order is ascending, so the first entry is always the next
    /// (or most overdue) eviction.
    by_eviction: RwLock<BTreeMapState>,
    max_size: usize,
    padding: Duration,
}

struct BTreeMapState {
    evictions: BTreeMap<DateTime<Utc>, Vec<CredentialKey>>,
    index: HashMap<CredentialKey, DateTime<Utc>>,
}

impl BTreeMapState {
    fn new() -> Self {
        Self {
            evictions: BTreeMap::new(),
            index: HashMap::new(),
        }
    }

    fn evict_expired(&mut self, now: DateTime<Utc>) {
        let expired_instants: Vec<DateTime<Utc>> = self
            .evictions
            .range(..=now)
            .map(|(instant, _)| *instant)
            .collect();
        for instant in expired_instants {
            if let Some(keys) = self.evictions.remove(&instant) {
                for key in keys {
                    self.index.remove(&key);
                }
            }
        }
    }

    fn remove_key(&mut self, key: &CredentialKey) {
        if let Some(instant) = self.index.remove(key) {
            if let Some(keys) = self.evictions.get_mut(&instant) {
                keys.retain(|k| k != key);
                if keys.is_empty() {
                    self.evictions.remove(&instant);
                }
            }
        }
    }

    fn insert(&mut self, key: CredentialKey, eviction_at: DateTime<Utc>) {
        self.remove_key(&key);
        self.evictions.entry(eviction_at).or_default().push(key.clone());
        self.index.insert(key, eviction_at);
    }

    fn len(&self) -> usize {
        self.index.len()
    }

    /// Evict whichever entry has the earliest eviction instant, regardless
    /// of whether it has actually reached that instant yet.
    fn evict_earliest(&mut self) {
        if let Some((&instant, _)) = self.evictions.iter().next() {
            if let Some(keys) = self.evictions.remove(&instant) {
                for key in &keys {
                    self.index.remove(key);
                }
                // Earliest entry may have had siblings sharing the same
                // instant; requeue all but the very first so overflow only
                // drops one logical entry.
                if keys.len() > 1 {
                    let (_, rest) = keys.split_first().expect("non-empty");
                    self.evictions.insert(instant, rest.to_vec());
                    for key in rest {
                        self.index.insert(key.clone(), instant);
                    }
                }
            }
        }
    }
}

impl RateLimitMap {
    /// Create a new map bounded to `max_size` entries. `padding` is added
    /// past each `resetAt` as a safety margin against clock skew.
    pub fn new(max_size: usize, padding: Duration) -> Self {
        Self {
            by_eviction: RwLock::new(BTreeMapState::new()),
            max_size,
            padding,
        }
    }

    /// Record that `key` is rate-limited until `reset_at` (plus padding).
    /// Overwrites any existing entry for `key`. Evicts the earliest-reset
    /// entry first if this insert would exceed `max_size`.
    pub fn mark(&self, key: CredentialKey, reset_at: DateTime<Utc>) {
        let eviction_at = reset_at + self.padding;
        let mut state = self.by_eviction.write().expect("rate limit map poisoned");
        state.evict_expired(Utc::now());

        let already_present = state.index.contains_key(&key);
        if !already_present && state.len() >= self.max_size {
            state.evict_earliest();
        }
        state.insert(key, eviction_at);
    }

    /// True iff `key` is currently recorded as rate-limited (i.e. has not
    /// yet reached `resetAt + padding`).
    pub fn contains(&self, key: &CredentialKey) -> bool {
        let mut state = self.by_eviction.write().expect("rate limit map poisoned");
        state.evict_expired(Utc::now());
        state.index.contains_key(key)
    }

    /// Number of currently-tracked (non-evicted) entries.
    pub fn len(&self) -> usize {
        let mut state = self.by_eviction.write().expect("rate limit map poisoned");
        state.evict_expired(Utc::now());
        state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "rate_limit_map_tests.rs"]
mod tests;
