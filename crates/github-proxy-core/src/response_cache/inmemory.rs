//! In-process, bounded, TTL-expiring response cache.
//!
//! Grounded on the original's `cachetools.TTLCache(maxsize, ttl)` usage:
//! a bounded map where entries expire a fixed duration after `set` and,
//! on overflow, the oldest entry (by insertion, not by last access) is
//! evicted to make room.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, VecDeque};
use std::sync::RwLock;
use std::time::Duration;

use crate::error::CacheBackendError;

use super::{CacheBackend, CacheKey, CachedResponse};

struct Entry {
    response: CachedResponse,
    expires_at: DateTime<Utc>,
}

struct State {
    entries: HashMap<String, Entry>,
    insertion_order: VecDeque<String>,
}

/// Bounded, TTL-expiring in-memory cache. Safe to share across request
/// tasks behind an `Arc`.
pub struct InMemoryResponseCache {
    state: RwLock<State>,
    max_entries: usize,
}

impl InMemoryResponseCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            state: RwLock::new(State {
                entries: HashMap::new(),
                insertion_order: VecDeque::new(),
            }),
            max_entries,
        }
    }
}

#[async_trait]
impl CacheBackend for InMemoryResponseCache {
    async fn get_raw(&self, key: &CacheKey) -> Result<Option<CachedResponse>, CacheBackendError> {
        let cache_key = key.to_cache_string();
        let mut state = self.state.write().expect("response cache poisoned");

        let expired = match state.entries.get(&cache_key) {
            Some(entry) => Utc::now() >= entry.expires_at,
            None => return Ok(None),
        };

        if expired {
            state.entries.remove(&cache_key);
            return Ok(None);
        }

        Ok(state.entries.get(&cache_key).map(|e| e.response.clone()))
    }

    async fn set_raw(
        &self,
        key: &CacheKey,
        response: CachedResponse,
        ttl: Duration,
    ) -> Result<(), CacheBackendError> {
        let cache_key = key.to_cache_string();
        let expires_at = Utc::now()
            + chrono::Duration::from_std(ttl)
                .map_err(|e| CacheBackendError::Malformed(e.to_string()))?;

        let mut state = self.state.write().expect("response cache poisoned");

        if !state.entries.contains_key(&cache_key) && state.entries.len() >= self.max_entries {
            if let Some(oldest) = state.insertion_order.pop_front() {
                state.entries.remove(&oldest);
            }
        }

        state.insertion_order.push_back(cache_key.clone());
        state.entries.insert(cache_key, Entry { response, expires_at });

        Ok(())
    }
}

#[cfg(test)]
#[path = "inmemory_tests.rs"]
mod tests;
