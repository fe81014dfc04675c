//! Redis-backed response cache.
//!
//! Grounded on the original's `RedisCache`, but where that implementation
//! stores fields with `hset` followed by a separate `expire()` call (its
//! own comment notes this "ideally" would be one atomic transaction), this
//! backend stores the serialized response with a single `SET key value EX
//! ttl`, so a crash between the two calls can never leave a key without an
//! expiry.

use async_trait::async_trait;
use redis::AsyncCommands;
use std::time::Duration;

use crate::error::CacheBackendError;

use super::{CacheBackend, CacheKey, CachedResponse};

/// Redis-backed implementation of [`CacheBackend`].
pub struct RedisResponseCache {
    client: redis::Client,
}

impl RedisResponseCache {
    pub fn new(url: &str) -> Result<Self, redis::RedisError> {
        Ok(Self {
            client: redis::Client::open(url)?,
        })
    }
}

#[async_trait]
impl CacheBackend for RedisResponseCache {
    async fn get_raw(&self, key: &CacheKey) -> Result<Option<CachedResponse>, CacheBackendError> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| CacheBackendError::Unavailable(e.to_string()))?;

        let raw: Option<Vec<u8>> = conn
            .get(key.to_cache_string())
            .await
            .map_err(|e| CacheBackendError::Unavailable(e.to_string()))?;

        match raw {
            None => Ok(None),
            Some(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|e| CacheBackendError::Malformed(e.to_string())),
        }
    }

    async fn set_raw(
        &self,
        key: &CacheKey,
        response: CachedResponse,
        ttl: Duration,
    ) -> Result<(), CacheBackendError> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| CacheBackendError::Unavailable(e.to_string()))?;

        let payload = serde_json::to_vec(&response)
            .map_err(|e| CacheBackendError::Malformed(e.to_string()))?;

        let ttl_seconds = ttl.as_secs().max(1);

        let _: () = conn
            .set_ex(key.to_cache_string(), payload, ttl_seconds)
            .await
            .map_err(|e| CacheBackendError::Unavailable(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
#[path = "redis_backend_tests.rs"]
mod tests;
