//! Cache of upstream responses, keyed by `(path, query, media type)`.
//!
//! Two backends are in scope: [`inmemory::InMemoryResponseCache`] (bounded,
//! TTL-from-`set`) and [`redis_backend::RedisResponseCache`] (a single
//! atomic `SET ... EX`). Both may raise on `get`/`set`; [`ResponseCache::get`]
//! and [`ResponseCache::set`] on this trait are required to swallow those
//! errors and log them, since the cache is a performance aid whose outages
//! must degrade to pass-through, never a 5xx.

pub mod inmemory;
pub mod redis_backend;

use async_trait::async_trait;
use std::time::Duration;

/// `(path, normalized-query-string | none, best-accept-media-type)`.
/// Absence of a media type is a distinct value from any explicit one, so
/// `Accept: */*` and `Accept: application/vnd.github.v3+json` never share
/// an entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub path: String,
    pub query: Option<String>,
    pub media_type: Option<String>,
}

impl CacheKey {
    pub fn new(
        path: impl Into<String>,
        query: Option<String>,
        media_type: Option<String>,
    ) -> Self {
        Self {
            path: path.into(),
            query,
            media_type,
        }
    }

    /// Flat string form used as the literal key in both backends.
    pub fn to_cache_string(&self) -> String {
        format!(
            "{}|{}|{}",
            self.path,
            self.query.as_deref().unwrap_or(""),
            self.media_type.as_deref().unwrap_or("")
        )
    }
}

/// A stored upstream response. Only ever constructed for responses that
/// carried an `ETag` and/or `Last-Modified` header — see
/// [`crate::cached_get::cached_get`].
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct CachedResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl CachedResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn etag(&self) -> Option<&str> {
        self.header("etag")
    }

    pub fn last_modified(&self) -> Option<&str> {
        self.header("last-modified")
    }

    /// A response is only cacheable when the origin gave us a conditional
    /// revalidator to use on the next request.
    pub fn is_cacheable(&self) -> bool {
        self.etag().is_some() || self.last_modified().is_some()
    }
}

/// Backend-agnostic contract. Implementations may return `Err` from
/// `get`/`set`; callers always go through the [`ResponseCache`] facade,
/// which swallows and logs those errors.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    async fn get_raw(&self, key: &CacheKey) -> Result<Option<CachedResponse>, crate::error::CacheBackendError>;
    async fn set_raw(
        &self,
        key: &CacheKey,
        response: CachedResponse,
        ttl: Duration,
    ) -> Result<(), crate::error::CacheBackendError>;
}

/// Facade over a [`CacheBackend`] that never lets a backend error escape.
pub struct ResponseCache {
    backend: Box<dyn CacheBackend>,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(backend: Box<dyn CacheBackend>, ttl: Duration) -> Self {
        Self { backend, ttl }
    }

    pub async fn get(&self, key: &CacheKey) -> Option<CachedResponse> {
        match self.backend.get_raw(key).await {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(error = %err, key = %key.to_cache_string(), "cache get failed, treating as miss");
                None
            }
        }
    }

    pub async fn set(&self, key: &CacheKey, response: CachedResponse) {
        if let Err(err) = self.backend.set_raw(key, response, self.ttl).await {
            tracing::warn!(error = %err, key = %key.to_cache_string(), "cache set failed, dropping write");
        }
    }
}

/// Construct a [`ResponseCache`] from `cache_backend_url`'s scheme:
/// `inmemory://` or `redis://`/`rediss://`.
pub fn from_backend_url(
    url: &str,
    ttl: Duration,
    max_entries: usize,
) -> Result<ResponseCache, crate::error::ConfigurationError> {
    let scheme = url
        .split_once("://")
        .map(|(scheme, _)| scheme)
        .unwrap_or(url);

    let backend: Box<dyn CacheBackend> = match scheme {
        "inmemory" => Box::new(inmemory::InMemoryResponseCache::new(max_entries)),
        "redis" | "rediss" => Box::new(
            redis_backend::RedisResponseCache::new(url)
                .map_err(|e| crate::error::ConfigurationError::RegistryLoad(e.to_string()))?,
        ),
        other => return Err(crate::error::ConfigurationError::UnknownCacheScheme(other.to_string())),
    };

    Ok(ResponseCache::new(backend, ttl))
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
