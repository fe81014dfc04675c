//! Cache lookup, conditional upstream revalidation, cache update, and
//! telemetry emission. The only entry point safe-method requests use; the
//! mutating verbs call [`crate::forwarder::Forwarder::send`] directly.

use reqwest::header::HeaderMap;

use crate::credential_iterator::CredentialPool;
use crate::error::ForwarderError;
use crate::forwarder::{Conditional, ForwardedResponse, Forwarder};
use crate::response_cache::{CacheKey, CachedResponse, ResponseCache};
use crate::telemetry::CacheHit;

/// Parameters for a single cached GET, already resolved by the HTTP layer
/// (accept-header negotiation, query-string extraction).
pub struct CachedGetRequest<'a> {
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub media_type: Option<&'a str>,
    pub headers: &'a HeaderMap,
}

/// Outcome of [`cached_get`]: the response to return to the client, plus
/// the cache-hit classification to hand to telemetry.
pub struct CachedGetOutcome {
    pub response: ForwardedResponse,
    pub cache_hit: Option<CacheHit>,
}

/// Implements spec §4.7: look up the cache, issue a conditional (or plain)
/// upstream request through `forwarder`, update the cache, and report
/// which of the three cache outcomes occurred.
pub async fn cached_get(
    forwarder: &Forwarder,
    cache: &ResponseCache,
    pool: &CredentialPool,
    request: CachedGetRequest<'_>,
) -> Result<CachedGetOutcome, ForwarderError> {
    let key = CacheKey::new(
        request.path.to_string(),
        request.query.map(str::to_string),
        request.media_type.map(str::to_string),
    );

    match cache.get(&key).await {
        None => {
            let response = forwarder
                .send(
                    pool,
                    "GET",
                    request.path,
                    request.query,
                    request.headers,
                    Vec::new(),
                    Conditional::default(),
                )
                .await?;

            let cache_hit = store_if_cacheable(cache, &key, &response).await;
            Ok(CachedGetOutcome { response, cache_hit })
        }
        Some(cached) => {
            let conditional = Conditional {
                etag: cached.etag().map(str::to_string),
                last_modified: cached.last_modified().map(str::to_string),
            };

            let response = forwarder
                .send(
                    pool,
                    "GET",
                    request.path,
                    request.query,
                    request.headers,
                    Vec::new(),
                    conditional,
                )
                .await?;

            if response.status == 304 {
                Ok(CachedGetOutcome {
                    response: from_cached(cached),
                    cache_hit: Some(CacheHit::Hit),
                })
            } else {
                let cache_hit = store_if_cacheable(cache, &key, &response).await;
                Ok(CachedGetOutcome {
                    response,
                    cache_hit: cache_hit.or(Some(CacheHit::Miss)),
                })
            }
        }
    }
}

async fn store_if_cacheable(
    cache: &ResponseCache,
    key: &CacheKey,
    response: &ForwardedResponse,
) -> Option<CacheHit> {
    let candidate = CachedResponse {
        status: response.status,
        headers: response.headers.clone(),
        body: response.body.clone(),
    };

    if candidate.is_cacheable() {
        cache.set(key, candidate).await;
        Some(CacheHit::Miss)
    } else {
        Some(CacheHit::NotCacheable)
    }
}

fn from_cached(cached: CachedResponse) -> ForwardedResponse {
    ForwardedResponse {
        status: cached.status,
        headers: cached.headers,
        body: cached.body,
    }
}

#[cfg(test)]
#[path = "cached_get_tests.rs"]
mod tests;
