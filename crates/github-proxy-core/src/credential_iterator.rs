//! A single-shot, ordered sequence over the configured credentials.
//!
//! Apps in configuration order, then PATs in configuration order; anything
//! [`RateLimitMap`] reports as contained is skipped, and an App whose
//! installation-token mint fails is skipped rather than retried. The
//! iterator is finite and not restartable — the [`crate::forwarder::Forwarder`]
//! builds a fresh one per inbound request.

use std::sync::Arc;

use crate::app_token_cache::AppTokenCache;
use crate::credential::{AppInstallation, Credential, PersonalAccessToken};
use crate::rate_limit_map::RateLimitMap;

/// The full, ordered pool of credentials the proxy may draw from.
#[derive(Clone)]
pub struct CredentialPool {
    pub apps: Arc<Vec<AppInstallation>>,
    pub pats: Arc<Vec<PersonalAccessToken>>,
}

impl CredentialPool {
    pub fn new(apps: Vec<AppInstallation>, pats: Vec<PersonalAccessToken>) -> Self {
        Self {
            apps: Arc::new(apps),
            pats: Arc::new(pats),
        }
    }

    /// Build a fresh, single-pass iterator over this pool.
    pub fn iter<'a>(
        &'a self,
        rate_limits: &'a RateLimitMap,
        app_tokens: &'a AppTokenCache,
    ) -> CredentialIterator<'a> {
        CredentialIterator {
            pool: self,
            rate_limits,
            app_tokens,
            app_index: 0,
            pat_index: 0,
        }
    }
}

/// Lazy, ordered, single-pass sequence of usable credentials.
pub struct CredentialIterator<'a> {
    pool: &'a CredentialPool,
    rate_limits: &'a RateLimitMap,
    app_tokens: &'a AppTokenCache,
    app_index: usize,
    pat_index: usize,
}

impl<'a> CredentialIterator<'a> {
    /// Yield the next usable credential, or `None` once the pool is
    /// exhausted. Not a blanket `Iterator` impl because token minting is
    /// async.
    pub async fn next(&mut self) -> Option<Credential> {
        while self.app_index < self.pool.apps.len() {
            let installation = &self.pool.apps[self.app_index];
            self.app_index += 1;

            let key = installation.key();
            if self.rate_limits.contains(&key) {
                tracing::debug!(app = %installation.name, "skipping rate-limited app");
                continue;
            }

            match self.app_tokens.get(installation).await {
                Ok(token) => {
                    return Some(Credential {
                        key,
                        value: token.token().to_string(),
                    });
                }
                Err(err) => {
                    tracing::warn!(app = %installation.name, error = %err, "skipping app: token mint failed");
                    continue;
                }
            }
        }

        while self.pat_index < self.pool.pats.len() {
            let pat = &self.pool.pats[self.pat_index];
            self.pat_index += 1;

            let key = pat.key();
            if self.rate_limits.contains(&key) {
                tracing::debug!(pat = %pat.name, "skipping rate-limited pat");
                continue;
            }

            return Some(Credential {
                key,
                value: pat.value.clone(),
            });
        }

        None
    }
}

#[cfg(test)]
#[path = "credential_iterator_tests.rs"]
mod tests;
