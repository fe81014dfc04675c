//! Per-installation GitHub App token acquisition and caching.
//!
//! For each configured [`AppInstallation`], mints a JWT (RS256, signed with
//! the App's private key) and exchanges it for a short-lived installation
//! access token, caching the token until it nears expiry.

use chrono::{DateTime, Duration, Utc};
use github_app_auth::auth::jwt::{JwtGenerator, RS256JwtGenerator};
use github_app_auth::auth::InstallationToken;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::credential::AppInstallation;
use crate::error::AppTokenMintError;

#[derive(Deserialize)]
struct AccessTokenResponse {
    token: String,
    expires_at: DateTime<Utc>,
}

struct CachedInstallationToken {
    token: InstallationToken,
    /// `expires_at - padding`; the instant after which this entry is no
    /// longer returned from cache.
    ttu: DateTime<Utc>,
}

/// Mints and caches GitHub App installation tokens.
///
/// A mint failure (JWT signing or a non-2xx upstream response) is returned
/// to the caller as [`AppTokenMintError`]; callers such as
/// [`crate::credential_iterator::CredentialIterator`] treat that App as
/// unavailable for the current request rather than treating it as fatal.
pub struct AppTokenCache {
    http_client: reqwest::Client,
    github_api_url: String,
    padding: Duration,
    cache: RwLock<HashMap<String, CachedInstallationToken>>,
}

impl AppTokenCache {
    pub fn new(http_client: reqwest::Client, github_api_url: impl Into<String>, padding: Duration) -> Self {
        Self {
            http_client,
            github_api_url: github_api_url.into(),
            padding,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Return a non-expired cached installation token for `installation`,
    /// minting a fresh one if absent or past its TTU.
    pub async fn get(
        &self,
        installation: &AppInstallation,
    ) -> Result<InstallationToken, AppTokenMintError> {
        if let Some(token) = self.cached(&installation.name) {
            return Ok(token);
        }
        self.mint(installation).await
    }

    fn cached(&self, app_name: &str) -> Option<InstallationToken> {
        let cache = self.cache.read().expect("app token cache poisoned");
        let entry = cache.get(app_name)?;
        if Utc::now() < entry.ttu {
            Some(entry.token.clone())
        } else {
            None
        }
    }

    async fn mint(
        &self,
        installation: &AppInstallation,
    ) -> Result<InstallationToken, AppTokenMintError> {
        let generator = RS256JwtGenerator::new(installation.private_key.clone());
        let jwt = generator
            .generate_jwt(installation.app_id)
            .await
            .map_err(|source| AppTokenMintError::SigningFailed {
                app_name: installation.name.clone(),
                source,
            })?;

        let url = format!(
            "{}/app/installations/{}/access_tokens",
            self.github_api_url.trim_end_matches('/'),
            installation.installation_id
        );

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(jwt.token())
            .header("Accept", "application/vnd.github+json")
            .send()
            .await
            .map_err(|source| AppTokenMintError::RequestFailed {
                app_name: installation.name.clone(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(AppTokenMintError::UpstreamRejected {
                app_name: installation.name.clone(),
                status: response.status().as_u16(),
            });
        }

        let body: AccessTokenResponse =
            response
                .json()
                .await
                .map_err(|source| AppTokenMintError::RequestFailed {
                    app_name: installation.name.clone(),
                    source,
                })?;

        let token =
            InstallationToken::new(body.token, installation.installation_id, body.expires_at);

        let ttu = body.expires_at - self.padding;
        self.cache.write().expect("app token cache poisoned").insert(
            installation.name.clone(),
            CachedInstallationToken {
                token: token.clone(),
                ttu,
            },
        );

        tracing::info!(app = %installation.name, %ttu, "minted installation token");

        Ok(token)
    }
}

#[cfg(test)]
#[path = "app_token_cache_tests.rs"]
mod tests;
