//! Environment-variable configuration loading for the GitHub proxy core.
//!
//! Grounded on the original's `os.environ` scan for `GITHUB_PAT_*` /
//! `GITHUB_APP_*` families: credentials are discovered by prefix rather
//! than declared as a single structured list, so operators can add a
//! credential by setting environment variables alone.

pub mod client_registry;

use chrono::Duration as ChronoDuration;
use github_app_auth::auth::{GitHubAppId, InstallationId, PrivateKey};
use github_proxy_core::error::ConfigurationError;
use github_proxy_core::{AppInstallation, PersonalAccessToken};
use std::collections::{BTreeMap, HashSet};
use std::time::Duration;
use tracing::warn;

pub use client_registry::load_client_registry;

const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
const DEFAULT_CACHE_TTL_SECS: u64 = 60;
const DEFAULT_CACHE_BACKEND_URL: &str = "inmemory://";
const DEFAULT_CREDS_CACHE_MAXSIZE: usize = 64;
const DEFAULT_CREDS_CACHE_TTL_PADDING_MINUTES: i64 = 5;
const DEFAULT_CACHE_MAX_ENTRIES: usize = 1024;

/// Everything the core needs to start serving: the credential pool, cache
/// wiring parameters, and the path to the client registry file.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub github_api_url: String,
    pub cache_ttl: Duration,
    pub cache_backend_url: String,
    pub cache_max_entries: usize,
    pub creds_cache_maxsize: usize,
    pub creds_cache_ttl_padding: ChronoDuration,
    pub client_registry_file_path: Option<String>,
    pub apps: Vec<AppInstallation>,
    pub pats: Vec<PersonalAccessToken>,
}

/// Load [`ProxyConfig`] from the process environment. See the module docs
/// on [`client_registry`] for the registry file itself.
pub fn load_from_env() -> Result<ProxyConfig, ConfigurationError> {
    let config = load_from(std::env::vars().collect())?;
    if !config.pats.is_empty() || !config.apps.is_empty() {
        warn!(
            "credentials were sourced from plaintext GITHUB_PAT_*/GITHUB_APP_*_PEM \
             environment variables; prefer a secrets manager in production"
        );
    }
    Ok(config)
}

/// Testable entry point: load from an explicit `(name, value)` map instead
/// of the real process environment.
pub fn load_from(env: BTreeMap<String, String>) -> Result<ProxyConfig, ConfigurationError> {
    let github_api_url = env
        .get("GITHUB_API_URL")
        .cloned()
        .unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_string());

    let cache_ttl = Duration::from_secs(parse_env_u64(
        &env,
        "CACHE_TTL",
        DEFAULT_CACHE_TTL_SECS,
    )?);

    let cache_backend_url = env
        .get("CACHE_BACKEND_URL")
        .cloned()
        .unwrap_or_else(|| DEFAULT_CACHE_BACKEND_URL.to_string());

    let cache_max_entries = parse_env_u64(
        &env,
        "CACHE_MAX_ENTRIES",
        DEFAULT_CACHE_MAX_ENTRIES as u64,
    )? as usize;

    let creds_cache_maxsize = parse_env_u64(
        &env,
        "GITHUB_CREDS_CACHE_MAXSIZE",
        DEFAULT_CREDS_CACHE_MAXSIZE as u64,
    )? as usize;

    let padding_minutes = parse_env_u64(
        &env,
        "GITHUB_CREDS_CACHE_TTL_PADDING",
        DEFAULT_CREDS_CACHE_TTL_PADDING_MINUTES as u64,
    )?;

    let client_registry_file_path = env.get("CLIENT_REGISTRY_FILE_PATH").cloned();

    let pats = load_pats(&env)?;
    let apps = load_apps(&env)?;

    Ok(ProxyConfig {
        github_api_url,
        cache_ttl,
        cache_backend_url,
        cache_max_entries,
        creds_cache_maxsize,
        creds_cache_ttl_padding: ChronoDuration::minutes(padding_minutes as i64),
        client_registry_file_path,
        apps,
        pats,
    })
}

fn parse_env_u64(
    env: &BTreeMap<String, String>,
    name: &str,
    default: u64,
) -> Result<u64, ConfigurationError> {
    match env.get(name) {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|_| ConfigurationError::InvalidValue {
            variable: name.to_string(),
            message: format!("expected an integer, got '{raw}'"),
        }),
    }
}

/// `GITHUB_PAT_<name>` → a PAT named `<name>` (lowercased).
fn load_pats(env: &BTreeMap<String, String>) -> Result<Vec<PersonalAccessToken>, ConfigurationError> {
    let mut pats = Vec::new();
    let mut seen = HashSet::new();

    for (key, value) in env {
        let Some(name) = key.strip_prefix("GITHUB_PAT_") else {
            continue;
        };
        let name = name.to_lowercase();
        if !seen.insert(name.clone()) {
            return Err(ConfigurationError::DuplicateName(name));
        }
        pats.push(PersonalAccessToken::new(name, value.clone()));
    }

    Ok(pats)
}

/// `GITHUB_APP_<name>_{ID,INSTALLATION_ID,PEM}` → an [`AppInstallation`].
/// Discovered by the `_PEM` suffix, since `_ID` is itself a suffix of
/// `_INSTALLATION_ID`.
fn load_apps(env: &BTreeMap<String, String>) -> Result<Vec<AppInstallation>, ConfigurationError> {
    let mut apps = Vec::new();
    let mut seen = HashSet::new();

    for key in env.keys() {
        let Some(rest) = key.strip_prefix("GITHUB_APP_") else {
            continue;
        };
        let Some(name) = rest.strip_suffix("_PEM") else {
            continue;
        };
        let name = name.to_lowercase();
        if !seen.insert(name.clone()) {
            return Err(ConfigurationError::DuplicateName(name));
        }

        let app_id = required_env_u64(env, &format!("GITHUB_APP_{}_ID", name.to_uppercase()))?;
        let installation_id = required_env_u64(
            env,
            &format!("GITHUB_APP_{}_INSTALLATION_ID", name.to_uppercase()),
        )?;
        let pem = env
            .get(key)
            .expect("key came from iterating env.keys()")
            .clone();

        let private_key = PrivateKey::from_pem(&pem).map_err(|e| ConfigurationError::InvalidValue {
            variable: key.clone(),
            message: e.to_string(),
        })?;

        apps.push(AppInstallation::new(
            name,
            GitHubAppId::new(app_id),
            InstallationId::new(installation_id),
            private_key,
        ));
    }

    Ok(apps)
}

fn required_env_u64(env: &BTreeMap<String, String>, name: &str) -> Result<u64, ConfigurationError> {
    let raw = env.get(name).ok_or_else(|| ConfigurationError::InvalidValue {
        variable: name.to_string(),
        message: "required but not set".to_string(),
    })?;
    raw.parse().map_err(|_| ConfigurationError::InvalidValue {
        variable: name.to_string(),
        message: format!("expected an integer, got '{raw}'"),
    })
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
