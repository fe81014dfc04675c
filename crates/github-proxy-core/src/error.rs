//! Error taxonomy for the request-forwarding engine.
//!
//! Mirrors the five operator-relevant failure kinds the core can produce,
//! plus the two boundary errors the HTTP layer maps to status codes.

use thiserror::Error;

/// Errors that can occur while forwarding a request to GitHub.
#[derive(Debug, Error)]
pub enum ForwarderError {
    /// Every credential in the iterator was rate-limited or otherwise
    /// unavailable before a non-rate-limited response was obtained.
    #[error("all configured credentials are rate-limited")]
    AllCredentialsRateLimited,

    /// A network error or timeout occurred while contacting GitHub with a
    /// specific credential. Not a rate-limit signal; the request fails
    /// immediately rather than rotating to the next credential.
    #[error("upstream request failed: {0}")]
    UpstreamFailure(#[from] reqwest::Error),

    /// The client presented a token that does not match any registered
    /// client, or no scope on the matched client authorizes the request.
    #[error("unauthorized")]
    Unauthorized,
}

/// Errors recovered locally by [`crate::response_cache::ResponseCache`]
/// implementations; never propagated past the facade.
#[derive(Debug, Error)]
pub enum CacheBackendError {
    /// The backend could not be reached (connection refused, timeout, ...).
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),

    /// The backend was reached but returned malformed data.
    #[error("cache backend returned malformed data: {0}")]
    Malformed(String),
}

/// Errors minting a GitHub App installation token. Recovered locally by
/// [`crate::credential_iterator::CredentialIterator`]: the affected App is
/// skipped for the current request, never fatal.
#[derive(Debug, Error)]
pub enum AppTokenMintError {
    /// JWT signing failed.
    #[error("JWT signing failed for app {app_name}: {source}")]
    SigningFailed {
        app_name: String,
        #[source]
        source: github_app_auth::AuthError,
    },

    /// The installation-token exchange request failed outright.
    #[error("installation token exchange failed for app {app_name}: {source}")]
    RequestFailed {
        app_name: String,
        #[source]
        source: reqwest::Error,
    },

    /// GitHub returned a non-2xx response to the token exchange.
    #[error("installation token exchange returned {status} for app {app_name}")]
    UpstreamRejected { app_name: String, status: u16 },
}

/// Errors raised only while loading configuration at startup. Fatal to
/// process startup; never observed while serving requests.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// Two clients in the registry share the same bearer token.
    #[error("duplicate client token for clients {first} and {second}")]
    DuplicateToken { first: String, second: String },

    /// Two clients in the registry share the same name.
    #[error("duplicate client name: {0}")]
    DuplicateName(String),

    /// `CACHE_BACKEND_URL`'s scheme is not one of the supported backends.
    #[error("unknown cache backend scheme: {0}")]
    UnknownCacheScheme(String),

    /// A scope's method or path pattern is not a valid regular expression.
    #[error("invalid scope pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// The client registry file could not be read or parsed.
    #[error("failed to load client registry: {0}")]
    RegistryLoad(String),

    /// A required environment variable was missing or malformed.
    #[error("invalid configuration for {variable}: {message}")]
    InvalidValue { variable: String, message: String },
}
