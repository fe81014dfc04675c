//! # github-proxy-core
//!
//! Core request-forwarding engine for the GitHub REST API caching proxy:
//! credential rotation across PATs and GitHub App installations, the
//! conditional-GET response cache, client authorization, and the
//! header-filtering forward/return step.
//!
//! The HTTP server, configuration loading, and telemetry backend are
//! collaborators that live in sibling crates and depend on the types here.

pub mod app_token_cache;
pub mod cached_get;
pub mod client_authorizer;
pub mod credential;
pub mod credential_iterator;
pub mod error;
pub mod forwarder;
pub mod rate_limit_map;
pub mod response_cache;
pub mod telemetry;

pub use app_token_cache::AppTokenCache;
pub use cached_get::{cached_get, CachedGetOutcome, CachedGetRequest};
pub use client_authorizer::{ClientAuthorizer, ProxyClient, Scope};
pub use credential::{
    AppInstallation, Credential, CredentialKey, CredentialOrigin, PersonalAccessToken,
};
pub use credential_iterator::{CredentialIterator, CredentialPool};
pub use error::{AppTokenMintError, CacheBackendError, ConfigurationError, ForwarderError};
pub use forwarder::{Conditional, ForwardedResponse, Forwarder};
pub use rate_limit_map::RateLimitMap;
pub use response_cache::{from_backend_url, CacheBackend, CacheKey, CachedResponse, ResponseCache};
pub use telemetry::{CacheHit, NoopTelemetrySink, TelemetrySink};
