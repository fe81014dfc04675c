//! HTTP server binding and shutdown configuration. Credential, cache, and
//! client-registry configuration live in `github-proxy-config`; this is
//! only the transport-level knobs the core has no opinion on.

/// Where and how long the server listens and drains before shutting down.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub shutdown_timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout_seconds: 30,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            shutdown_timeout_seconds: std::env::var("SHUTDOWN_TIMEOUT_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.shutdown_timeout_seconds),
        }
    }
}
