//! Binary entry point: loads configuration, wires the forwarding engine's
//! collaborators together, and starts the HTTP server.

use github_proxy_api::{AppState, PrometheusTelemetrySink, ServerConfig};
use github_proxy_core::{AppTokenCache, ClientAuthorizer, Forwarder, RateLimitMap};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "github_proxy_api=info,github_proxy_core=info,tower_http=info".into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("starting github-proxy");

    let proxy_config = match github_proxy_config::load_from_env() {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "failed to load configuration");
            std::process::exit(1);
        }
    };

    let authorizer = match &proxy_config.client_registry_file_path {
        Some(path) => match github_proxy_config::load_client_registry(path) {
            Ok(authorizer) => authorizer,
            Err(err) => {
                error!(error = %err, path = %path, "failed to load client registry");
                std::process::exit(1);
            }
        },
        None => {
            info!("no CLIENT_REGISTRY_FILE_PATH set; starting with an empty client registry");
            ClientAuthorizer::new(std::collections::HashMap::new())
        }
    };

    let cache = match github_proxy_core::from_backend_url(
        &proxy_config.cache_backend_url,
        proxy_config.cache_ttl,
        proxy_config.cache_max_entries,
    ) {
        Ok(cache) => cache,
        Err(err) => {
            error!(error = %err, "failed to initialize response cache");
            std::process::exit(1);
        }
    };

    let telemetry = match PrometheusTelemetrySink::new() {
        Ok(sink) => sink,
        Err(err) => {
            error!(error = %err, "failed to register Prometheus metrics");
            std::process::exit(1);
        }
    };

    let http_client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()
        .expect("default TLS backend and configuration are always valid");

    let rate_limits = RateLimitMap::new(
        proxy_config.creds_cache_maxsize,
        proxy_config.creds_cache_ttl_padding,
    );
    let app_tokens = AppTokenCache::new(
        http_client.clone(),
        proxy_config.github_api_url.clone(),
        proxy_config.creds_cache_ttl_padding,
    );
    let forwarder = Forwarder::new(
        http_client,
        proxy_config.github_api_url.clone(),
        rate_limits,
        app_tokens,
        Box::new(telemetry.clone()),
    );
    let pool = github_proxy_core::CredentialPool::new(proxy_config.apps, proxy_config.pats);

    let state = AppState::new(
        Arc::new(forwarder),
        Arc::new(cache),
        Arc::new(pool),
        Arc::new(authorizer),
        Arc::new(telemetry),
    );

    if let Err(err) = github_proxy_api::start_server(ServerConfig::from_env(), state).await {
        error!(error = %err, "HTTP server exited with an error");
        std::process::exit(1);
    }
}
