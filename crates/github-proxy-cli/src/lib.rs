//! # github-proxy-cli
//!
//! Command-line interface for the GitHub REST API caching proxy.
//!
//! Provides operator commands for:
//! - Starting the HTTP server
//! - Validating configuration and the client registry before a deploy

use clap::{Parser, Subcommand};
use std::collections::HashMap;
use tracing::{error, info};

/// GitHub proxy CLI - caching, authenticating reverse proxy for the GitHub REST API
#[derive(Parser)]
#[command(name = "github-proxy-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Operator commands for the GitHub REST API caching proxy")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP proxy server
    Serve,

    /// Validate configuration and client registry without starting the server
    ValidateConfig,
}

/// CLI-specific errors
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Configuration(#[from] github_proxy_core::error::ConfigurationError),

    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// Main CLI entry point
pub async fn run_cli() -> Result<(), CliError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve => execute_serve_command().await,
        Commands::ValidateConfig => execute_validate_config_command().await,
    }
}

/// Load the proxy configuration, build the forwarding engine's collaborators,
/// and block serving HTTP until a shutdown signal arrives.
async fn execute_serve_command() -> Result<(), CliError> {
    let proxy_config = github_proxy_config::load_from_env()?;

    let authorizer = match &proxy_config.client_registry_file_path {
        Some(path) => github_proxy_config::load_client_registry(path)?,
        None => {
            info!("no CLIENT_REGISTRY_FILE_PATH set; starting with an empty client registry");
            github_proxy_core::ClientAuthorizer::new(HashMap::new())
        }
    };

    let cache = github_proxy_core::from_backend_url(
        &proxy_config.cache_backend_url,
        proxy_config.cache_ttl,
        proxy_config.cache_max_entries,
    )?;

    let telemetry = github_proxy_api::PrometheusTelemetrySink::new().map_err(|err| {
        github_proxy_core::error::ConfigurationError::RegistryLoad(err.to_string())
    })?;

    let http_client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()
        .expect("default TLS backend and configuration are always valid");

    let rate_limits = github_proxy_core::RateLimitMap::new(
        proxy_config.creds_cache_maxsize,
        proxy_config.creds_cache_ttl_padding,
    );
    let app_tokens = github_proxy_core::AppTokenCache::new(
        http_client.clone(),
        proxy_config.github_api_url.clone(),
        proxy_config.creds_cache_ttl_padding,
    );
    let forwarder = github_proxy_core::Forwarder::new(
        http_client,
        proxy_config.github_api_url.clone(),
        rate_limits,
        app_tokens,
        Box::new(telemetry.clone()),
    );
    let pool = github_proxy_core::CredentialPool::new(proxy_config.apps, proxy_config.pats);

    let state = github_proxy_api::AppState::new(
        std::sync::Arc::new(forwarder),
        std::sync::Arc::new(cache),
        std::sync::Arc::new(pool),
        std::sync::Arc::new(authorizer),
        std::sync::Arc::new(telemetry),
    );

    github_proxy_api::start_server(github_proxy_api::ServerConfig::from_env(), state).await?;
    Ok(())
}

/// Load configuration and, if set, the client registry file, reporting
/// success or the first failure encountered. Does not start the server.
async fn execute_validate_config_command() -> Result<(), CliError> {
    let proxy_config = github_proxy_config::load_from_env()?;
    info!(
        github_api_url = %proxy_config.github_api_url,
        cache_backend_url = %proxy_config.cache_backend_url,
        apps = proxy_config.apps.len(),
        pats = proxy_config.pats.len(),
        "configuration loaded"
    );

    if let Some(path) = &proxy_config.client_registry_file_path {
        match github_proxy_config::load_client_registry(path) {
            Ok(_) => info!(path = %path, "client registry is valid"),
            Err(err) => {
                error!(path = %path, error = %err, "client registry is invalid");
                return Err(err.into());
            }
        }
    } else {
        info!("no CLIENT_REGISTRY_FILE_PATH set; nothing further to validate");
    }

    Ok(())
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
