//! # github-proxy-api
//!
//! HTTP server for the GitHub REST API caching proxy: binds the
//! [`github_proxy_core`] forwarding engine to an axum [`Router`], enforces
//! bearer-token client authorization on every proxied route, and exposes
//! `/metrics` and `/healthz` for operators.

pub mod config;
pub mod errors;
pub mod metrics;

use axum::{
    body::Body,
    extract::{Extension, Request, State},
    http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use bytes::Bytes;
use prometheus::TextEncoder;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::{info, instrument};

use github_proxy_core::{
    cached_get, CachedGetRequest, ClientAuthorizer, Conditional, CredentialPool,
    ForwardedResponse, Forwarder, ResponseCache, TelemetrySink,
};

pub use config::ServerConfig;
pub use errors::ApiError;
pub use metrics::PrometheusTelemetrySink;

/// Shared application state, handed to every handler via axum's
/// [`State`] extractor.
#[derive(Clone)]
pub struct AppState {
    pub forwarder: Arc<Forwarder>,
    pub cache: Arc<ResponseCache>,
    pub pool: Arc<CredentialPool>,
    pub authorizer: Arc<ClientAuthorizer>,
    pub telemetry: Arc<dyn TelemetrySink>,
}

impl AppState {
    pub fn new(
        forwarder: Arc<Forwarder>,
        cache: Arc<ResponseCache>,
        pool: Arc<CredentialPool>,
        authorizer: Arc<ClientAuthorizer>,
        telemetry: Arc<dyn TelemetrySink>,
    ) -> Self {
        Self {
            forwarder,
            cache,
            pool,
            authorizer,
            telemetry,
        }
    }
}

/// The authorized client's display name, stashed in request extensions by
/// [`auth_middleware`] for the proxy handler to read back.
#[derive(Clone)]
struct ClientName(String);

/// Build the full router: unauthenticated observability routes plus the
/// bearer-authenticated catch-all proxy route.
pub fn create_router(state: AppState) -> Router {
    let proxied = Router::new()
        .fallback(proxy_handler)
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let observability_routes = Router::new()
        .route("/metrics", get(metrics_endpoint))
        .route("/healthz", get(health_check));

    Router::new()
        .merge(observability_routes)
        .merge(proxied)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(CorsLayer::permissive())
                .into_inner(),
        )
        .with_state(state)
}

/// Start the HTTP server and block until a shutdown signal is received.
pub async fn start_server(
    server_config: ServerConfig,
    state: AppState,
) -> Result<(), std::io::Error> {
    let app = create_router(state);
    let addr = format!("{}:{}", server_config.host, server_config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Starting HTTP server on {}", addr);

    let shutdown_timeout = std::time::Duration::from_secs(server_config.shutdown_timeout_seconds);
    let shutdown_signal = async move {
        let ctrl_c = async {
            tokio::signal::ctrl_c()
                .await
                .expect("failed to install Ctrl+C signal handler");
        };

        #[cfg(unix)]
        let terminate = async {
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("failed to install SIGTERM signal handler")
                .recv()
                .await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                info!("received SIGINT, shutting down (timeout {}s)", shutdown_timeout.as_secs());
            },
            _ = terminate => {
                info!("received SIGTERM, shutting down (timeout {}s)", shutdown_timeout.as_secs());
            },
        }
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("HTTP server shutdown complete");
    Ok(())
}

/// Bearer-token authorization: `Authorization: token <client-token>`.
/// Unregistered tokens, or tokens with no scope covering this request,
/// are rejected with 401 before the proxy handler ever runs.
#[instrument(skip(state, request, next), fields(method = %request.method(), path = %request.uri().path()))]
async fn auth_middleware(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let Some(token) = extract_token(request.headers()) else {
        return ApiError::from(github_proxy_core::ForwarderError::Unauthorized).into_response();
    };

    let method = request.method().as_str().to_string();
    let path = request.uri().path().to_string();

    match state.authorizer.authorize(&token, &method, &path) {
        Some(client) => {
            request.extensions_mut().insert(ClientName(client));
            next.run(request).await
        }
        None => ApiError::from(github_proxy_core::ForwarderError::Unauthorized).into_response(),
    }
}

fn extract_token(headers: &HeaderMap) -> Option<String> {
    let value = headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?;
    value.strip_prefix("token ").map(|s| s.trim().to_string())
}

/// `GET` routes through the response cache; every other method is
/// forwarded pass-through with no cache interaction.
#[instrument(skip(state, headers, body, client), fields(client = %client.0, method = %method, path = %uri.path()))]
async fn proxy_handler(
    State(state): State<AppState>,
    Extension(client): Extension<ClientName>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let path = uri.path().to_string();
    let query = uri.query().map(str::to_string);

    if method == Method::GET {
        let media_type = headers
            .get(axum::http::header::ACCEPT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let request = CachedGetRequest {
            path: &path,
            query: query.as_deref(),
            media_type: media_type.as_deref(),
            headers: &headers,
        };

        let outcome = cached_get(&state.forwarder, &state.cache, &state.pool, request).await?;
        state
            .telemetry
            .on_inbound_request(&client.0, method.as_str(), outcome.cache_hit);
        Ok(forwarded_to_response(outcome.response))
    } else {
        let response = state
            .forwarder
            .send(
                &state.pool,
                method.as_str(),
                &path,
                query.as_deref(),
                &headers,
                body.to_vec(),
                Conditional::default(),
            )
            .await?;
        state
            .telemetry
            .on_inbound_request(&client.0, method.as_str(), None);
        Ok(forwarded_to_response(response))
    }
}

/// `health()`: `cachedGet("zen", ..., "healthcheck")`, healthy iff upstream
/// returned 200. Deliberately outside the authenticated route group.
async fn health_check(State(state): State<AppState>) -> StatusCode {
    let headers = HeaderMap::new();
    let request = CachedGetRequest {
        path: "zen",
        query: None,
        media_type: None,
        headers: &headers,
    };

    match cached_get(&state.forwarder, &state.cache, &state.pool, request).await {
        Ok(outcome) if outcome.response.status == 200 => StatusCode::OK,
        _ => StatusCode::SERVICE_UNAVAILABLE,
    }
}

async fn metrics_endpoint() -> Result<String, StatusCode> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    encoder
        .encode_to_string(&metric_families)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

fn forwarded_to_response(forwarded: ForwardedResponse) -> Response {
    let mut builder = axum::http::Response::builder().status(forwarded.status);
    if let Some(headers) = builder.headers_mut() {
        for (name, value) in &forwarded.headers {
            if let (Ok(name), Ok(value)) = (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                headers.append(name, value);
            }
        }
    }

    builder
        .body(Body::from(forwarded.body))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
