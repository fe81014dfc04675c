use super::*;
use axum::body::Body;
use axum::http::Request;
use github_proxy_core::{
    AppTokenCache, ClientAuthorizer, NoopTelemetrySink, PersonalAccessToken, ProxyClient,
    RateLimitMap, Scope,
};
use std::collections::HashMap;
use std::time::Duration as StdDuration;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn state_for(server: &MockServer, clients: HashMap<String, ProxyClient>) -> AppState {
    let http_client = reqwest::Client::new();
    let rate_limits = RateLimitMap::new(64, chrono::Duration::minutes(5));
    let app_tokens = AppTokenCache::new(http_client.clone(), server.uri(), chrono::Duration::minutes(5));
    let forwarder = Forwarder::new(
        http_client,
        server.uri(),
        rate_limits,
        app_tokens,
        Box::new(NoopTelemetrySink),
    );
    let cache = github_proxy_core::from_backend_url("inmemory://", StdDuration::from_secs(60), 64)
        .expect("inmemory cache");
    let pool = CredentialPool::new(vec![], vec![PersonalAccessToken::new("alice", "ghp_alice")]);

    AppState::new(
        Arc::new(forwarder),
        Arc::new(cache),
        Arc::new(pool),
        Arc::new(ClientAuthorizer::new(clients)),
        Arc::new(NoopTelemetrySink),
    )
}

fn single_client(token: &str) -> HashMap<String, ProxyClient> {
    let mut clients = HashMap::new();
    clients.insert(
        token.to_string(),
        ProxyClient {
            name: "tester".to_string(),
            scopes: vec![Scope::allow_all()],
        },
    );
    clients
}

#[tokio::test]
async fn request_without_a_token_is_rejected() {
    let server = MockServer::start().await;
    let state = state_for(&server, single_client("good-token")).await;
    let app = create_router(state);

    let response = app
        .oneshot(Request::get("/zen").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn authorized_get_is_forwarded_and_returned() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/zen"))
        .respond_with(ResponseTemplate::new(200).set_body_string("keep it logically awesome"))
        .mount(&server)
        .await;

    let state = state_for(&server, single_client("good-token")).await;
    let app = create_router(state);

    let response = app
        .oneshot(
            Request::get("/zen")
                .header("authorization", "token good-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn mutating_verb_is_forwarded_without_touching_the_cache() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/markdown"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;

    let state = state_for(&server, single_client("good-token")).await;
    let app = create_router(state);

    let response = app
        .oneshot(
            Request::post("/markdown")
                .header("authorization", "token good-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn scope_restricted_client_is_rejected_on_disallowed_method() {
    let server = MockServer::start().await;
    let mut clients = HashMap::new();
    clients.insert(
        "ro-token".to_string(),
        ProxyClient {
            name: "read_only".to_string(),
            scopes: vec![Scope {
                method: regex::Regex::new("GET").unwrap(),
                path: regex::Regex::new(".*").unwrap(),
            }],
        },
    );
    let state = state_for(&server, clients).await;
    let app = create_router(state);

    let response = app
        .oneshot(
            Request::post("/markdown")
                .header("authorization", "token ro-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_endpoint_is_unauthenticated_and_reflects_upstream_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/zen"))
        .respond_with(ResponseTemplate::new(200).set_body_string("non-fiction over fiction"))
        .mount(&server)
        .await;

    let state = state_for(&server, single_client("good-token")).await;
    let app = create_router(state);

    let response = app
        .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn metrics_endpoint_is_unauthenticated() {
    let server = MockServer::start().await;
    let state = state_for(&server, single_client("good-token")).await;
    let app = create_router(state);

    let response = app
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
