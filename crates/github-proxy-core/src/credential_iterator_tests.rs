use super::*;
use crate::credential::CredentialOrigin;
use chrono::Duration;
use github_app_auth::auth::{GitHubAppId, InstallationId, PrivateKey};

const TEST_PRIVATE_KEY_PEM: &str = include_str!("test_fixtures/test_rsa_key.pem");

fn app(name: &str) -> AppInstallation {
    AppInstallation::new(
        name,
        GitHubAppId::new(1),
        InstallationId::new(1),
        PrivateKey::from_pem(TEST_PRIVATE_KEY_PEM).expect("valid test key"),
    )
}

fn pat(name: &str) -> PersonalAccessToken {
    PersonalAccessToken::new(name, format!("ghp_{name}"))
}

fn app_tokens() -> AppTokenCache {
    AppTokenCache::new(
        reqwest::Client::new(),
        "https://unused.invalid",
        Duration::minutes(5),
    )
}

#[tokio::test]
async fn pat_only_pool_yields_pats_in_order() {
    let pool = CredentialPool::new(vec![], vec![pat("first"), pat("second")]);
    let rate_limits = RateLimitMap::new(10, Duration::minutes(1));
    let tokens = app_tokens();

    let mut iter = pool.iter(&rate_limits, &tokens);
    let c1 = iter.next().await.expect("first credential");
    assert_eq!(c1.key.name, "first");
    let c2 = iter.next().await.expect("second credential");
    assert_eq!(c2.key.name, "second");
    assert!(iter.next().await.is_none());
}

#[tokio::test]
async fn rate_limited_pat_is_skipped() {
    let pool = CredentialPool::new(vec![], vec![pat("limited"), pat("available")]);
    let rate_limits = RateLimitMap::new(10, Duration::minutes(1));
    rate_limits.mark(
        crate::credential::CredentialKey::new(CredentialOrigin::Pat, "limited"),
        chrono::Utc::now() + Duration::hours(1),
    );
    let tokens = app_tokens();

    let mut iter = pool.iter(&rate_limits, &tokens);
    let only = iter.next().await.expect("one credential remains");
    assert_eq!(only.key.name, "available");
    assert!(iter.next().await.is_none());
}

#[tokio::test]
async fn exhausted_pool_yields_none() {
    let pool = CredentialPool::new(vec![], vec![]);
    let rate_limits = RateLimitMap::new(10, Duration::minutes(1));
    let tokens = app_tokens();

    let mut iter = pool.iter(&rate_limits, &tokens);
    assert!(iter.next().await.is_none());
}

#[tokio::test]
async fn apps_precede_pats_regardless_of_construction_order() {
    // Apps are never minted successfully here because the token endpoint
    // is unreachable, but the iterator must still attempt them first and
    // only fall through to PATs after the app mint fails.
    let pool = CredentialPool::new(vec![app("unreachable-app")], vec![pat("fallback")]);
    let rate_limits = RateLimitMap::new(10, Duration::minutes(1));
    let tokens = app_tokens();

    let mut iter = pool.iter(&rate_limits, &tokens);
    let only = iter.next().await.expect("falls through to pat");
    assert_eq!(only.key.name, "fallback");
    assert_eq!(only.key.origin, CredentialOrigin::Pat);
}
