use super::*;

#[test]
fn credential_key_display_matches_origin_and_name() {
    let key = CredentialKey::new(CredentialOrigin::App, "ci-bot");
    assert_eq!(key.to_string(), "app:ci-bot");

    let key = CredentialKey::new(CredentialOrigin::Pat, "alice");
    assert_eq!(key.to_string(), "pat:alice");
}

#[test]
fn credential_keys_with_same_origin_and_name_are_equal() {
    let a = CredentialKey::new(CredentialOrigin::Pat, "shared");
    let b = CredentialKey::new(CredentialOrigin::Pat, "shared");
    assert_eq!(a, b);
}

#[test]
fn app_installation_key_uses_app_origin() {
    let installation = AppInstallation::new(
        "release-bot",
        GitHubAppId::new(1),
        InstallationId::new(2),
        PrivateKey::new(vec![1, 2, 3], github_app_auth::auth::KeyAlgorithm::RS256),
    );
    assert_eq!(installation.key().origin, CredentialOrigin::App);
    assert_eq!(installation.key().name, "release-bot");
}

#[test]
fn pat_debug_output_redacts_value() {
    let pat = PersonalAccessToken::new("alice", "ghp_supersecret");
    let debug = format!("{:?}", pat);
    assert!(!debug.contains("ghp_supersecret"));
    assert!(debug.contains("REDACTED"));
}
