//! Tests for authentication module types.

use super::*;

#[test]
fn test_github_app_id() {
    let app_id = GitHubAppId::new(12345);
    assert_eq!(app_id.as_u64(), 12345);
    assert_eq!(app_id.to_string(), "12345");

    let parsed: GitHubAppId = "67890".parse().unwrap();
    assert_eq!(parsed.as_u64(), 67890);

    let invalid = "not_a_number".parse::<GitHubAppId>();
    assert!(invalid.is_err());
}

#[test]
fn test_installation_id() {
    let installation = InstallationId::new(98765);
    assert_eq!(installation.as_u64(), 98765);
    assert_eq!(installation.to_string(), "98765");

    let parsed: InstallationId = "11111".parse().unwrap();
    assert_eq!(parsed.as_u64(), 11111);
}

#[test]
fn test_jwt_token_expiry() {
    let app_id = GitHubAppId::new(1);
    let expires_at = Utc::now() + Duration::minutes(5);
    let jwt = JsonWebToken::new("test_token".to_string(), app_id, expires_at);

    assert!(!jwt.is_expired());
    assert!(jwt.expires_soon(Duration::minutes(10))); // Expires in 5 min, checking 10 min margin
    assert!(!jwt.expires_soon(Duration::minutes(2))); // Doesn't expire in 2 min
    assert_eq!(jwt.app_id(), app_id);
    assert_eq!(jwt.token(), "test_token");
}

#[test]
fn test_jwt_token_security() {
    let app_id = GitHubAppId::new(1);
    let jwt = JsonWebToken::new(
        "secret_token".to_string(),
        app_id,
        Utc::now() + Duration::minutes(10),
    );

    let debug_output = format!("{:?}", jwt);
    assert!(!debug_output.contains("secret_token"));
    assert!(debug_output.contains("<REDACTED>"));
}

#[test]
fn test_installation_token_security() {
    let token = InstallationToken::new(
        "secret_installation_token".to_string(),
        InstallationId::new(1),
        Utc::now() + Duration::hours(1),
    );

    let debug_output = format!("{:?}", token);
    assert!(!debug_output.contains("secret_installation_token"));
    assert!(debug_output.contains("<REDACTED>"));
}

#[test]
fn test_private_key_security() {
    let key = PrivateKey::new(b"super_secret_key_material".to_vec(), KeyAlgorithm::RS256);

    let debug_output = format!("{:?}", key);
    assert!(!debug_output.contains("super_secret_key_material"));
    assert!(debug_output.contains("<REDACTED>"));
    assert_eq!(key.algorithm(), &KeyAlgorithm::RS256);
}

#[test]
fn test_jwt_token_time_until_expiry() {
    let app_id = GitHubAppId::new(1);
    let expires_at = Utc::now() + Duration::minutes(5);
    let jwt = JsonWebToken::new("test".to_string(), app_id, expires_at);

    let remaining = jwt.time_until_expiry();
    assert!(remaining.num_minutes() >= 4 && remaining.num_minutes() <= 5);
}

#[test]
fn test_installation_token_expiry() {
    let token = InstallationToken::new(
        "test".to_string(),
        InstallationId::new(1),
        Utc::now() + Duration::minutes(30),
    );

    assert!(!token.is_expired());
    assert!(!token.expires_soon(Duration::minutes(10)));
    assert!(token.expires_soon(Duration::minutes(40)));
}

#[test]
fn test_key_algorithm() {
    let algo = KeyAlgorithm::RS256;
    assert_eq!(format!("{:?}", algo), "RS256");
}

#[test]
fn test_jwt_claims_serialization() {
    let claims = JwtClaims {
        iss: GitHubAppId::new(12345),
        iat: 1234567890,
        exp: 1234568490,
    };

    let json = serde_json::to_string(&claims).unwrap();
    assert!(json.contains("12345"));
    assert!(json.contains("1234567890"));
    assert!(json.contains("1234568490"));
}
