//! # github-app-auth
//!
//! GitHub App authentication primitives: JWT signing and installation-token
//! exchange types.
//!
//! This crate provides:
//! - GitHub App/installation ID types and JWT/installation token types
//! - RS256 JWT signing (`auth::jwt::RS256JwtGenerator`)
//! - A GitHub-shaped error taxonomy shared across the proxy workspace
//!
//! # Examples
//!
//! ## Working with Tokens
//!
//! ```rust
//! use github_app_auth::auth::{JsonWebToken, GitHubAppId};
//! use chrono::{Utc, Duration};
//!
//! let app_id = GitHubAppId::new(123);
//! let expires_at = Utc::now() + Duration::minutes(10);
//! let jwt = JsonWebToken::new("token".to_string(), app_id, expires_at);
//!
//! // Check expiration
//! if jwt.is_expired() {
//!     println!("Token expired!");
//! }
//!
//! if jwt.expires_soon(Duration::minutes(5)) {
//!     println!("Token expires soon, should refresh");
//! }
//! ```

// Public modules
pub mod auth;
pub mod error;

// Re-export commonly used types at crate root for convenience
pub use error::{AuthError, ValidationError};

pub use auth::{
    GitHubAppId, InstallationId, InstallationToken, JsonWebToken, JwtClaims, KeyAlgorithm,
    PrivateKey,
};
