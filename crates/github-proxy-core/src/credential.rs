//! The credential data model: PATs and GitHub App installations, and the
//! key under which a credential's rate-limit state is tracked.

use github_app_auth::auth::{GitHubAppId, InstallationId, PrivateKey};
use std::fmt;

/// Which kind of GitHub credential a [`CredentialKey`] or [`Credential`]
/// refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialOrigin {
    /// A GitHub App installation.
    App,
    /// A Personal Access Token.
    Pat,
}

impl fmt::Display for CredentialOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::App => write!(f, "app"),
            Self::Pat => write!(f, "pat"),
        }
    }
}

/// Identifies a credential for rate-limit bookkeeping: `(origin, name)`.
/// Does not carry the secret value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CredentialKey {
    pub origin: CredentialOrigin,
    pub name: String,
}

impl CredentialKey {
    pub fn new(origin: CredentialOrigin, name: impl Into<String>) -> Self {
        Self {
            origin,
            name: name.into(),
        }
    }
}

impl fmt::Display for CredentialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.origin, self.name)
    }
}

/// A GitHub App installation as configured: immutable after startup.
/// Exchanges, via its private key, a JWT for a time-bounded installation
/// token.
#[derive(Clone)]
pub struct AppInstallation {
    pub name: String,
    pub app_id: GitHubAppId,
    pub installation_id: InstallationId,
    pub private_key: PrivateKey,
}

impl AppInstallation {
    pub fn new(
        name: impl Into<String>,
        app_id: GitHubAppId,
        installation_id: InstallationId,
        private_key: PrivateKey,
    ) -> Self {
        Self {
            name: name.into(),
            app_id,
            installation_id,
            private_key,
        }
    }

    pub fn key(&self) -> CredentialKey {
        CredentialKey::new(CredentialOrigin::App, self.name.clone())
    }
}

impl fmt::Debug for AppInstallation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppInstallation")
            .field("name", &self.name)
            .field("app_id", &self.app_id)
            .field("installation_id", &self.installation_id)
            .field("private_key", &"<REDACTED>")
            .finish()
    }
}

/// A Personal Access Token as configured: immutable after startup.
#[derive(Clone)]
pub struct PersonalAccessToken {
    pub name: String,
    pub value: String,
}

impl PersonalAccessToken {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn key(&self) -> CredentialKey {
        CredentialKey::new(CredentialOrigin::Pat, self.name.clone())
    }
}

impl fmt::Debug for PersonalAccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersonalAccessToken")
            .field("name", &self.name)
            .field("value", &"<REDACTED>")
            .finish()
    }
}

/// A materialized, ready-to-use credential: never persisted, produced on
/// demand by the [`crate::credential_iterator::CredentialIterator`].
#[derive(Clone)]
pub struct Credential {
    pub key: CredentialKey,
    pub value: String,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("key", &self.key)
            .field("value", &"<REDACTED>")
            .finish()
    }
}

#[cfg(test)]
#[path = "credential_tests.rs"]
mod tests;
