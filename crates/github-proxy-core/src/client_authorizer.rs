//! Bearer-token lookup and scope enforcement.

use regex::Regex;
use std::collections::HashMap;

/// A single scope: a client may invoke a request iff some scope's method
/// pattern matches the request method (tried both lowercase and uppercase)
/// and its path pattern matches the logical path.
#[derive(Debug, Clone)]
pub struct Scope {
    pub method: Regex,
    pub path: Regex,
}

impl Scope {
    /// A scope matching every method and path; the default when a client's
    /// registry entry has no explicit scopes.
    pub fn allow_all() -> Self {
        Self {
            method: Regex::new(".*").expect("static pattern"),
            path: Regex::new(".*").expect("static pattern"),
        }
    }

    fn matches(&self, method: &str, logical_path: &str) -> bool {
        (starts_match(&self.method, &method.to_lowercase())
            || starts_match(&self.method, &method.to_uppercase()))
            && starts_match(&self.path, logical_path)
    }
}

/// `re.match` semantics: the pattern must match starting at offset 0, not
/// merely appear somewhere in the string (`Regex::is_match` would also
/// accept a substring match anywhere).
fn starts_match(re: &Regex, s: &str) -> bool {
    re.find(s).is_some_and(|m| m.start() == 0)
}

/// A registered proxy client: its display name and the scopes that gate
/// which upstream routes it may invoke.
#[derive(Debug, Clone)]
pub struct ProxyClient {
    pub name: String,
    pub scopes: Vec<Scope>,
}

/// Enterprise routing prefix stripped from the logical path before scope
/// matching, per spec.
const ENTERPRISE_PREFIX: &str = "/api/v3";

/// `token -> ProxyClient`, built once at configuration load and read-only
/// thereafter.
pub struct ClientAuthorizer {
    clients_by_token: HashMap<String, ProxyClient>,
}

impl ClientAuthorizer {
    pub fn new(clients_by_token: HashMap<String, ProxyClient>) -> Self {
        Self { clients_by_token }
    }

    /// Strip the Enterprise `/api/v3` prefix, if present, to compute the
    /// logical path scopes are matched against.
    pub fn logical_path(path: &str) -> &str {
        path.strip_prefix(ENTERPRISE_PREFIX).unwrap_or(path)
    }

    /// Return the authorized client's name, or `None` if the token is
    /// unregistered or no scope authorizes this request.
    pub fn authorize(&self, token: &str, method: &str, path: &str) -> Option<String> {
        let client = self.clients_by_token.get(token)?;
        let logical_path = Self::logical_path(path);

        client
            .scopes
            .iter()
            .any(|scope| scope.matches(method, logical_path))
            .then(|| client.name.clone())
    }
}

#[cfg(test)]
#[path = "client_authorizer_tests.rs"]
mod tests;
