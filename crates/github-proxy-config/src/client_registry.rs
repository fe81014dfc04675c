//! Client registry loading: a YAML file, optionally templated against the
//! process environment before parsing.
//!
//! Grounded on the original's Jinja2-templated YAML registry; `tera`'s
//! `{{ VAR }}` syntax is the Rust-ecosystem equivalent used for the same
//! purpose (secrets interpolated into an otherwise-static file without a
//! templating pass baked into the proxy's own config loader).

use regex::Regex;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};

use github_proxy_core::error::ConfigurationError;
use github_proxy_core::{ClientAuthorizer, ProxyClient, Scope};

#[derive(Debug, Deserialize)]
struct RegistryFile {
    version: u32,
    clients: Vec<RegistryClient>,
}

#[derive(Debug, Deserialize)]
struct RegistryClient {
    name: String,
    token: String,
    #[serde(default)]
    scopes: Option<Vec<RegistryScope>>,
}

#[derive(Debug, Deserialize)]
struct RegistryScope {
    method: Option<String>,
    path: Option<String>,
}

/// Read, optionally template-expand, and parse the client registry file at
/// `path` into a ready-to-use [`ClientAuthorizer`].
pub fn load_client_registry(path: &str) -> Result<ClientAuthorizer, ConfigurationError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| ConfigurationError::RegistryLoad(format!("{path}: {e}")))?;

    let expanded = expand_template(&raw)?;
    parse_registry(&expanded)
}

/// Expand `{{ VAR }}` placeholders against the process environment. Files
/// with no placeholders pass through unchanged.
fn expand_template(raw: &str) -> Result<String, ConfigurationError> {
    let mut context = tera::Context::new();
    for (key, value) in std::env::vars() {
        context.insert(key, &value);
    }

    tera::Tera::one_off(raw, &context, false)
        .map_err(|e| ConfigurationError::RegistryLoad(format!("template expansion failed: {e}")))
}

fn parse_registry(expanded: &str) -> Result<ClientAuthorizer, ConfigurationError> {
    let file: RegistryFile = serde_yaml::from_str(expanded)
        .map_err(|e| ConfigurationError::RegistryLoad(format!("invalid YAML: {e}")))?;

    if file.version != 1 {
        return Err(ConfigurationError::RegistryLoad(format!(
            "unsupported registry version: {}",
            file.version
        )));
    }

    let mut clients_by_token: HashMap<String, ProxyClient> = HashMap::new();
    let mut seen_names = HashSet::new();
    let mut seen_tokens: HashMap<String, String> = HashMap::new();

    for entry in file.clients {
        if !seen_names.insert(entry.name.clone()) {
            return Err(ConfigurationError::DuplicateName(entry.name));
        }
        if let Some(first) = seen_tokens.insert(entry.token.clone(), entry.name.clone()) {
            return Err(ConfigurationError::DuplicateToken {
                first,
                second: entry.name,
            });
        }

        let scopes = match entry.scopes {
            None => vec![Scope::allow_all()],
            Some(raw_scopes) if raw_scopes.is_empty() => vec![Scope::allow_all()],
            Some(raw_scopes) => raw_scopes
                .into_iter()
                .map(|s| compile_scope(s))
                .collect::<Result<Vec<_>, _>>()?,
        };

        clients_by_token.insert(
            entry.token,
            ProxyClient {
                name: entry.name,
                scopes,
            },
        );
    }

    Ok(ClientAuthorizer::new(clients_by_token))
}

fn compile_scope(raw: RegistryScope) -> Result<Scope, ConfigurationError> {
    let method = Regex::new(&raw.method.unwrap_or_else(|| ".*".to_string()))?;
    let path = Regex::new(&raw.path.unwrap_or_else(|| ".*".to_string()))?;
    Ok(Scope { method, path })
}

#[cfg(test)]
#[path = "client_registry_tests.rs"]
mod tests;
