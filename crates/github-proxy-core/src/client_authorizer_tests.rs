use super::*;

fn registry(entries: Vec<(&str, ProxyClient)>) -> ClientAuthorizer {
    ClientAuthorizer::new(
        entries
            .into_iter()
            .map(|(token, client)| (token.to_string(), client))
            .collect(),
    )
}

#[test]
fn unregistered_token_is_unauthorized() {
    let auth = registry(vec![]);
    assert_eq!(auth.authorize("unknown", "GET", "/zen"), None);
}

#[test]
fn default_scope_allows_everything() {
    let auth = registry(vec![(
        "admin-token",
        ProxyClient {
            name: "admin".into(),
            scopes: vec![Scope::allow_all()],
        },
    )]);

    assert_eq!(
        auth.authorize("admin-token", "GET", "/zen"),
        Some("admin".into())
    );
    assert_eq!(
        auth.authorize("admin-token", "POST", "/markdown"),
        Some("admin".into())
    );
}

#[test]
fn read_only_scope_rejects_mutating_verb() {
    let auth = registry(vec![(
        "ro-token",
        ProxyClient {
            name: "read_only".into(),
            scopes: vec![Scope {
                method: Regex::new("get").unwrap(),
                path: Regex::new(".*").unwrap(),
            }],
        },
    )]);

    assert_eq!(
        auth.authorize("ro-token", "GET", "/zen"),
        Some("read_only".into())
    );
    assert_eq!(auth.authorize("ro-token", "POST", "/markdown"), None);
}

#[test]
fn method_pattern_matches_either_case() {
    let scope = Scope {
        method: Regex::new("GET").unwrap(),
        path: Regex::new(".*").unwrap(),
    };
    assert!(scope.matches("GET", "/anything"));
    assert!(scope.matches("get", "/anything"));
    assert!(!scope.matches("POST", "/anything"));
}

#[test]
fn enterprise_prefix_is_stripped_before_path_match() {
    let auth = registry(vec![(
        "scoped-token",
        ProxyClient {
            name: "scoped".into(),
            scopes: vec![Scope {
                method: Regex::new(".*").unwrap(),
                path: Regex::new("/repos/bbln/cyrus/.*").unwrap(),
            }],
        },
    )]);

    assert_eq!(
        auth.authorize(
            "scoped-token",
            "GET",
            "/api/v3/repos/bbln/cyrus/issues/1"
        ),
        Some("scoped".into())
    );
}

#[test]
fn path_scope_rejects_unrelated_path() {
    let auth = registry(vec![(
        "scoped-token",
        ProxyClient {
            name: "scoped".into(),
            scopes: vec![Scope {
                method: Regex::new(".*").unwrap(),
                path: Regex::new("/repos/bbln/cyrus/.*").unwrap(),
            }],
        },
    )]);

    assert_eq!(auth.authorize("scoped-token", "GET", "/repos/other/repo"), None);
}

#[test]
fn path_scope_rejects_match_not_anchored_at_the_start() {
    let auth = registry(vec![(
        "scoped-token",
        ProxyClient {
            name: "scoped".into(),
            scopes: vec![Scope {
                method: Regex::new(".*").unwrap(),
                path: Regex::new("/repos/bbln/cyrus/.*").unwrap(),
            }],
        },
    )]);

    assert_eq!(
        auth.authorize("scoped-token", "GET", "/x/repos/bbln/cyrus/issues/1"),
        None
    );
}
