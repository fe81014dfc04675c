//! Builds and sends the upstream request, rotating through credentials on
//! rate-limit and feeding observations back into the [`RateLimitMap`].

use chrono::{DateTime, TimeZone, Utc};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::str::FromStr;

use crate::credential_iterator::CredentialPool;
use crate::error::ForwarderError;
use crate::rate_limit_map::RateLimitMap;
use crate::app_token_cache::AppTokenCache;
use crate::telemetry::TelemetrySink;

/// Headers that must never be forwarded, in either direction: they are
/// meaningful only to the immediately-adjacent hop, not to GitHub or the
/// proxy's client.
const HOP_BY_HOP: &[&str] = &[
    "connection",
    "proxy-connection",
    "keep-alive",
    "transfer-encoding",
    "te",
    "trailer",
    "upgrade",
    "proxy-authorization",
    "proxy-authenticate",
];

/// Additionally stripped from the inbound request before forwarding.
const INBOUND_STRIP: &[&str] = &["host"];

/// Additionally stripped from the upstream response before returning it to
/// the client: the proxy's own transport encodes the body afresh.
const RESPONSE_STRIP: &[&str] = &["content-length", "content-encoding"];

fn strip_headers(headers: &HeaderMap, extra: &[&str]) -> HeaderMap {
    let mut out = HeaderMap::new();
    for (name, value) in headers.iter() {
        let lower = name.as_str().to_ascii_lowercase();
        if HOP_BY_HOP.contains(&lower.as_str()) || extra.contains(&lower.as_str()) {
            continue;
        }
        out.append(name.clone(), value.clone());
    }
    out
}

/// A response that made it past an individual credential attempt: either a
/// usable upstream response, or a rate-limit that the caller should
/// rotate past.
enum AttemptOutcome {
    Response(reqwest::Response),
    RateLimited,
}

/// The conditional-request revalidators a caller may pass to [`Forwarder::send`].
#[derive(Debug, Clone, Default)]
pub struct Conditional {
    pub etag: Option<String>,
    pub last_modified: Option<String>,
}

/// Result of a successful forward: status, filtered headers, and body.
pub struct ForwardedResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

/// Sends an upstream request with one chosen credential at a time.
pub struct Forwarder {
    http_client: reqwest::Client,
    github_api_url: String,
    rate_limits: RateLimitMap,
    app_tokens: AppTokenCache,
    telemetry: Box<dyn TelemetrySink>,
}

impl Forwarder {
    pub fn new(
        http_client: reqwest::Client,
        github_api_url: impl Into<String>,
        rate_limits: RateLimitMap,
        app_tokens: AppTokenCache,
        telemetry: Box<dyn TelemetrySink>,
    ) -> Self {
        Self {
            http_client,
            github_api_url: github_api_url.into(),
            rate_limits,
            app_tokens,
            telemetry,
        }
    }

    pub fn rate_limits(&self) -> &RateLimitMap {
        &self.rate_limits
    }

    /// Build and send the upstream request, trying each credential from a
    /// fresh [`crate::credential_iterator::CredentialIterator`] in turn
    /// until a non-rate-limited response is obtained.
    pub async fn send(
        &self,
        pool: &CredentialPool,
        method: &str,
        path: &str,
        query: Option<&str>,
        inbound_headers: &HeaderMap,
        body: Vec<u8>,
        conditional: Conditional,
    ) -> Result<ForwardedResponse, ForwarderError> {
        let mut base_headers = strip_headers(inbound_headers, INBOUND_STRIP);
        apply_conditional_headers(&mut base_headers, &conditional);

        let url = self.build_url(path, query);
        let method = reqwest::Method::from_str(method).unwrap_or(reqwest::Method::GET);

        let mut iter = pool.iter(&self.rate_limits, &self.app_tokens);

        while let Some(credential) = iter.next().await {
            let mut headers = base_headers.clone();
            headers.insert(
                HeaderName::from_static("authorization"),
                HeaderValue::from_str(&format!("token {}", credential.value))
                    .expect("credential value is a valid header value"),
            );

            let request = self
                .http_client
                .request(method.clone(), url.clone())
                .headers(headers)
                .body(body.clone());

            let response = request.send().await.map_err(ForwarderError::UpstreamFailure)?;

            self.telemetry.on_upstream_response(&credential.key, &response);

            match self.classify(&credential.key, response) {
                AttemptOutcome::RateLimited => continue,
                AttemptOutcome::Response(response) => {
                    return Ok(to_forwarded_response(response).await);
                }
            }
        }

        Err(ForwarderError::AllCredentialsRateLimited)
    }

    fn build_url(&self, path: &str, query: Option<&str>) -> String {
        let base = self.github_api_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        match query {
            Some(query) if !query.is_empty() => format!("{base}/{path}?{query}"),
            _ => format!("{base}/{path}"),
        }
    }

    /// Inspect a response for the rate-limit signal and, if present, record
    /// it in the map before telling the caller to rotate.
    fn classify(
        &self,
        key: &crate::credential::CredentialKey,
        response: reqwest::Response,
    ) -> AttemptOutcome {
        let is_rate_limited = response.status().as_u16() == 403
            && response
                .headers()
                .get("x-ratelimit-remaining")
                .and_then(|v| v.to_str().ok())
                == Some("0");

        if !is_rate_limited {
            return AttemptOutcome::Response(response);
        }

        if let Some(reset_at) = parse_rate_limit_reset(&response) {
            tracing::warn!(credential = %key, %reset_at, "credential rate-limited");
            self.rate_limits.mark(key.clone(), reset_at);
        } else {
            tracing::warn!(credential = %key, "rate-limited response missing x-ratelimit-reset");
        }

        AttemptOutcome::RateLimited
    }
}

fn apply_conditional_headers(headers: &mut HeaderMap, conditional: &Conditional) {
    // Last-Modified takes precedence: ETags are credential-specific and
    // break across rotation, Last-Modified is portable. Never send both.
    if let Some(last_modified) = &conditional.last_modified {
        if let Ok(value) = HeaderValue::from_str(last_modified) {
            headers.insert(HeaderName::from_static("if-modified-since"), value);
        }
    } else if let Some(etag) = &conditional.etag {
        if let Ok(value) = HeaderValue::from_str(etag) {
            headers.insert(HeaderName::from_static("if-none-match"), value);
        }
    }
}

fn parse_rate_limit_reset(response: &reqwest::Response) -> Option<DateTime<Utc>> {
    let raw = response.headers().get("x-ratelimit-reset")?.to_str().ok()?;
    let seconds: f64 = raw.parse().ok()?;
    Utc.timestamp_opt(seconds.trunc() as i64, 0).single()
}

async fn to_forwarded_response(response: reqwest::Response) -> ForwardedResponse {
    let status = response.status().as_u16();
    let filtered = strip_headers(response.headers(), RESPONSE_STRIP);
    let headers: Vec<(String, String)> = filtered
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                value.to_str().unwrap_or_default().to_string(),
            )
        })
        .collect();
    let body = response.bytes().await.map(|b| b.to_vec()).unwrap_or_default();

    ForwardedResponse {
        status,
        headers,
        body,
    }
}

#[cfg(test)]
#[path = "forwarder_tests.rs"]
mod tests;
