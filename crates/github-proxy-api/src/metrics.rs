//! Prometheus-backed [`TelemetrySink`]: the two metric families the
//! original `telemetry.py` exposed, `custom_github_ratelimit` and
//! `custom_github_proxy_request`.

use github_proxy_core::{CacheHit, CredentialKey, TelemetrySink};
use prometheus::{register_int_counter_vec, register_int_gauge_vec, IntCounterVec, IntGaugeVec};

#[derive(Clone)]
pub struct PrometheusTelemetrySink {
    github_ratelimit: IntGaugeVec,
    proxy_request: IntCounterVec,
}

impl PrometheusTelemetrySink {
    pub fn new() -> Result<Self, prometheus::Error> {
        Ok(Self {
            github_ratelimit: register_int_gauge_vec!(
                "custom_github_ratelimit",
                "GitHub rate-limit fields observed per credential",
                &["credential_name", "credential_origin", "field"]
            )?,
            proxy_request: register_int_counter_vec!(
                "custom_github_proxy_request",
                "Inbound requests handled by the proxy",
                &["client", "http_method", "cache_hit"]
            )?,
        })
    }
}

impl TelemetrySink for PrometheusTelemetrySink {
    fn on_upstream_response(&self, credential: &CredentialKey, response: &reqwest::Response) {
        let labels = [
            credential.name.as_str(),
            &credential.origin.to_string(),
        ];

        if let Some(remaining) = header_i64(response, "x-ratelimit-remaining") {
            self.github_ratelimit
                .with_label_values(&[labels[0], labels[1], "remaining"])
                .set(remaining);
        }
        if let Some(limit) = header_i64(response, "x-ratelimit-limit") {
            self.github_ratelimit
                .with_label_values(&[labels[0], labels[1], "limit"])
                .set(limit);
        }
        if let Some(reset) = header_i64(response, "x-ratelimit-reset") {
            self.github_ratelimit
                .with_label_values(&[labels[0], labels[1], "reset_timestamp"])
                .set(reset);

            let now = std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .expect("system clock is after the Unix epoch")
                .as_secs() as i64;
            self.github_ratelimit
                .with_label_values(&[labels[0], labels[1], "reset"])
                .set((reset - now).max(0));
        }
    }

    fn on_inbound_request(&self, client: &str, method: &str, cache_hit: Option<CacheHit>) {
        let cache_hit_label = match cache_hit {
            Some(CacheHit::Hit) => "true",
            Some(CacheHit::Miss) => "false",
            Some(CacheHit::NotCacheable) | None => "none",
        };

        self.proxy_request
            .with_label_values(&[client, method, cache_hit_label])
            .inc();
    }
}

fn header_i64(response: &reqwest::Response, name: &str) -> Option<i64> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<f64>().ok())
        .map(|v| v as i64)
}
