//! HTTP status mapping for the errors the forwarding engine can raise.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use github_proxy_core::ForwarderError;
use tracing::{error, warn};

/// Wraps [`ForwarderError`] so the proxy crate can provide its own
/// [`IntoResponse`] impl without violating the orphan rule.
#[derive(Debug)]
pub struct ApiError(pub ForwarderError);

impl From<ForwarderError> for ApiError {
    fn from(err: ForwarderError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            ForwarderError::Unauthorized => (StatusCode::UNAUTHORIZED, self.0.to_string()),
            ForwarderError::AllCredentialsRateLimited => {
                error!("all configured credentials are rate-limited");
                (StatusCode::SERVICE_UNAVAILABLE, self.0.to_string())
            }
            ForwarderError::UpstreamFailure(source) => {
                warn!(error = %source, "upstream request failed");
                (StatusCode::BAD_GATEWAY, self.0.to_string())
            }
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, Json(body)).into_response()
    }
}
