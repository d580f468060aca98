//! Gateway failure taxonomy.
//!
//! Every failure is terminal for the request and produces exactly one
//! response: the mapped status and a JSON body `{"detail": "<message>"}`.

use std::error::Error as StdError;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// No routing rule matched the path.
    #[error("Endpoint not found")]
    NoRoute,

    /// The upstream did not answer within the timeout.
    #[error("Gateway timeout: Backend service did not respond in time")]
    Timeout,

    /// The upstream connection could not be established.
    #[error("Bad gateway: Unable to connect to backend service")]
    Connect,

    /// The upstream answered with an error status.
    #[error("Backend error: {body}")]
    UpstreamStatus { status: StatusCode, body: String },

    #[error("Internal proxy error: {0}")]
    Internal(String),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::NoRoute => StatusCode::NOT_FOUND,
            GatewayError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            GatewayError::Connect => StatusCode::BAD_GATEWAY,
            GatewayError::UpstreamStatus { status, .. } => *status,
            GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short label for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::NoRoute => "no_route",
            GatewayError::Timeout => "timeout",
            GatewayError::Connect => "connect",
            GatewayError::UpstreamStatus { .. } => "upstream_status",
            GatewayError::Internal(_) => "internal",
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        // Connect timeouts report both; they count as timeouts.
        if err.is_timeout() {
            GatewayError::Timeout
        } else if err.is_connect() {
            GatewayError::Connect
        } else {
            GatewayError::Internal(describe(&err))
        }
    }
}

/// Error message including its source chain.
fn describe(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
