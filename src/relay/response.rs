//! Upstream response handling.
//!
//! # Responsibilities
//! - Collect upstream status, headers and body
//! - Strip `connection` (and, when relaying headers, the framing headers
//!   the server recomputes)
//! - Turn the upstream answer into the caller's response per `ResponseMode`
//!
//! # Design Decisions
//! - Bodies are fully buffered; no streaming
//! - Bodies arrive already decompressed; the client drops
//!   `content-encoding` and `content-length` when it decodes
//! - `Compat` answers 200 with the body text regardless of upstream status,
//!   decoded with the charset the upstream declared
//! - `Faithful` relays 1xx-3xx as-is and maps 4xx/5xx to `Backend error`

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, HeaderName, StatusCode},
    response::Response,
};

use crate::config::ResponseMode;
use crate::error::GatewayError;

/// Response headers the server layer manages itself.
fn is_framing(name: &HeaderName) -> bool {
    *name == header::CONNECTION
        || *name == header::TRANSFER_ENCODING
        || *name == header::CONTENT_LENGTH
        || name.as_str() == "keep-alive"
}

/// A buffered upstream answer.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    /// Upstream headers minus `connection`.
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl UpstreamResponse {
    pub async fn read(response: reqwest::Response) -> Result<Self, GatewayError> {
        let status = response.status();
        let mut headers = response.headers().clone();
        headers.remove(header::CONNECTION);
        let body = response.bytes().await?;

        Ok(Self {
            status,
            headers,
            body,
        })
    }

    /// Body decoded as text; invalid UTF-8 is replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Relay the upstream status and headers, or fail with `Backend error`.
    pub fn into_response(self) -> Result<Response, GatewayError> {
        if self.status.is_client_error() || self.status.is_server_error() {
            return Err(GatewayError::UpstreamStatus {
                status: self.status,
                body: self.text(),
            });
        }

        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        let headers = response.headers_mut();
        for (name, value) in &self.headers {
            if !is_framing(name) {
                headers.append(name.clone(), value.clone());
            }
        }
        Ok(response)
    }
}

/// Build the caller's response for `mode` from a live upstream answer.
pub async fn respond(
    response: reqwest::Response,
    mode: ResponseMode,
) -> Result<Response, GatewayError> {
    match mode {
        ResponseMode::Compat => {
            let text = response.text().await?;
            Ok(Response::new(Body::from(text)))
        }
        ResponseMode::Faithful => UpstreamResponse::read(response).await?.into_response(),
    }
}
