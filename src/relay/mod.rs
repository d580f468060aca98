//! Relay subsystem.
//!
//! # Data Flow
//! ```text
//! InboundRequest + selected BackendTarget
//!     → outbound.rs (URL rewrite, header filter, credential, body)
//!     → reqwest client (redirects followed, fixed overall timeout,
//!       gzip/brotli/deflate bodies decoded)
//!     → response.rs (collect upstream answer, apply ResponseMode)
//!     → Response, or GatewayError mapped to status + detail
//! ```
//!
//! # Design Decisions
//! - One client shared by all requests; nothing per-request is shared
//! - No retries: every failure is terminal for its request
//! - The timeout bounds the whole round trip, including body download

pub mod outbound;
pub mod response;

pub use outbound::{InboundRequest, OutboundRequest};
pub use response::UpstreamResponse;

use axum::response::Response;
use reqwest::redirect::Policy;

use crate::config::{RelayConfig, ResponseMode, TimeoutConfig};
use crate::error::GatewayError;
use crate::routing::BackendTarget;

/// Maximum redirects followed for one upstream call.
const MAX_REDIRECTS: usize = 10;

/// Dispatches outbound requests and translates their outcome.
#[derive(Debug, Clone)]
pub struct Relay {
    client: reqwest::Client,
    mode: ResponseMode,
}

impl Relay {
    pub fn new(timeouts: &TimeoutConfig, config: &RelayConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(timeouts.upstream())
            .redirect(Policy::limited(MAX_REDIRECTS));
        if !config.system_proxy {
            builder = builder.no_proxy();
        }

        Ok(Self {
            client: builder.build()?,
            mode: config.response_mode,
        })
    }

    /// Forward one request to `target` and produce the caller's response.
    pub async fn forward(
        &self,
        target: &BackendTarget,
        inbound: InboundRequest,
    ) -> Result<Response, GatewayError> {
        let outbound = OutboundRequest::build(target, inbound);

        tracing::debug!(
            service = %target.service(),
            method = %outbound.method,
            url = %outbound.url,
            has_body = outbound.body.is_some(),
            "Forwarding request"
        );

        let mut request = self
            .client
            .request(outbound.method, &outbound.url)
            .headers(outbound.headers);
        if !outbound.query.is_empty() {
            request = request.query(&outbound.query);
        }
        if let Some(body) = outbound.body {
            request = request.body(body);
        }

        let response = request.send().await?;

        tracing::debug!(
            service = %target.service(),
            status = response.status().as_u16(),
            "Upstream responded"
        );

        response::respond(response, self.mode).await
    }
}
