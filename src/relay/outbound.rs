//! Inbound → outbound request transformation.
//!
//! # Responsibilities
//! - Capture the routed path, query mapping, headers and body of a request
//! - Rewrite the URL onto the selected upstream
//! - Drop `host` and `connection`, inject the upstream's bearer credential
//! - Omit empty bodies
//!
//! # Design Decisions
//! - Pure construction, no I/O: everything here is testable without a socket
//! - Path is passed through as received (not decoded, not re-encoded)
//! - A repeated query name keeps its last value at its first position

use axum::body::Bytes;
use axum::http::{header, request::Parts, HeaderMap, HeaderName, Method};

use crate::routing::BackendTarget;

/// Headers never copied to the upstream.
fn is_stripped(name: &HeaderName) -> bool {
    *name == header::HOST || *name == header::CONNECTION
}

/// A caller's request as seen by the relay.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Method,
    /// Raw path without the leading `/`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl InboundRequest {
    pub fn from_parts(parts: &Parts, body: Bytes) -> Self {
        Self {
            method: parts.method.clone(),
            path: routed_path(parts.uri.path()).to_string(),
            query: parts.uri.query().map(query_params).unwrap_or_default(),
            headers: parts.headers.clone(),
            body,
        }
    }
}

/// The catch-all route captures everything after the first `/`.
pub fn routed_path(uri_path: &str) -> &str {
    uri_path.strip_prefix('/').unwrap_or(uri_path)
}

/// Decode a query string into a name → value mapping.
pub fn query_params(raw: &str) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = Vec::new();
    for (name, value) in url::form_urlencoded::parse(raw.as_bytes()) {
        match params.iter_mut().find(|(existing, _)| existing.as_str() == name) {
            Some(slot) => slot.1 = value.into_owned(),
            None => params.push((name.into_owned(), value.into_owned())),
        }
    }
    params
}

/// The request dispatched to an upstream.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

impl OutboundRequest {
    pub fn build(target: &BackendTarget, inbound: InboundRequest) -> Self {
        let mut headers = forwardable_headers(&inbound.headers);
        headers.insert(
            target.credential_header().clone(),
            target.credential().clone(),
        );

        Self {
            method: inbound.method,
            url: target.url_for(&inbound.path),
            query: inbound.query,
            headers,
            body: (!inbound.body.is_empty()).then_some(inbound.body),
        }
    }
}

/// Every inbound header except `host` and `connection`.
pub fn forwardable_headers(inbound: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(inbound.len());
    for (name, value) in inbound {
        if !is_stripped(name) {
            headers.append(name.clone(), value.clone());
        }
    }
    headers
}
