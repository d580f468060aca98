//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Required upstream values present and non-empty
//! - Base URLs, header names and credentials usable on the wire
//! - The two upstreams are distinct services
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::{HeaderName, HeaderValue};
use thiserror::Error;
use url::Url;

use crate::config::env;
use crate::config::schema::{GatewayConfig, UpstreamConfig};

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} environment variable is not set")]
    Missing(&'static str),

    #[error("{field} is not an absolute http(s) URL: {reason}")]
    InvalidUrl { field: &'static str, reason: String },

    #[error("{field} is not a valid header name: {value:?}")]
    InvalidHeaderName { field: &'static str, value: String },

    #[error("{0} cannot be sent in a header value")]
    InvalidCredential(&'static str),

    #[error("{} and {} must point at different services", env::QUERY_URL, env::BFF_URL)]
    SameUpstream,

    #[error("listener.bind_address is not a socket address: {0:?}")]
    InvalidBindAddress(String),

    #[error("timeouts.upstream_secs must be greater than 0")]
    ZeroTimeout,

    #[error("invalid log level {0:?}, expected one of error, warn, info, debug, trace")]
    InvalidLogLevel(String),
}

/// Field labels for one upstream, named after the variables operators set.
struct UpstreamFields {
    url: &'static str,
    header: &'static str,
    key: &'static str,
}

const QUERY_FIELDS: UpstreamFields = UpstreamFields {
    url: env::QUERY_URL,
    header: env::QUERY_AUTH_HEADER,
    key: env::QUERY_KEY,
};

const BFF_FIELDS: UpstreamFields = UpstreamFields {
    url: env::BFF_URL,
    header: env::BFF_AUTH_HEADER,
    key: env::BFF_KEY,
};

/// Validate a fully assembled configuration.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    validate_upstream(&config.upstreams.query, &QUERY_FIELDS, &mut errors);
    validate_upstream(&config.upstreams.bff, &BFF_FIELDS, &mut errors);

    let query = normalized_base(&config.upstreams.query.base_url);
    if !query.is_empty() && query == normalized_base(&config.upstreams.bff.base_url) {
        errors.push(ValidationError::SameUpstream);
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.timeouts.upstream_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if !matches!(
        config.observability.log_level.to_lowercase().as_str(),
        "error" | "warn" | "info" | "debug" | "trace"
    ) {
        errors.push(ValidationError::InvalidLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_upstream(
    upstream: &UpstreamConfig,
    fields: &UpstreamFields,
    errors: &mut Vec<ValidationError>,
) {
    if upstream.base_url.trim().is_empty() {
        errors.push(ValidationError::Missing(fields.url));
    } else if let Err(reason) = check_base_url(&upstream.base_url) {
        errors.push(ValidationError::InvalidUrl {
            field: fields.url,
            reason,
        });
    }

    if upstream.auth_header.trim().is_empty() {
        errors.push(ValidationError::Missing(fields.header));
    } else if HeaderName::from_bytes(upstream.auth_header.as_bytes()).is_err() {
        errors.push(ValidationError::InvalidHeaderName {
            field: fields.header,
            value: upstream.auth_header.clone(),
        });
    }

    if upstream.key.trim().is_empty() {
        errors.push(ValidationError::Missing(fields.key));
    } else if HeaderValue::from_str(&format!("Bearer {}", upstream.key)).is_err() {
        errors.push(ValidationError::InvalidCredential(fields.key));
    }
}

fn check_base_url(raw: &str) -> Result<(), String> {
    let url = Url::parse(raw).map_err(|e| e.to_string())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme {:?}", url.scheme()));
    }
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    Ok(())
}

fn normalized_base(raw: &str) -> &str {
    raw.trim().trim_end_matches('/')
}
