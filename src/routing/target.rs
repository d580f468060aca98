//! Upstream targets and their credentials.
//!
//! Each [`Service`] is paired 1:1 with a base URL and a bearer credential.
//! Header name and value are parsed once at startup so the request path
//! never has to handle a malformed credential.

use std::fmt;

use axum::http::{HeaderName, HeaderValue};

use crate::config::env;
use crate::config::{UpstreamConfig, UpstreamsConfig, ValidationError};
use crate::routing::router::Service;

/// A configured upstream service.
#[derive(Clone)]
pub struct BackendTarget {
    service: Service,
    base_url: String,
    credential_header: HeaderName,
    credential: HeaderValue,
}

impl BackendTarget {
    pub fn new(service: Service, config: &UpstreamConfig) -> Result<Self, ValidationError> {
        let (header_field, key_field) = match service {
            Service::Query => (env::QUERY_AUTH_HEADER, env::QUERY_KEY),
            Service::Bff => (env::BFF_AUTH_HEADER, env::BFF_KEY),
        };

        let credential_header = HeaderName::from_bytes(config.auth_header.as_bytes())
            .map_err(|_| ValidationError::InvalidHeaderName {
                field: header_field,
                value: config.auth_header.clone(),
            })?;

        let mut credential = HeaderValue::from_str(&format!("Bearer {}", config.key))
            .map_err(|_| ValidationError::InvalidCredential(key_field))?;
        credential.set_sensitive(true);

        Ok(Self {
            service,
            base_url: config.base_url.clone(),
            credential_header,
            credential,
        })
    }

    pub fn service(&self) -> Service {
        self.service
    }

    /// Base URL as configured (trailing slashes intact).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credential_header(&self) -> &HeaderName {
        &self.credential_header
    }

    /// `Bearer {secret}`, marked sensitive.
    pub fn credential(&self) -> &HeaderValue {
        &self.credential
    }

    /// Upstream URL for a routed path: base without trailing slashes, `/`, path.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

impl fmt::Debug for BackendTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendTarget")
            .field("service", &self.service)
            .field("base_url", &self.base_url)
            .field("credential_header", &self.credential_header)
            .finish_non_exhaustive()
    }
}

/// Both upstream targets, looked up by service.
#[derive(Debug, Clone)]
pub struct Targets {
    query: BackendTarget,
    bff: BackendTarget,
}

impl Targets {
    pub fn from_config(config: &UpstreamsConfig) -> Result<Self, ValidationError> {
        Ok(Self {
            query: BackendTarget::new(Service::Query, &config.query)?,
            bff: BackendTarget::new(Service::Bff, &config.bff)?,
        })
    }

    pub fn get(&self, service: Service) -> &BackendTarget {
        match service {
            Service::Query => &self.query,
            Service::Bff => &self.bff,
        }
    }
}
