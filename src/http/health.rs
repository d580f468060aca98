//! Gateway health endpoint.
//!
//! Reports a static status plus the two configured base URLs. It does not
//! probe the upstreams.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::http::server::AppState;
use crate::routing::Service;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub query_url: String,
    pub backend_fro_frontend_url: String,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy",
        query_url: state.targets.get(Service::Query).base_url().to_string(),
        backend_fro_frontend_url: state.targets.get(Service::Bff).base_url().to_string(),
    })
}
