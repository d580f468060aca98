//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (CORS, tracing with request IDs)
//! - Bind server to listener
//! - Dispatch requests to routing engine
//! - Forward requests to upstream backends

use axum::{
    body::{Body, Bytes},
    extract::{Request, State},
    response::Response,
    routing::{get, on, MethodFilter},
    Router,
};
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::config::{GatewayConfig, ValidationError};
use crate::error::GatewayError;
use crate::http::{cors, health};
use crate::relay::{InboundRequest, Relay};
use crate::routing::{RouteDecision, Router as PathRouter, Targets};

/// Methods accepted by the catch-all route.
const PROXY_METHODS: MethodFilter = MethodFilter::GET
    .or(MethodFilter::POST)
    .or(MethodFilter::PUT)
    .or(MethodFilter::DELETE)
    .or(MethodFilter::PATCH)
    .or(MethodFilter::OPTIONS)
    .or(MethodFilter::HEAD);

/// Errors building the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid upstream configuration: {0}")]
    Target(#[from] ValidationError),

    #[error("failed to build upstream client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<PathRouter>,
    pub targets: Arc<Targets>,
    pub relay: Arc<Relay>,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: &GatewayConfig) -> Result<Self, ServerError> {
        let targets = Targets::from_config(&config.upstreams)?;
        let relay = Relay::new(&config.timeouts, &config.relay)?;

        let state = AppState {
            router: Arc::new(PathRouter::new()),
            targets: Arc::new(targets),
            relay: Arc::new(relay),
        };

        Ok(Self {
            router: Self::build_router(state),
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route(
                "/health",
                get(health::health_check).fallback(proxy_handler),
            )
            .route("/", on(PROXY_METHODS, proxy_handler))
            .route("/{*path}", on(PROXY_METHODS, proxy_handler))
            .with_state(state)
            .layer(cors::cors_layer())
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "request",
                    request_id = %Uuid::new_v4(),
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }))
    }

    /// The fully layered application, for driving without a listener.
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Catch-all handler: route the path, then relay to the selected upstream.
async fn proxy_handler(
    State(state): State<AppState>,
    request: Request,
) -> Result<Response, GatewayError> {
    let (parts, body) = request.into_parts();
    let path = crate::relay::outbound::routed_path(parts.uri.path());

    let service = match state.router.select_target(path) {
        RouteDecision::Matched(service) => service,
        RouteDecision::NoMatch => {
            tracing::warn!(path = %path, "No route matched");
            return Err(GatewayError::NoRoute);
        }
    };
    tracing::debug!(path = %path, service = %service, "Route selected");

    let body = read_body(body).await;
    let inbound = InboundRequest::from_parts(&parts, body);
    let target = state.targets.get(service);

    let result = state.relay.forward(target, inbound).await;
    if let Err(e) = &result {
        match e {
            GatewayError::Internal(_) => {
                tracing::error!(service = %service, kind = e.kind(), error = %e, "Relay failed")
            }
            _ => tracing::warn!(service = %service, kind = e.kind(), error = %e, "Relay failed"),
        }
    }
    result
}

/// Buffer the inbound body; an unreadable body is treated as absent.
async fn read_body(body: Body) -> Bytes {
    match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read request body, forwarding without it");
            Bytes::new()
        }
    }
}
