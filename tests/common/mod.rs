//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::io::Write;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use auth_gateway::config::{GatewayConfig, ResponseMode, UpstreamConfig};
use auth_gateway::{HttpServer, Shutdown};
use axum::{
    body::Bytes,
    extract::{Request, State},
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Redirect},
    routing::{any, get},
    Router,
};
use flate2::{write::GzEncoder, Compression};
use tokio::net::TcpListener;

pub const QUERY_HEADER: &str = "Authorization";
pub const QUERY_KEY: &str = "query-secret";
pub const BFF_HEADER: &str = "X-Bff-Token";
pub const BFF_KEY: &str = "bff-secret";

/// A request as received by a mock backend.
#[derive(Debug, Clone)]
pub struct Captured {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Bytes,
}

pub type Captures = Arc<Mutex<Vec<Captured>>>;

#[derive(Clone)]
struct CaptureState {
    captures: Captures,
    status: StatusCode,
    body: &'static str,
}

async fn capture(State(state): State<CaptureState>, request: Request) -> impl IntoResponse {
    let (parts, body) = request.into_parts();
    let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    state.captures.lock().unwrap().push(Captured {
        method: parts.method,
        uri: parts.uri,
        headers: parts.headers,
        body,
    });
    (
        state.status,
        [("x-backend", "mock"), ("content-type", "application/json")],
        state.body,
    )
}

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// Start a backend that records every request and answers with `status`/`body`.
pub async fn start_capture_backend(status: u16, body: &'static str) -> (SocketAddr, Captures) {
    let captures: Captures = Arc::default();
    let state = CaptureState {
        captures: captures.clone(),
        status: StatusCode::from_u16(status).unwrap(),
        body,
    };
    let app = Router::new()
        .route("/", any(capture))
        .route("/{*path}", any(capture))
        .with_state(state);
    (serve(app).await, captures)
}

/// Start a backend that waits `delay` before answering.
pub async fn start_slow_backend(delay: Duration) -> SocketAddr {
    let app = Router::new().route(
        "/{*path}",
        any(move || async move {
            tokio::time::sleep(delay).await;
            "too late"
        }),
    );
    serve(app).await
}

/// Start a backend where `/v1/old` redirects to `/v1/new`.
pub async fn start_redirecting_backend() -> SocketAddr {
    let app = Router::new()
        .route("/v1/old", get(|| async { Redirect::temporary("/v1/new") }))
        .route("/v1/new", get(|| async { "moved here" }));
    serve(app).await
}

/// Start a backend that answers every request with `body` gzip-encoded.
///
/// The `accept-encoding` value of each request is recorded.
pub async fn start_gzip_backend(body: &'static str) -> (SocketAddr, Arc<Mutex<Vec<String>>>) {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(body.as_bytes()).unwrap();
    let compressed = encoder.finish().unwrap();

    let seen: Arc<Mutex<Vec<String>>> = Arc::default();
    let recorder = seen.clone();
    let app = Router::new().route(
        "/{*path}",
        any(move |headers: HeaderMap| {
            let compressed = compressed.clone();
            let recorder = recorder.clone();
            async move {
                let accept = headers
                    .get(header::ACCEPT_ENCODING)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                recorder.lock().unwrap().push(accept);
                (
                    [
                        (header::CONTENT_ENCODING, "gzip"),
                        (header::CONTENT_TYPE, "application/json"),
                    ],
                    compressed,
                )
            }
        }),
    );
    (serve(app).await, seen)
}

/// An address nothing listens on.
pub fn closed_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

pub fn gateway_config(query: SocketAddr, bff: SocketAddr) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.upstreams.query = UpstreamConfig {
        base_url: format!("http://{}/", query),
        auth_header: QUERY_HEADER.into(),
        key: QUERY_KEY.into(),
    };
    config.upstreams.bff = UpstreamConfig {
        base_url: format!("http://{}", bff),
        auth_header: BFF_HEADER.into(),
        key: BFF_KEY.into(),
    };
    config.relay.system_proxy = false;
    config.relay.response_mode = ResponseMode::Compat;
    config
}

/// Start the gateway on an ephemeral port.
pub async fn start_gateway(config: GatewayConfig) -> (SocketAddr, Shutdown) {
    let server = HttpServer::new(&config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}
