//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, tracing span with request ID)
//!     → cors.rs (preflight answered here, headers added to the rest)
//!     → /health → health.rs
//!     → /*path → routing (select upstream) → relay (forward, translate)
//!     → Send to client
//! ```

pub mod cors;
pub mod health;
pub mod server;

pub use server::{AppState, HttpServer, ServerError};
