//! Credential-injecting request gateway.
//!
//! Routes each request to one of two upstream services by its path, swaps
//! in that service's bearer credential, and relays the answer back.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod relay;
pub mod routing;

pub use config::GatewayConfig;
pub use error::GatewayError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
