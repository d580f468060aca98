//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (routing decisions, upstream outcomes)
//!     → spans from the HTTP trace layer, one per request with a request ID
//!
//! Consumers:
//!     → logging.rs subscriber (stdout, compact/pretty/json)
//! ```

pub mod logging;

pub use logging::init_logging;
