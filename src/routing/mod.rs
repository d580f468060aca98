//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path (raw, leading '/' removed)
//!     → router.rs (ordered rule lookup)
//!     → matcher.rs (substring conditions)
//!     → Return: Matched(Service) or NoMatch
//!     → target.rs (Service → base URL + bearer credential)
//! ```
//!
//! # Design Decisions
//! - Rules compiled at startup, immutable at runtime
//! - Deterministic: same path always selects the same service
//! - First match wins
//! - Credential selection is an exhaustive match over `Service`

pub mod matcher;
pub mod router;
pub mod target;

pub use router::{RouteDecision, Router, Service};
pub use target::{BackendTarget, Targets};
