//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! .env file (dotenvy, never overrides the process environment)
//! optional config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → environment overrides (QUERY_URL, BFF_KEY, ...)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload
//! - All fields have defaults except the upstream section, which must
//!   come from the file or the environment
//! - Any validation failure aborts startup

pub mod env;
pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config_with, load_dotenv, load_env_file, ConfigError};
pub use schema::{
    GatewayConfig, ListenerConfig, LogFormat, ObservabilityConfig, RelayConfig, ResponseMode,
    TimeoutConfig, UpstreamConfig, UpstreamsConfig,
};
pub use validation::ValidationError;
