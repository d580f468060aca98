//! Environment variable names read at startup.

pub const QUERY_URL: &str = "QUERY_URL";
pub const BFF_URL: &str = "BACKEND_FRO_FRONTEND_URL";
pub const QUERY_AUTH_HEADER: &str = "AUTHENTICATION_HEADER_NAME_QUERY";
pub const BFF_AUTH_HEADER: &str = "AUTHENTICATION_HEADER_NAME_BFF";
pub const QUERY_KEY: &str = "QUERY_KEY";
pub const BFF_KEY: &str = "BFF_KEY";

pub const BIND_ADDRESS: &str = "GATEWAY_BIND_ADDRESS";
pub const LOG_LEVEL: &str = "GATEWAY_LOG_LEVEL";
