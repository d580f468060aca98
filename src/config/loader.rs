//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::env;
use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    #[error("failed to load .env file: {0}")]
    Dotenv(#[from] dotenvy::Error),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load `.env` from the working directory or the nearest ancestor that has one.
///
/// Variables already present in the process environment are left untouched.
/// A missing file is not an error.
pub fn load_dotenv() -> Result<Option<PathBuf>, ConfigError> {
    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Load a specific env file into the process environment.
pub fn load_env_file(path: &Path) -> Result<(), ConfigError> {
    dotenvy::from_path(path)?;
    Ok(())
}

/// Load configuration, resolving environment variables through `lookup`.
///
/// Values found through `lookup` override the file. The result is validated
/// before it is returned.
pub fn load_config_with<F>(path: Option<&Path>, lookup: F) -> Result<GatewayConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            toml::from_str(&content)?
        }
        None => GatewayConfig::default(),
    };

    apply_env(&mut config, &lookup);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

fn apply_env<F>(config: &mut GatewayConfig, lookup: &F)
where
    F: Fn(&str) -> Option<String>,
{
    let upstreams = &mut config.upstreams;
    let overrides = [
        (env::QUERY_URL, &mut upstreams.query.base_url),
        (env::QUERY_AUTH_HEADER, &mut upstreams.query.auth_header),
        (env::QUERY_KEY, &mut upstreams.query.key),
        (env::BFF_URL, &mut upstreams.bff.base_url),
        (env::BFF_AUTH_HEADER, &mut upstreams.bff.auth_header),
        (env::BFF_KEY, &mut upstreams.bff.key),
        (env::BIND_ADDRESS, &mut config.listener.bind_address),
        (env::LOG_LEVEL, &mut config.observability.log_level),
    ];

    for (key, slot) in overrides {
        if let Some(value) = lookup(key) {
            *slot = value;
        }
    }
}
