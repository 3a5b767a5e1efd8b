pub mod app_conf;
pub mod branding_conf;
pub mod minio_conf;
pub mod mongo_conf;

use std::{env, fmt, str::FromStr};
use tracing::{debug, error};

pub use branding_conf::BrandingConfig;
pub use minio_conf::MinioConfig;
pub use mongo_conf::MongoConfig;

/// Common configuration error type
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Reads a variable that has no sensible default.
pub(crate) fn required_var(name: &str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| {
        error!("{} environment variable not found", name);
        ConfigError::EnvVarNotFound(name.to_string())
    })
}

/// Reads and parses an optional variable, falling back to `default` when unset.
pub(crate) fn parsed_var<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| {
            error!("Invalid {} value: {}", name, raw);
            ConfigError::InvalidValue(format!("{}: {}", name, raw))
        }),
        Err(_) => {
            debug!("{} not set, using default: {}", name, default);
            Ok(default)
        }
    }
}
