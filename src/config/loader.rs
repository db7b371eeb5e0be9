//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ConfigValidationError};

/// Backend address; takes precedence over [`LEGACY_BACKEND_ADDR_ENV`].
pub const BACKEND_ADDR_ENV: &str = "GRPC_SERVER_ADDR";
pub const LEGACY_BACKEND_ADDR_ENV: &str = "OSMI_GRPC_ADDR";
pub const PORT_ENV: &str = "GATEWAY_PORT";
pub const LOG_LEVEL_ENV: &str = "GATEWAY_LOG_LEVEL";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid GATEWAY_PORT '{0}'")]
    Port(String),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ConfigValidationError>),
}

fn join_errors(errors: &[ConfigValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse configuration from a TOML string, without validating it.
pub fn parse_config(content: &str) -> Result<GatewayConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Resolve the effective configuration: TOML file (or defaults), then
/// process environment overrides, then validation.
pub fn load_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    let mut config = match path {
        Some(path) => parse_config(&fs::read_to_string(path)?)?,
        None => GatewayConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply environment overrides read through `lookup`.
///
/// Empty values are ignored, matching an unset variable.
pub fn apply_env_overrides<F>(config: &mut GatewayConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(addr) = get(BACKEND_ADDR_ENV).or_else(|| get(LEGACY_BACKEND_ADDR_ENV)) {
        config.backend.address = addr.trim().to_string();
    }

    if let Some(port) = get(PORT_ENV) {
        let port: u16 = port.trim().parse().map_err(|_| ConfigError::Port(port.clone()))?;
        let host = config
            .listener
            .bind_address
            .rsplit_once(':')
            .map(|(host, _)| host.to_string())
            .unwrap_or_else(|| "0.0.0.0".to_string());
        config.listener.bind_address = format!("{host}:{port}");
    }

    if let Some(level) = get(LOG_LEVEL_ENV) {
        config.observability.log_level = level;
    }

    Ok(())
}
