//! Startup errors.
//!
//! Request-path failures never use this type; they become
//! [`ApiError`](crate::http::ApiError) responses instead.

use crate::config::ConfigError;
use crate::rpc::client::EndpointError;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Endpoint(#[from] EndpointError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("metrics exporter error: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("invalid {field} '{value}'")]
    Address { field: &'static str, value: String },
}
