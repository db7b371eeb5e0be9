//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, timeouts and limits
//! - Detect malformed or conflicting routes
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ConfigValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use axum::http::Method;
use url::Url;

use crate::config::schema::{GatewayConfig, RouteConfig};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("listener.bind_address '{0}' is not a socket address")]
    BindAddress(String),

    #[error("backend.address '{0}' is not a valid http(s) endpoint")]
    BackendAddress(String),

    #[error("backend.service must not be empty")]
    EmptyService,

    #[error("backend.max_message_bytes must be greater than zero")]
    MessageLimit,

    #[error("timeouts.{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("timeouts.rpc_secs ({rpc}) exceeds timeouts.request_secs ({request})")]
    RpcOutlivesRequest { rpc: u64, request: u64 },

    #[error("limits.max_body_bytes must be greater than zero")]
    BodyLimit,

    #[error("observability.metrics_address '{0}' is not a socket address")]
    MetricsAddress(String),

    #[error("route '{route}': unsupported method '{method}'")]
    RouteMethod { route: String, method: String },

    #[error("route '{route}': path '{path}' must start with '/'")]
    RoutePath { route: String, path: String },

    #[error("route '{route}': rpc_method must not be empty")]
    RouteRpcMethod { route: String },

    #[error("route '{route}': {method} {path} is already defined")]
    DuplicateRoute {
        route: String,
        method: String,
        path: String,
    },
}

/// Validate the whole configuration, collecting every problem.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ConfigValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ConfigValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    let endpoint = config.backend.endpoint_uri();
    let endpoint_ok = Url::parse(&endpoint)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.host().is_some())
        .unwrap_or(false);
    if !endpoint_ok {
        errors.push(ConfigValidationError::BackendAddress(
            config.backend.address.clone(),
        ));
    }

    if config.backend.service.trim().is_empty() {
        errors.push(ConfigValidationError::EmptyService);
    }
    if config.backend.max_message_bytes == 0 {
        errors.push(ConfigValidationError::MessageLimit);
    }

    let timeouts = &config.timeouts;
    for (name, value) in [
        ("connect_secs", timeouts.connect_secs),
        ("rpc_secs", timeouts.rpc_secs),
        ("request_secs", timeouts.request_secs),
    ] {
        if value == 0 {
            errors.push(ConfigValidationError::ZeroTimeout(name));
        }
    }
    if timeouts.rpc_secs > timeouts.request_secs {
        errors.push(ConfigValidationError::RpcOutlivesRequest {
            rpc: timeouts.rpc_secs,
            request: timeouts.request_secs,
        });
    }

    if config.limits.max_body_bytes == 0 {
        errors.push(ConfigValidationError::BodyLimit);
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ConfigValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    validate_routes(&config.routes, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_routes(routes: &[RouteConfig], errors: &mut Vec<ConfigValidationError>) {
    let mut seen = HashSet::new();

    for route in routes {
        let method = route.method.to_ascii_uppercase();
        let method_ok = Method::from_bytes(method.as_bytes())
            .map(|m| [Method::GET, Method::POST, Method::PUT, Method::DELETE].contains(&m))
            .unwrap_or(false);
        if !method_ok {
            errors.push(ConfigValidationError::RouteMethod {
                route: route.name.clone(),
                method: route.method.clone(),
            });
        }

        if !route.path.starts_with('/') {
            errors.push(ConfigValidationError::RoutePath {
                route: route.name.clone(),
                path: route.path.clone(),
            });
        }

        if route.rpc_method.trim().is_empty() {
            errors.push(ConfigValidationError::RouteRpcMethod {
                route: route.name.clone(),
            });
        }

        if !seen.insert((method.clone(), route.path.clone())) {
            errors.push(ConfigValidationError::DuplicateRoute {
                route: route.name.clone(),
                method,
                path: route.path.clone(),
            });
        }
    }
}
