//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::validation::{IdentifierScheme, PayloadKind};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Backend RPC service.
    pub backend: BackendConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request size limits.
    pub limits: LimitsConfig,

    /// Cross-origin settings.
    pub cors: CorsConfig,

    /// Input validation settings.
    pub validation: ValidationConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// HTTP routes mapped onto backend RPC methods.
    pub routes: Vec<RouteConfig>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            backend: BackendConfig::default(),
            timeouts: TimeoutConfig::default(),
            limits: LimitsConfig::default(),
            cors: CorsConfig::default(),
            validation: ValidationConfig::default(),
            observability: ObservabilityConfig::default(),
            routes: default_routes(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Backend RPC service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Backend address, with or without scheme (e.g., "localhost:50051").
    pub address: String,

    /// Fully qualified service name (e.g., "osmi.OsmiService").
    pub service: String,

    /// Maximum encoded/decoded message size in bytes.
    pub max_message_bytes: usize,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            address: "localhost:50051".to_string(),
            service: "osmi.OsmiService".to_string(),
            max_message_bytes: 16 * 1024 * 1024,
        }
    }
}

impl BackendConfig {
    /// Backend address as a URI, defaulting the scheme to `http`.
    pub fn endpoint_uri(&self) -> String {
        if self.address.contains("://") {
            self.address.clone()
        } else {
            format!("http://{}", self.address)
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Backend connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Per-call backend deadline in seconds.
    pub rpc_secs: u64,

    /// Total time for an HTTP request/response in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            rpc_secs: 15,
            request_secs: 20,
        }
    }
}

/// Request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Enable CORS headers.
    pub enabled: bool,

    /// Allowed origins. Empty mirrors the request origin.
    pub allowed_origins: Vec<String>,

    /// Preflight cache lifetime in seconds.
    pub max_age_secs: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_origins: Vec::new(),
            max_age_secs: 3600,
        }
    }
}

/// Input validation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Canonical identifier shape for every entity kind.
    pub identifier_scheme: IdentifierScheme,

    /// Require E.164 phone numbers.
    pub strict_phone: bool,

    /// Normalize emails and phones before forwarding.
    pub normalize_payloads: bool,

    /// Title-case person names before forwarding.
    pub normalize_names: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            identifier_scheme: IdentifierScheme::Uuid,
            strict_phone: false,
            normalize_payloads: true,
            normalize_names: false,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Route configuration mapping an HTTP endpoint to a backend method.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct RouteConfig {
    /// Route identifier for logging/metrics.
    pub name: String,

    /// HTTP method (GET, POST, PUT, DELETE).
    pub method: String,

    /// Path template, e.g. "/v1/events/{public_id}".
    pub path: String,

    /// RPC method on the backend service.
    pub rpc_method: String,

    /// Payload kind the request body must satisfy.
    #[serde(default)]
    pub payload: Option<PayloadKind>,

    /// Route priority (higher = checked first).
    #[serde(default)]
    pub priority: u32,
}

impl RouteConfig {
    fn new(method: &str, path: &str, rpc_method: &str, payload: Option<PayloadKind>) -> Self {
        Self {
            name: rpc_method.to_string(),
            method: method.to_string(),
            path: path.to_string(),
            rpc_method: rpc_method.to_string(),
            payload,
            priority: 0,
        }
    }
}

/// The endpoints the Osmi service exposes over HTTP.
pub fn default_routes() -> Vec<RouteConfig> {
    vec![
        RouteConfig::new("POST", "/v1/customers", "CreateCustomer", Some(PayloadKind::Customer)),
        RouteConfig::new("GET", "/v1/customers/{public_id}", "GetCustomer", None),
        RouteConfig::new("POST", "/v1/events", "CreateEvent", Some(PayloadKind::Event)),
        RouteConfig::new("GET", "/v1/events/{public_id}", "GetEvent", None),
        RouteConfig::new("GET", "/v1/events", "ListEvents", None),
        RouteConfig::new("POST", "/v1/tickets", "CreateTicket", Some(PayloadKind::Ticket)),
        RouteConfig::new("GET", "/v1/tickets", "ListTickets", None),
        RouteConfig::new("GET", "/v1/tickets/{ticket_id}", "GetTicket", None),
        RouteConfig::new("PUT", "/v1/tickets/{ticket_id}/status", "UpdateTicketStatus", None),
        RouteConfig::new("POST", "/v1/users", "CreateUser", Some(PayloadKind::User)),
        RouteConfig::new("POST", "/v1/categories", "CreateCategory", None),
        RouteConfig::new(
            "GET",
            "/v1/events/{public_id}/categories",
            "ListEventCategories",
            None,
        ),
    ]
}
