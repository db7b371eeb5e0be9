//! HTTP-to-RPC gateway for the Osmi ticketing service.
//!
//! Validates identifiers, query parameters and payloads at the edge,
//! forwards accepted requests to the backend over gRPC, and translates
//! backend failures into sanitized HTTP errors.

// Core subsystems
pub mod config;
pub mod http;
pub mod routing;
pub mod rpc;
pub mod status;
pub mod validation;

// Cross-cutting concerns
pub mod error;
pub mod lifecycle;
pub mod observability;

pub use config::schema::GatewayConfig;
pub use error::GatewayError;
pub use http::GatewayServer;
