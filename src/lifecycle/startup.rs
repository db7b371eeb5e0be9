//! Startup reporting.
//!
//! # Responsibilities
//! - Announce the listening address and backend target
//! - List every exposed endpoint with its RPC method
//!
//! # Design Decisions
//! - One structured event per route so logs stay machine-parseable

use std::net::SocketAddr;

use crate::config::GatewayConfig;
use crate::routing::RouteTable;

/// `METHOD path -> Service/Method` lines in route-table order.
pub fn describe_routes(routes: &RouteTable, service: &str) -> Vec<String> {
    routes
        .routes()
        .iter()
        .map(|route| {
            format!(
                "{:<6} {} -> {}/{}",
                route.method().as_str(),
                route.template().as_str(),
                service,
                route.config.rpc_method
            )
        })
        .collect()
}

/// Log the startup banner and the endpoint list.
pub fn log_startup(addr: SocketAddr, config: &GatewayConfig, routes: &RouteTable) {
    tracing::info!(
        address = %addr,
        backend = %config.backend.endpoint_uri(),
        service = %config.backend.service,
        identifier_scheme = ?config.validation.identifier_scheme,
        routes = routes.len(),
        "Gateway listening"
    );

    for route in routes.routes() {
        tracing::info!(
            method = %route.method(),
            path = %route.template().as_str(),
            rpc_method = %route.config.rpc_method,
            payload = ?route.config.payload,
            "Endpoint"
        );
    }
    tracing::info!(path = "/health", "Endpoint");
    tracing::info!(path = "/ready", "Endpoint");
}
