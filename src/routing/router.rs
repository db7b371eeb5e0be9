//! Router implementation.
//!
//! # Responsibilities
//! - Hold compiled route table
//! - Find matching route for incoming request
//! - Distinguish an unknown path from a known path with the wrong method
//!
//! # Design Decisions
//! - Router is immutable after construction (Send + Sync)
//! - Ordered by priority, then by number of literal segments
//! - Ties keep configuration order (stable sort)

use std::sync::Arc;

use axum::http::{Method, StatusCode};

use crate::config::RouteConfig;
use crate::routing::matcher::{MethodMatcher, PathTemplate};

/// A route compiled from configuration.
#[derive(Debug, Clone)]
pub struct CompiledRoute {
    pub config: Arc<RouteConfig>,
    method: MethodMatcher,
    template: PathTemplate,
}

impl CompiledRoute {
    fn compile(config: &RouteConfig) -> Option<Self> {
        Some(Self {
            method: MethodMatcher::parse(&config.method)?,
            template: PathTemplate::new(config.path.as_str()),
            config: Arc::new(config.clone()),
        })
    }

    pub fn method(&self) -> &Method {
        self.method.method()
    }

    pub fn template(&self) -> &PathTemplate {
        &self.template
    }
}

/// A successful lookup: the route plus captured path parameters.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    pub route: Arc<RouteConfig>,
    pub params: Vec<(String, String)>,
}

/// Why no route was selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RoutingFailure {
    #[error("no route for path")]
    NotFound,

    #[error("path does not accept this method")]
    MethodNotAllowed,
}

impl RoutingFailure {
    pub fn status(self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

/// Immutable route table built once at startup.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<CompiledRoute>,
}

impl RouteTable {
    /// Compile routes from configuration. Routes whose method cannot be
    /// parsed are skipped; config validation rejects them earlier.
    pub fn from_config(routes: &[RouteConfig]) -> Self {
        let mut routes: Vec<CompiledRoute> =
            routes.iter().filter_map(CompiledRoute::compile).collect();

        routes.sort_by(|a, b| {
            b.config
                .priority
                .cmp(&a.config.priority)
                .then_with(|| b.template.literal_count().cmp(&a.template.literal_count()))
        });

        Self { routes }
    }

    pub fn routes(&self) -> &[CompiledRoute] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Select the first route matching both method and path.
    pub fn match_request(&self, method: &Method, path: &str) -> Result<RouteMatch, RoutingFailure> {
        let mut path_known = false;

        for route in &self.routes {
            let Some(params) = route.template.captures(path) else {
                continue;
            };
            if route.method.matches(method) {
                return Ok(RouteMatch {
                    route: Arc::clone(&route.config),
                    params,
                });
            }
            path_known = true;
        }

        Err(if path_known {
            RoutingFailure::MethodNotAllowed
        } else {
            RoutingFailure::NotFound
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::default_routes;

    fn route(name: &str, method: &str, path: &str, priority: u32) -> RouteConfig {
        RouteConfig {
            name: name.to_string(),
            method: method.to_string(),
            path: path.to_string(),
            rpc_method: name.to_string(),
            payload: None,
            priority,
        }
    }

    #[test]
    fn test_default_table() {
        let table = RouteTable::from_config(&default_routes());
        assert_eq!(table.len(), 12);

        let found = table
            .match_request(&Method::GET, "/v1/events/EVT001/categories")
            .unwrap();
        assert_eq!(found.route.rpc_method, "ListEventCategories");
        assert_eq!(
            found.params,
            vec![("public_id".to_string(), "EVT001".to_string())]
        );

        let found = table.match_request(&Method::POST, "/v1/tickets").unwrap();
        assert_eq!(found.route.rpc_method, "CreateTicket");
        assert!(found.params.is_empty());
    }

    #[test]
    fn test_not_found_and_method_not_allowed() {
        let table = RouteTable::from_config(&default_routes());
        assert_eq!(
            table.match_request(&Method::GET, "/v1/unknown").unwrap_err(),
            RoutingFailure::NotFound
        );
        let err = table.match_request(&Method::DELETE, "/v1/events").unwrap_err();
        assert_eq!(err, RoutingFailure::MethodNotAllowed);
        assert_eq!(err.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[test]
    fn test_literal_routes_win_over_params() {
        let table = RouteTable::from_config(&[
            route("by_id", "GET", "/v1/events/{id}", 0),
            route("featured", "GET", "/v1/events/featured", 0),
        ]);
        let found = table.match_request(&Method::GET, "/v1/events/featured").unwrap();
        assert_eq!(found.route.name, "featured");
    }

    #[test]
    fn test_priority_ordering() {
        let table = RouteTable::from_config(&[
            route("featured", "GET", "/v1/events/featured", 0),
            route("by_id", "GET", "/v1/events/{id}", 10),
        ]);
        let found = table.match_request(&Method::GET, "/v1/events/featured").unwrap();
        assert_eq!(found.route.name, "by_id");
    }

    #[test]
    fn test_lowercase_method_in_config() {
        let table = RouteTable::from_config(&[route("ping", "get", "/v1/ping", 0)]);
        assert!(table.match_request(&Method::GET, "/v1/ping").is_ok());
    }
}
