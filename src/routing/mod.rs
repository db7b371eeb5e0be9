//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → router.rs (route lookup)
//!     → matcher.rs (method + path template)
//!     → Return: RouteMatch { route, params } or RoutingFailure (404 / 405)
//!
//! Route Compilation (at startup):
//!     RouteConfig[]
//!     → Compile matchers (method, segment templates)
//!     → Sort by priority, then specificity
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (segment comparison only)
//! - Deterministic: same input always matches same route
//! - First match wins

pub mod matcher;
pub mod router;

pub use router::{RouteMatch, RouteTable, RoutingFailure};
