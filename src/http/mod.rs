//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → request.rs (request ID)
//!     → server.rs (trace span, request timeout)
//!     → middleware/cors.rs (preflight, CORS headers)
//!     → middleware/gate.rs (method, content type, path ids, query)
//!     → server.rs (route match, body, payload gate, RPC message)
//!     → rpc backend
//!     → response.rs (JSON reply or error envelope)
//!     → Send to client
//!
//! /health, /ready → health.rs (no gate, no CORS)
//! ```

pub mod health;
pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestId, RequestIdExt, RequestIdLayer, X_REQUEST_ID};
pub use response::ApiError;
pub use server::{AppState, GatewayServer};
