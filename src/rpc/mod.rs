//! Backend RPC subsystem.
//!
//! # Data Flow
//! ```text
//! RouteMatch + merged JSON message + request headers
//!     → metadata.rs (allow-listed headers → MetadataMap)
//!     → client.rs (unary call /<service>/<method>)
//!     → codec.rs (JSON over gRPC framing)
//!     → RpcReply { message, metadata } or tonic::Status
//! ```

pub mod client;
pub mod codec;
pub mod metadata;

pub use client::{GrpcBackend, RpcBackend, RpcCall, RpcReply};
