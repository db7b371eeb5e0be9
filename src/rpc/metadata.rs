//! Header ⇄ RPC metadata mapping.
//!
//! # Responsibilities
//! - Select the inbound HTTP headers that travel to the backend
//! - Surface backend metadata as `grpc-metadata-<key>` response headers
//!
//! # Design Decisions
//! - Allow-list only; arbitrary client headers never reach the backend
//! - `grpc-metadata-<key>` request headers are forwarded as `<key>`
//! - Transport-level gRPC headers are never surfaced to HTTP clients

use axum::http::{HeaderMap, HeaderName};
use tonic::metadata::MetadataMap;

/// Prefix marking HTTP headers that map to RPC metadata.
pub const METADATA_HEADER_PREFIX: &str = "grpc-metadata-";

/// Request headers forwarded verbatim.
const FORWARDED_HEADERS: [&str; 4] = [
    "x-request-id",
    "x-correlation-id",
    "authorization",
    "x-api-key",
];

/// Metadata keys owned by the gRPC transport.
const RESERVED_METADATA: [&str; 8] = [
    "content-type",
    "te",
    "user-agent",
    "grpc-status",
    "grpc-message",
    "grpc-status-details-bin",
    "grpc-encoding",
    "grpc-accept-encoding",
];

/// Build the outgoing RPC metadata from request headers.
pub fn forward_headers(headers: &HeaderMap) -> MetadataMap {
    let mut forwarded = HeaderMap::new();

    for (name, value) in headers {
        let key = name.as_str();
        if FORWARDED_HEADERS.contains(&key) {
            forwarded.append(name.clone(), value.clone());
            continue;
        }

        let Some(stripped) = key.strip_prefix(METADATA_HEADER_PREFIX) else {
            continue;
        };
        if stripped.is_empty() || is_reserved(stripped) {
            continue;
        }
        if let Ok(name) = HeaderName::from_bytes(stripped.as_bytes()) {
            forwarded.append(name, value.clone());
        }
    }

    MetadataMap::from_headers(forwarded)
}

/// Convert backend metadata into `grpc-metadata-<key>` response headers.
pub fn surface_metadata(metadata: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::new();

    for (name, value) in metadata {
        if is_reserved(name.as_str()) {
            continue;
        }
        let prefixed = format!("{METADATA_HEADER_PREFIX}{}", name.as_str());
        if let Ok(name) = HeaderName::from_bytes(prefixed.as_bytes()) {
            headers.append(name, value.clone());
        }
    }

    headers
}

fn is_reserved(key: &str) -> bool {
    RESERVED_METADATA.contains(&key)
}
