//! Backend RPC client.
//!
//! # Responsibilities
//! - Own the channel to the backend service
//! - Issue unary calls by method name with a JSON message
//! - Report every failure as a `tonic::Status`
//!
//! # Design Decisions
//! - Lazy connect: the gateway starts even when the backend is down;
//!   calls then fail with `Unavailable`
//! - Per-call deadline enforced locally and sent as `grpc-timeout`; the
//!   endpoint carries no timeout of its own
//! - A call cancelled by the transport once the deadline has passed is
//!   reported as `DeadlineExceeded`
//! - `RpcBackend` is the seam used by the HTTP layer and replaced in tests

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::http::uri::PathAndQuery;
use axum::http::HeaderMap;
use futures_util::future::BoxFuture;
use serde_json::Value;
use tonic::client::Grpc;
use tonic::metadata::MetadataMap;
use tonic::transport::{Channel, Endpoint};
use tonic::{Code, Extensions, Request, Status};

use crate::config::GatewayConfig;
use crate::rpc::codec::JsonCodec;

/// A unary call to the backend service.
#[derive(Debug, Clone)]
pub struct RpcCall {
    /// Method name on the configured service (e.g. "GetEvent").
    pub method: String,
    pub message: Value,
    pub metadata: MetadataMap,
}

/// A successful backend reply.
#[derive(Debug, Clone, Default)]
pub struct RpcReply {
    pub message: Value,
    pub metadata: HeaderMap,
}

/// Anything able to execute backend calls.
pub trait RpcBackend: Send + Sync + 'static {
    fn invoke(&self, call: RpcCall) -> BoxFuture<'_, Result<RpcReply, Status>>;
}

/// Error building the backend channel.
#[derive(Debug, thiserror::Error)]
#[error("invalid backend endpoint '{uri}': {source}")]
pub struct EndpointError {
    uri: String,
    #[source]
    source: tonic::transport::Error,
}

/// gRPC backend reached over a tonic channel.
#[derive(Debug, Clone)]
pub struct GrpcBackend {
    channel: Channel,
    service: Arc<str>,
    rpc_timeout: Duration,
    max_message_bytes: usize,
}

impl GrpcBackend {
    /// Build a lazily connected backend from configuration.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, EndpointError> {
        let uri = config.backend.endpoint_uri();
        let rpc_timeout = Duration::from_secs(config.timeouts.rpc_secs);

        let endpoint = Endpoint::from_shared(uri.clone())
            .map_err(|source| EndpointError { uri, source })?
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs));

        Ok(Self {
            channel: endpoint.connect_lazy(),
            service: config.backend.service.as_str().into(),
            rpc_timeout,
            max_message_bytes: config.backend.max_message_bytes,
        })
    }

    fn path(&self, method: &str) -> Result<PathAndQuery, Status> {
        PathAndQuery::try_from(format!("/{}/{}", self.service, method))
            .map_err(|e| Status::internal(format!("invalid rpc path for '{method}': {e}")))
    }

    async fn unary(&self, call: RpcCall) -> Result<RpcReply, Status> {
        let path = self.path(&call.method)?;

        let mut grpc = Grpc::new(self.channel.clone())
            .max_decoding_message_size(self.max_message_bytes)
            .max_encoding_message_size(self.max_message_bytes);
        grpc.ready()
            .await
            .map_err(|e| Status::unavailable(format!("Service was not ready: {e}")))?;

        let mut request = Request::from_parts(call.metadata, Extensions::default(), call.message);
        request.set_timeout(self.rpc_timeout);

        let started = Instant::now();
        let response = tokio::time::timeout(self.rpc_timeout, grpc.unary(request, path, JsonCodec))
            .await
            .map_err(|_| Status::deadline_exceeded("deadline exceeded"))?
            .map_err(|status| deadline_status(status, started.elapsed(), self.rpc_timeout))?;

        let (metadata, message, _) = response.into_parts();
        Ok(RpcReply {
            message,
            metadata: metadata.into_headers(),
        })
    }
}

/// The channel honours `grpc-timeout` itself and reports expiry as
/// `Cancelled`; past the deadline that is a `DeadlineExceeded`.
fn deadline_status(status: Status, elapsed: Duration, deadline: Duration) -> Status {
    if status.code() == Code::Cancelled && elapsed >= deadline {
        Status::deadline_exceeded(format!("deadline exceeded: {}", status.message()))
    } else {
        status
    }
}

impl RpcBackend for GrpcBackend {
    fn invoke(&self, call: RpcCall) -> BoxFuture<'_, Result<RpcReply, Status>> {
        Box::pin(self.unary(call))
    }
}
