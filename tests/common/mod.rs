//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::http::{header, Uri};
use axum::response::IntoResponse;
use futures_util::future::BoxFuture;
use osmi_gateway::rpc::{RpcBackend, RpcCall, RpcReply};
use osmi_gateway::{GatewayConfig, GatewayServer};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use serde_json::{json, Value};
use tonic::Status;

type Responder = Box<dyn Fn(&RpcCall) -> Result<RpcReply, Status> + Send + Sync>;

/// In-process backend recording every call it receives.
pub struct FakeBackend {
    calls: Mutex<Vec<RpcCall>>,
    respond: Responder,
}

#[allow(dead_code)]
impl FakeBackend {
    pub fn new<F>(respond: F) -> Arc<Self>
    where
        F: Fn(&RpcCall) -> Result<RpcReply, Status> + Send + Sync + 'static,
    {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            respond: Box::new(respond),
        })
    }

    /// Replies with the request message.
    pub fn echo() -> Arc<Self> {
        Self::new(|call| {
            Ok(RpcReply {
                message: call.message.clone(),
                ..RpcReply::default()
            })
        })
    }

    pub fn failing(status: fn() -> Status) -> Arc<Self> {
        Self::new(move |_| Err(status()))
    }

    pub fn calls(&self) -> Vec<RpcCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl RpcBackend for FakeBackend {
    fn invoke(&self, call: RpcCall) -> BoxFuture<'_, Result<RpcReply, Status>> {
        let result = (self.respond)(&call);
        self.calls.lock().unwrap().push(call);
        Box::pin(async move { result })
    }
}

/// A gateway serving on an ephemeral port; stops when dropped.
pub struct TestGateway {
    pub addr: SocketAddr,
    _shutdown: oneshot::Sender<()>,
}

impl TestGateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

async fn serve(server: GatewayServer) -> TestGateway {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let _ = server
            .run(listener, async {
                let _ = rx.await;
            })
            .await;
    });

    TestGateway {
        addr,
        _shutdown: tx,
    }
}

/// Start a gateway in front of `backend`.
#[allow(dead_code)]
pub async fn spawn_gateway(config: GatewayConfig, backend: Arc<FakeBackend>) -> TestGateway {
    serve(GatewayServer::with_backend(config, backend)).await
}

/// Start a gateway with its real gRPC client.
#[allow(dead_code)]
pub async fn spawn_grpc_gateway(config: GatewayConfig) -> TestGateway {
    serve(GatewayServer::new(config).unwrap()).await
}

/// Length-prefixed gRPC message frame, uncompressed.
#[allow(dead_code)]
pub fn grpc_frame(message: &Value) -> Vec<u8> {
    let payload = serde_json::to_vec(message).unwrap();
    let mut frame = Vec::with_capacity(payload.len() + 5);
    frame.push(0);
    frame.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    frame.extend_from_slice(&payload);
    frame
}

/// Start an h2c server speaking JSON over gRPC framing. Every method
/// replies `{"path": <rpc path>, "received": <request message>}` after
/// waiting `delay`.
#[allow(dead_code)]
pub async fn spawn_grpc_json_backend(delay: Duration) -> SocketAddr {
    let app = axum::Router::new().fallback(move |uri: Uri, body: Bytes| async move {
        let received: Value = if body.len() > 5 {
            serde_json::from_slice(&body[5..]).unwrap_or(Value::Null)
        } else {
            json!({})
        };
        tokio::time::sleep(delay).await;

        let reply = json!({ "path": uri.path(), "received": received });
        (
            [(header::CONTENT_TYPE, "application/grpc")],
            grpc_frame(&reply),
        )
            .into_response()
    });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}
