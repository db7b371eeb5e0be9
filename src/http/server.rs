//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Create Axum Router with gateway, health and readiness handlers
//! - Wire up middleware (tracing, request ID, timeout, CORS, validation gate)
//! - Keep the error envelope on requests cut off by the request timeout
//! - Match routes, run payload checks and build the RPC message
//! - Forward calls to the backend and translate failures
//! - Bind server to listener with graceful shutdown

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::{Body, Bytes},
    extract::{
        rejection::{BytesRejection, FailedToBufferBody},
        DefaultBodyLimit, FromRequest, State,
    },
    http::{header, Method, Request, StatusCode},
    middleware::{from_fn_with_state, map_response},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde_json::{Map, Value};
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::Span;

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::http::health;
use crate::http::middleware::{cors_layer, validation_gate};
use crate::http::request::{RequestIdExt, RequestIdLayer};
use crate::http::response::{
    response_time, ApiError, BODY_NOT_OBJECT, BODY_UNREADABLE, INVALID_JSON, X_RESPONSE_TIME,
};
use crate::observability::metrics;
use crate::routing::{RouteMatch, RouteTable};
use crate::rpc::metadata::{forward_headers, surface_metadata};
use crate::rpc::{GrpcBackend, RpcBackend, RpcCall};
use crate::status::translator::messages;
use crate::status::{translate, translate_routing_failure, BackendFailure};
use crate::validation::gate::QueryParams;
use crate::validation::payload::normalize_payload;
use crate::validation::{parse_query, ValidationGate};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub routes: Arc<RouteTable>,
    pub gate: ValidationGate,
    pub backend: Arc<dyn RpcBackend>,
}

/// HTTP server for the gateway.
pub struct GatewayServer {
    router: Router,
    config: Arc<GatewayConfig>,
    routes: Arc<RouteTable>,
}

impl GatewayServer {
    /// Create a server talking to the configured gRPC backend.
    ///
    /// Must be called inside a Tokio runtime; the channel connects lazily.
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let backend = GrpcBackend::from_config(&config)?;
        Ok(Self::with_backend(config, Arc::new(backend)))
    }

    /// Create a server with an explicit backend implementation.
    pub fn with_backend(config: GatewayConfig, backend: Arc<dyn RpcBackend>) -> Self {
        let routes = Arc::new(RouteTable::from_config(&config.routes));
        let gate = ValidationGate::new(
            config.validation.identifier_scheme,
            config.validation.strict_phone,
        );
        let config = Arc::new(config);

        let state = AppState {
            config: Arc::clone(&config),
            routes: Arc::clone(&routes),
            gate,
            backend,
        };

        Self {
            router: Self::build_router(state),
            config,
            routes,
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        let request_timeout = Duration::from_secs(state.config.timeouts.request_secs);
        let max_body_bytes = state.config.limits.max_body_bytes;

        let gateway = Router::new()
            .route("/", any(gateway_handler))
            .route("/{*path}", any(gateway_handler))
            .layer(from_fn_with_state(state.clone(), validation_gate));
        let gateway = match cors_layer(&state.config.cors) {
            Some(cors) => gateway.layer(cors),
            None => gateway,
        };

        gateway
            .route(
                "/health",
                get(health::health).fallback(health::method_not_allowed),
            )
            .route(
                "/ready",
                get(health::ready).fallback(health::method_not_allowed),
            )
            .with_state(state)
            .layer(DefaultBodyLimit::max(max_body_bytes))
            .layer(TimeoutLayer::with_status_code(
                StatusCode::GATEWAY_TIMEOUT,
                request_timeout,
            ))
            .layer(map_response(timeout_envelope))
            .layer(TraceLayer::new_for_http().make_span_with(make_span))
            .layer(RequestIdLayer)
    }

    /// The fully layered router, e.g. for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Serve on `listener` until `shutdown` resolves, then drain.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request.request_id().map(|id| id.as_str()).unwrap_or("-");
    tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
    )
}

/// The timeout layer answers with an empty body; give it the error envelope.
async fn timeout_envelope(response: Response) -> Response {
    if response.status() == StatusCode::GATEWAY_TIMEOUT
        && !response.headers().contains_key(header::CONTENT_TYPE)
    {
        return ApiError::new(StatusCode::GATEWAY_TIMEOUT, messages::TIMEOUT).into_response();
    }
    response
}

/// Gateway handler: route lookup, then dispatch to the backend.
async fn gateway_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = request
        .request_id()
        .map(|id| id.as_str().to_string())
        .unwrap_or_default();

    if method == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }

    let found = match state.routes.match_request(&method, &path) {
        Ok(found) => found,
        Err(failure) => {
            tracing::warn!(
                request_id = %request_id,
                method = %method,
                path = %path,
                reason = %failure,
                "No route matched"
            );
            let error = ApiError::from(translate_routing_failure(failure.status()));
            metrics::record_request(method.as_str(), error.status().as_u16(), "none", start);
            return error.into_response();
        }
    };

    let rpc_method = found.route.rpc_method.clone();
    let response = match dispatch(&state, found, request, &request_id).await {
        Ok(response) => response,
        Err(error) => error.into_response(),
    };

    metrics::record_request(
        method.as_str(),
        response.status().as_u16(),
        &rpc_method,
        start,
    );
    tracing::info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        rpc_method = %rpc_method,
        status = response.status().as_u16(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Request completed"
    );
    response
}

async fn dispatch(
    state: &AppState,
    found: RouteMatch,
    request: Request<Body>,
    request_id: &str,
) -> Result<Response, ApiError> {
    let query = parse_query(request.uri().query());
    let metadata = forward_headers(request.headers());

    let bytes = Bytes::from_request(request, state)
        .await
        .map_err(body_rejection)?;
    let mut body = parse_body(&bytes)?;

    if let Some(kind) = found.route.payload {
        if let Err(rejection) = state.gate.check_payload(kind, &body) {
            tracing::warn!(
                request_id = %request_id,
                rpc_method = %found.route.rpc_method,
                field = %rejection.field,
                reason = %rejection.message,
                "Payload rejected by validation gate"
            );
            metrics::record_rejection(&rejection.field);
            return Err(rejection.into());
        }

        let validation = &state.config.validation;
        if validation.normalize_payloads {
            normalize_payload(kind, &mut body, validation.normalize_names);
        }
    }

    let call = RpcCall {
        method: found.route.rpc_method.clone(),
        message: build_message(body, &found.params, &query)?,
        metadata,
    };

    tracing::debug!(
        request_id = %request_id,
        rpc_method = %call.method,
        "Forwarding to backend"
    );

    match state.backend.invoke(call).await {
        Ok(reply) => {
            let mut response = Json(reply.message).into_response();
            let headers = response.headers_mut();
            headers.extend(surface_metadata(&reply.metadata));
            if let Some(value) = response_time() {
                headers.insert(X_RESPONSE_TIME, value);
            }
            Ok(response)
        }
        Err(status) => {
            let failure = BackendFailure::from(status);
            let translated = translate(&failure);
            let code = failure
                .code
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| "Unknown".to_string());
            metrics::record_backend_failure(&code);

            if translated.status().is_server_error() {
                tracing::error!(
                    request_id = %request_id,
                    rpc_method = %found.route.rpc_method,
                    code = %code,
                    description = %failure.description,
                    "Backend call failed"
                );
            } else {
                tracing::warn!(
                    request_id = %request_id,
                    rpc_method = %found.route.rpc_method,
                    code = %code,
                    description = %failure.description,
                    "Backend rejected call"
                );
            }

            Err(ApiError::from(translated).with_headers(surface_metadata(&failure.metadata)))
        }
    }
}

/// Only an over-limit body is a 413; a body that fails mid-read is a 400.
fn body_rejection(rejection: BytesRejection) -> ApiError {
    match rejection {
        BytesRejection::FailedToBufferBody(FailedToBufferBody::LengthLimitError(_)) => {
            ApiError::payload_too_large()
        }
        _ => ApiError::bad_request(BODY_UNREADABLE),
    }
}

/// Decode the request body. An empty body is an empty object.
fn parse_body(bytes: &Bytes) -> Result<Value, ApiError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_slice(bytes).map_err(|_| ApiError::bad_request(INVALID_JSON))
}

/// Body fields, overridden by path parameters, completed by query parameters.
fn build_message(
    body: Value,
    params: &[(String, String)],
    query: &QueryParams,
) -> Result<Value, ApiError> {
    let Value::Object(mut message) = body else {
        return Err(ApiError::bad_request(BODY_NOT_OBJECT));
    };

    for (name, value) in params {
        message.insert(name.clone(), Value::String(value.clone()));
    }
    for (key, value) in query {
        message
            .entry(key.clone())
            .or_insert_with(|| Value::String(value.clone()));
    }

    Ok(Value::Object(message))
}
