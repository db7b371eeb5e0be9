//! Validation gate middleware.
//!
//! Runs in front of every gateway route:
//! 1. Method gate (405 outside GET/POST/PUT/DELETE/OPTIONS)
//! 2. Content-Type gate (415 for POST/PUT without `application/json`)
//! 3. Path identifiers and query parameters (400)
//!
//! Payload checks need the matched route and run in the handler.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Method, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::http::request::RequestIdExt;
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::validation::parse_query;

/// Methods the gateway accepts at all.
pub fn is_allowed_method(method: &Method) -> bool {
    [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ]
    .contains(method)
}

/// True when the request declares a JSON body (parameters ignored).
pub fn has_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
        .unwrap_or(false)
}

pub async fn validation_gate(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let method = req.method().clone();
    let request_id = req
        .request_id()
        .map(|id| id.as_str().to_string())
        .unwrap_or_default();

    if !is_allowed_method(&method) {
        tracing::warn!(request_id = %request_id, method = %method, "Method rejected");
        return ApiError::method_not_allowed().into_response();
    }

    if (method == Method::POST || method == Method::PUT) && !has_json_content_type(req.headers()) {
        tracing::warn!(
            request_id = %request_id,
            method = %method,
            path = %req.uri().path(),
            "Unsupported content type"
        );
        return ApiError::unsupported_media_type().into_response();
    }

    let query = parse_query(req.uri().query());
    let checked = state
        .gate
        .check_path(req.uri().path())
        .and_then(|()| state.gate.check_query(&query));

    if let Err(rejection) = checked {
        tracing::warn!(
            request_id = %request_id,
            method = %method,
            path = %req.uri().path(),
            field = %rejection.field,
            reason = %rejection.message,
            "Request rejected by validation gate"
        );
        metrics::record_rejection(&rejection.field);
        return ApiError::from(rejection).into_response();
    }

    next.run(req).await
}
