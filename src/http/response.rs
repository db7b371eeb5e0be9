//! Error responses.
//!
//! # Responsibilities
//! - Render every gateway-emitted error in one JSON envelope
//! - Carry backend metadata headers alongside translated failures
//!
//! # Design Decisions
//! - `{"error": {"code", "message"}, "timestamp"}` for every error status
//! - Messages are already sanitized by the time they reach this type

use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::status::translator::messages;
use crate::status::TranslatedError;
use crate::validation::GateRejection;

/// Header stamped on successful gateway responses.
pub const X_RESPONSE_TIME: &str = "x-response-time";

pub const UNSUPPORTED_CONTENT_TYPE: &str = "Unsupported Content-Type. Use application/json";
pub const PAYLOAD_TOO_LARGE: &str = "Request body too large";
pub const INVALID_JSON: &str = "invalid request body: must be valid JSON";
pub const BODY_NOT_OBJECT: &str = "invalid request body: must be a JSON object";
pub const BODY_UNREADABLE: &str = "invalid request body: could not be read";

#[derive(Serialize)]
struct ErrorEnvelope<'a> {
    error: ErrorBody<'a>,
    timestamp: &'a str,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    code: u16,
    message: &'a str,
}

/// An error response produced by the gateway.
#[derive(Debug, Clone)]
pub struct ApiError {
    error: TranslatedError,
    headers: HeaderMap,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        TranslatedError::new(status, message).into()
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn method_not_allowed() -> Self {
        Self::new(StatusCode::METHOD_NOT_ALLOWED, messages::METHOD_NOT_ALLOWED)
    }

    pub fn unsupported_media_type() -> Self {
        Self::new(StatusCode::UNSUPPORTED_MEDIA_TYPE, UNSUPPORTED_CONTENT_TYPE)
    }

    pub fn payload_too_large() -> Self {
        Self::new(StatusCode::PAYLOAD_TOO_LARGE, PAYLOAD_TOO_LARGE)
    }

    /// Attach extra response headers (e.g. surfaced backend metadata).
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers.extend(headers);
        self
    }

    pub fn status(&self) -> StatusCode {
        self.error.status()
    }

    pub fn message(&self) -> &str {
        &self.error.message
    }
}

impl From<TranslatedError> for ApiError {
    fn from(error: TranslatedError) -> Self {
        Self {
            error,
            headers: HeaderMap::new(),
        }
    }
}

impl From<GateRejection> for ApiError {
    fn from(rejection: GateRejection) -> Self {
        Self::bad_request(rejection.message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let envelope = ErrorEnvelope {
            error: ErrorBody {
                code: self.error.code,
                message: &self.error.message,
            },
            timestamp: &self.error.timestamp,
        };
        let mut response = (self.status(), Json(envelope)).into_response();
        response.headers_mut().extend(self.headers);
        response
    }
}

/// Current time as an `X-Response-Time` header value.
pub fn response_time() -> Option<HeaderValue> {
    HeaderValue::from_str(&Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_error_envelope_shape() {
        let response = ApiError::bad_request("invalid event ID format: must be a valid UUID")
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], 400);
        assert_eq!(
            body["error"]["message"],
            "invalid event ID format: must be a valid UUID"
        );
        assert!(chrono::DateTime::parse_from_rfc3339(body["timestamp"].as_str().unwrap()).is_ok());
    }

    #[tokio::test]
    async fn test_extra_headers_are_kept() {
        let mut headers = HeaderMap::new();
        headers.insert("grpc-metadata-x-trace", HeaderValue::from_static("abc"));
        let response = ApiError::method_not_allowed()
            .with_headers(headers)
            .into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()["grpc-metadata-x-trace"], "abc");
    }

    #[test]
    fn test_gate_rejection_is_bad_request() {
        let error = ApiError::from(GateRejection {
            field: "email".into(),
            message: "invalid email format in query".into(),
        });
        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error.message(), "invalid email format in query");
    }

    #[test]
    fn test_response_time_is_rfc3339() {
        let value = response_time().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(value.to_str().unwrap()).is_ok());
    }
}
