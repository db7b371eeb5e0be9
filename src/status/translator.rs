//! Backend status to HTTP status translation.
//!
//! # Responsibilities
//! - Map backend status codes onto a fixed HTTP status table
//! - Choose the client-facing message for each outcome
//! - Map routing failures (no route, wrong method)
//!
//! # Design Decisions
//! - Pure function of (code, description); no retry state
//! - Only InvalidArgument passes the backend description through, sanitized
//! - Anything unrecognized becomes 500 with a generic message

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use axum::http::{HeaderMap, StatusCode};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::status::sanitize::{extract_code_name, sanitize_description};

/// Client-facing messages.
pub mod messages {
    pub const NOT_FOUND: &str = "Resource not found";
    pub const ALREADY_EXISTS: &str = "Resource already exists";
    pub const UNAVAILABLE: &str = "Service temporarily unavailable";
    pub const TIMEOUT: &str = "Request timeout";
    pub const UNAUTHORIZED: &str = "Unauthorized access";
    pub const ENDPOINT_NOT_FOUND: &str = "Endpoint not found";
    pub const METHOD_NOT_ALLOWED: &str = "Method not allowed";
    pub const INTERNAL: &str = "Internal server error";
    pub const INVALID_ARGUMENT: &str = "Invalid argument";
}

/// Machine-readable status reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCode {
    NotFound,
    InvalidArgument,
    AlreadyExists,
    Unavailable,
    DeadlineExceeded,
    /// Also covers backends that say "Unauthorized".
    Unauthenticated,
    /// Any status without a dedicated mapping.
    Other(String),
}

impl FromStr for BackendCode {
    type Err = Infallible;

    /// Accepts `NotFound`, `NOT_FOUND` and `not_found` alike.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let folded: String = name
            .chars()
            .filter(|c| *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Ok(match folded.as_str() {
            "notfound" => Self::NotFound,
            "invalidargument" => Self::InvalidArgument,
            "alreadyexists" => Self::AlreadyExists,
            "unavailable" => Self::Unavailable,
            "deadlineexceeded" => Self::DeadlineExceeded,
            "unauthenticated" | "unauthorized" => Self::Unauthenticated,
            _ => Self::Other(name.to_string()),
        })
    }
}

impl From<tonic::Code> for BackendCode {
    fn from(code: tonic::Code) -> Self {
        match code {
            tonic::Code::NotFound => Self::NotFound,
            tonic::Code::InvalidArgument => Self::InvalidArgument,
            tonic::Code::AlreadyExists => Self::AlreadyExists,
            tonic::Code::Unavailable => Self::Unavailable,
            tonic::Code::DeadlineExceeded => Self::DeadlineExceeded,
            tonic::Code::Unauthenticated => Self::Unauthenticated,
            other => Self::Other(format!("{other:?}")),
        }
    }
}

impl fmt::Display for BackendCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => f.write_str("NotFound"),
            Self::InvalidArgument => f.write_str("InvalidArgument"),
            Self::AlreadyExists => f.write_str("AlreadyExists"),
            Self::Unavailable => f.write_str("Unavailable"),
            Self::DeadlineExceeded => f.write_str("DeadlineExceeded"),
            Self::Unauthenticated => f.write_str("Unauthenticated"),
            Self::Other(name) => f.write_str(name),
        }
    }
}

/// A failure surfaced by a backend call.
#[derive(Debug, Clone, Default)]
pub struct BackendFailure {
    pub code: Option<BackendCode>,
    /// Raw description; never shown to clients unsanitized.
    pub description: String,
    /// Response headers and trailers that came back with the failure.
    pub metadata: HeaderMap,
}

impl BackendFailure {
    pub fn new(code: Option<BackendCode>, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
            metadata: HeaderMap::new(),
        }
    }

    /// Interpret a rendered error string such as
    /// `rpc error: code = NotFound desc = event not found`.
    ///
    /// Without a `code =` marker the code is inferred from well-known
    /// phrases ("deadline exceeded", "unauthorized"), or left absent.
    pub fn from_raw(raw: &str) -> Self {
        let code = match extract_code_name(raw) {
            Some(name) => name.parse().ok(),
            None => {
                let lowered = raw.to_lowercase();
                if lowered.contains("deadline exceeded") {
                    Some(BackendCode::DeadlineExceeded)
                } else if lowered.contains("unauthorized") {
                    Some(BackendCode::Unauthenticated)
                } else {
                    None
                }
            }
        };
        Self::new(code, raw)
    }
}

impl From<tonic::Status> for BackendFailure {
    fn from(status: tonic::Status) -> Self {
        Self {
            code: Some(status.code().into()),
            description: status.message().to_string(),
            metadata: status.metadata().clone().into_headers(),
        }
    }
}

/// The client-facing outcome of a failure. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslatedError {
    pub code: u16,
    pub message: String,
    pub timestamp: String,
}

impl TranslatedError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code: status.as_u16(),
            message: message.into(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

/// HTTP status for a backend code. `None` or unrecognized codes give 500.
pub fn http_status(code: Option<&BackendCode>) -> StatusCode {
    match code {
        Some(BackendCode::NotFound) => StatusCode::NOT_FOUND,
        Some(BackendCode::InvalidArgument) => StatusCode::BAD_REQUEST,
        Some(BackendCode::AlreadyExists) => StatusCode::CONFLICT,
        Some(BackendCode::Unavailable) => StatusCode::SERVICE_UNAVAILABLE,
        Some(BackendCode::DeadlineExceeded) => StatusCode::GATEWAY_TIMEOUT,
        Some(BackendCode::Unauthenticated) => StatusCode::UNAUTHORIZED,
        Some(BackendCode::Other(_)) | None => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Translate a backend failure into an HTTP status and sanitized message.
pub fn translate(failure: &BackendFailure) -> TranslatedError {
    let status = http_status(failure.code.as_ref());
    let message = match failure.code {
        Some(BackendCode::NotFound) => messages::NOT_FOUND.to_string(),
        Some(BackendCode::InvalidArgument) => {
            let description = sanitize_description(&failure.description);
            if description.is_empty() {
                messages::INVALID_ARGUMENT.to_string()
            } else {
                description
            }
        }
        Some(BackendCode::AlreadyExists) => messages::ALREADY_EXISTS.to_string(),
        Some(BackendCode::Unavailable) => messages::UNAVAILABLE.to_string(),
        Some(BackendCode::DeadlineExceeded) => messages::TIMEOUT.to_string(),
        Some(BackendCode::Unauthenticated) => messages::UNAUTHORIZED.to_string(),
        Some(BackendCode::Other(_)) | None => messages::INTERNAL.to_string(),
    };
    TranslatedError::new(status, message)
}

/// Translate a routing failure reported with `status`.
pub fn translate_routing_failure(status: StatusCode) -> TranslatedError {
    match status {
        StatusCode::NOT_FOUND => TranslatedError::new(status, messages::ENDPOINT_NOT_FOUND),
        StatusCode::METHOD_NOT_ALLOWED => TranslatedError::new(status, messages::METHOD_NOT_ALLOWED),
        _ => TranslatedError::new(StatusCode::INTERNAL_SERVER_ERROR, messages::INTERNAL),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translate_code(code: BackendCode) -> TranslatedError {
        translate(&BackendFailure::new(Some(code), "internal detail"))
    }

    #[test]
    fn test_status_table() {
        let cases = [
            (BackendCode::NotFound, 404, messages::NOT_FOUND),
            (BackendCode::AlreadyExists, 409, messages::ALREADY_EXISTS),
            (BackendCode::Unavailable, 503, messages::UNAVAILABLE),
            (BackendCode::DeadlineExceeded, 504, messages::TIMEOUT),
            (BackendCode::Unauthenticated, 401, messages::UNAUTHORIZED),
        ];
        for (code, status, message) in cases {
            let translated = translate_code(code.clone());
            assert_eq!(translated.code, status, "{code}");
            assert_eq!(translated.message, message, "{code}");
        }
    }

    #[test]
    fn test_invalid_argument_passes_sanitized_description() {
        let failure = BackendFailure::new(
            Some(BackendCode::InvalidArgument),
            r#"rpc error: code = InvalidArgument desc = "name is required""#,
        );
        let translated = translate(&failure);
        assert_eq!(translated.code, 400);
        assert_eq!(translated.message, "name is required");

        let empty = BackendFailure::new(Some(BackendCode::InvalidArgument), "  ");
        assert_eq!(translate(&empty).message, messages::INVALID_ARGUMENT);
    }

    #[test]
    fn test_unrecognized_is_500() {
        for name in ["Internal", "PermissionDenied", "Aborted", "Garbage", ""] {
            let translated = translate_code(name.parse().unwrap());
            assert_eq!(translated.code, 500, "{name}");
            assert_eq!(translated.message, messages::INTERNAL);
        }
        let translated = translate(&BackendFailure::new(None, "secret stack trace"));
        assert_eq!(translated.code, 500);
        assert!(!translated.message.contains("secret"));
    }

    #[test]
    fn test_code_names_parse_in_any_case_style() {
        assert_eq!("NotFound".parse::<BackendCode>().unwrap(), BackendCode::NotFound);
        assert_eq!("NOT_FOUND".parse::<BackendCode>().unwrap(), BackendCode::NotFound);
        assert_eq!(
            "deadline_exceeded".parse::<BackendCode>().unwrap(),
            BackendCode::DeadlineExceeded
        );
        assert_eq!(
            "Unauthorized".parse::<BackendCode>().unwrap(),
            BackendCode::Unauthenticated
        );
    }

    #[test]
    fn test_from_tonic_status() {
        let status = tonic::Status::not_found("event 123 missing");
        let failure = BackendFailure::from(status);
        assert_eq!(failure.code, Some(BackendCode::NotFound));
        assert_eq!(translate(&failure).message, messages::NOT_FOUND);

        let failure = BackendFailure::from(tonic::Status::permission_denied("nope"));
        assert_eq!(failure.code, Some(BackendCode::Other("PermissionDenied".into())));
        assert_eq!(translate(&failure).code, 500);
    }

    #[test]
    fn test_from_raw_string() {
        let failure = BackendFailure::from_raw("rpc error: code = AlreadyExists desc = dup");
        assert_eq!(failure.code, Some(BackendCode::AlreadyExists));
        assert_eq!(translate(&failure).code, 409);

        let failure = BackendFailure::from_raw("context deadline exceeded");
        assert_eq!(translate(&failure).code, 504);

        let failure = BackendFailure::from_raw("Unauthorized: token expired");
        assert_eq!(translate(&failure).code, 401);

        let failure = BackendFailure::from_raw("connection refused");
        assert_eq!(failure.code, None);
        assert_eq!(translate(&failure).code, 500);
    }

    #[test]
    fn test_routing_failures() {
        let translated = translate_routing_failure(StatusCode::NOT_FOUND);
        assert_eq!(translated.code, 404);
        assert_eq!(translated.message, messages::ENDPOINT_NOT_FOUND);

        let translated = translate_routing_failure(StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(translated.code, 405);

        assert_eq!(translate_routing_failure(StatusCode::BAD_GATEWAY).code, 500);
    }

    #[test]
    fn test_timestamp_is_rfc3339() {
        let translated = translate_code(BackendCode::NotFound);
        assert!(chrono::DateTime::parse_from_rfc3339(&translated.timestamp).is_ok());
        assert_eq!(translated.status(), StatusCode::NOT_FOUND);
    }
}
