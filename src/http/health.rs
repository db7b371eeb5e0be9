//! Liveness and readiness endpoints.
//!
//! Served outside the validation gate and CORS policy. Any method other
//! than GET answers 405 in the standard error envelope.

use axum::{extract::State, response::IntoResponse, Json};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::http::response::ApiError;
use crate::http::server::AppState;

pub const SERVICE_NAME: &str = "osmi-gateway";

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub service: &'static str,
    pub timestamp: String,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ReadinessReport {
    pub status: &'static str,
    pub service: &'static str,
    pub timestamp: String,
    pub checks: ReadinessChecks,
}

#[derive(Debug, Serialize)]
pub struct ReadinessChecks {
    pub api: &'static str,
    pub backend: String,
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub async fn health() -> Json<HealthReport> {
    Json(HealthReport {
        status: "healthy",
        service: SERVICE_NAME,
        timestamp: now(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Readiness does not probe the backend; the channel connects lazily.
pub async fn ready(State(state): State<AppState>) -> Json<ReadinessReport> {
    Json(ReadinessReport {
        status: "ready",
        service: SERVICE_NAME,
        timestamp: now(),
        checks: ReadinessChecks {
            api: "healthy",
            backend: state.config.backend.endpoint_uri(),
        },
    })
}

pub async fn method_not_allowed() -> impl IntoResponse {
    ApiError::method_not_allowed()
}
