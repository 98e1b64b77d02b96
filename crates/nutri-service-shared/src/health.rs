//! Health check handlers for liveness and readiness probes.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::AppState;

/// Health status response for liveness and readiness probes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// "ok" or "not_ready: <reason>".
    pub status: String,

    /// Service name for identification.
    pub service: String,

    /// Service version from build-time.
    pub version: String,

    /// Number of foods in the store (readiness only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foods_loaded: Option<i64>,
}

impl HealthStatus {
    pub fn alive(service: &str, version: &str) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.to_string(),
            version: version.to_string(),
            foods_loaded: None,
        }
    }

    pub fn ready(service: &str, version: &str, foods: i64) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.to_string(),
            version: version.to_string(),
            foods_loaded: Some(foods),
        }
    }

    pub fn not_ready(service: &str, version: &str, reason: &str) -> Self {
        Self {
            status: format!("not_ready: {}", reason),
            service: service.to_string(),
            version: version.to_string(),
            foods_loaded: None,
        }
    }
}

/// Liveness probe handler. Returns 200 OK whenever the process is running.
pub async fn health_live() -> impl IntoResponse {
    let status = HealthStatus::alive(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    (StatusCode::OK, Json(status))
}

/// Readiness probe handler. Verifies the store answers a trivial query.
pub async fn health_ready(State(state): State<AppState>) -> Response {
    let service = env!("CARGO_PKG_NAME");
    let version = env!("CARGO_PKG_VERSION");

    let repository = state.repository_arc();
    let count = tokio::task::spawn_blocking(move || repository.store().count_foods()).await;

    match count {
        Ok(Ok(foods)) => {
            let status = HealthStatus::ready(service, version, foods);
            (StatusCode::OK, Json(status)).into_response()
        }
        Ok(Err(error)) => {
            tracing::warn!(error = %error, "readiness probe failed");
            let status = HealthStatus::not_ready(service, version, "store unreachable");
            (StatusCode::SERVICE_UNAVAILABLE, Json(status)).into_response()
        }
        Err(error) => {
            tracing::error!(error = %error, "readiness probe task failed");
            let status = HealthStatus::not_ready(service, version, "probe task failed");
            (StatusCode::SERVICE_UNAVAILABLE, Json(status)).into_response()
        }
    }
}
