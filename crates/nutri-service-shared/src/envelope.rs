//! Uniform JSON error envelope.
//!
//! Every failure response carries the shape `{"statusCode": int,
//! "message": string}`. Messages are deliberately generic: internal store
//! and query details stay in the logs.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use nutri_lib::Error as LibError;

/// Error envelope returned on every failure response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    /// HTTP status code, repeated in the body.
    #[serde(rename = "statusCode")]
    pub status_code: u16,

    /// Human-readable message, safe to show to callers.
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status_code: status.as_u16(),
            message: message.into(),
        }
    }

    /// 400 Bad Request for missing or invalid parameters.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// 404 Not Found for unknown identifiers.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// 500 Internal Server Error with an opaque message.
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status_code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// Map library errors to the envelope.
///
/// Only not-found is surfaced distinctly; every other failure collapses to
/// an opaque 500 so store details never leak.
pub fn from_lib_error(error: &LibError) -> ApiError {
    match error {
        LibError::FoodNotFound { .. } => ApiError::not_found("Alimento não encontrado"),
        _ => ApiError::internal_error("Erro ao buscar dados dos alimentos"),
    }
}
