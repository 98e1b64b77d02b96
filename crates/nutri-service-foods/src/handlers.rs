//! HTTP handlers for the foods service.
//!
//! Handlers validate input at the boundary, run the blocking library calls
//! on the blocking pool, and map results to the public JSON shapes. Failure
//! responses always carry the `{statusCode, message}` envelope.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tokio::task;
use tracing::{error, info, warn};

use nutri_lib::Error as LibError;
use nutri_service_shared::{
    from_lib_error, record_food_lookup_failed, record_food_search, ApiError, AppState,
};

/// Query parameters for `GET /api/foods`.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub search: Option<String>,
}

/// Handle `GET /api/foods`.
pub async fn search_foods(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Response {
    let term = params.search.unwrap_or_default();
    if term.trim().is_empty() {
        record_food_lookup_failed("validation_error", "search_foods");
        return ApiError::bad_request("Parâmetro 'search' é obrigatório").into_response();
    }

    info!(term = %term, "searching foods");

    let source = state.search_source();
    let label = source.label().to_string();

    let result = task::spawn_blocking(move || source.search(&term)).await;

    match result {
        Ok(Ok(foods)) => {
            record_food_search(&label, foods.len());
            info!(count = foods.len(), "search completed");
            (StatusCode::OK, Json(foods)).into_response()
        }
        Ok(Err(error)) => {
            error!(error = %error, "food search failed");
            record_food_lookup_failed("source_error", "search_foods");
            from_lib_error(&error).into_response()
        }
        Err(join_error) => {
            error!(error = %join_error, "food search task failed");
            ApiError::internal_error("Erro ao buscar dados dos alimentos").into_response()
        }
    }
}

/// Handle `GET /api/foods/{foodId}`.
pub async fn get_food_with_measures(
    State(state): State<AppState>,
    Path(food_id): Path<String>,
) -> Response {
    if food_id.trim().is_empty() {
        record_food_lookup_failed("validation_error", "get_food");
        return ApiError::bad_request("Parâmetro 'foodId' é obrigatório").into_response();
    }

    info!(food_id = %food_id, "fetching food with measures");

    let repository = state.repository_arc();
    let id = food_id.clone();
    let result = task::spawn_blocking(move || repository.get_with_measures(&id)).await;

    match result {
        Ok(Ok(food)) => (StatusCode::OK, Json(food)).into_response(),
        Ok(Err(error)) => {
            match &error {
                LibError::FoodNotFound { .. } => {
                    warn!(food_id = %food_id, "food not found");
                    record_food_lookup_failed("not_found", "get_food");
                }
                _ => {
                    error!(food_id = %food_id, error = %error, "food lookup failed");
                    record_food_lookup_failed("store_error", "get_food");
                }
            }
            from_lib_error(&error).into_response()
        }
        Err(join_error) => {
            error!(error = %join_error, "food lookup task failed");
            ApiError::internal_error("Erro ao buscar dados dos alimentos").into_response()
        }
    }
}

/// Handle `GET /api/foods/{foodId}/measures`.
///
/// The measures lookup degrades on store failure instead of erroring, so
/// this handler answers 200 with at least the synthetic gram measure for
/// any non-blank identifier.
pub async fn get_food_measures(
    State(state): State<AppState>,
    Path(food_id): Path<String>,
) -> Response {
    if food_id.trim().is_empty() {
        record_food_lookup_failed("validation_error", "get_measures");
        return ApiError::bad_request("Parâmetro 'foodId' é obrigatório").into_response();
    }

    info!(food_id = %food_id, "fetching household measures");

    let repository = state.repository_arc();
    let id = food_id.clone();
    let result = task::spawn_blocking(move || repository.measures_for_food(&id)).await;

    match result {
        Ok(measures) => (StatusCode::OK, Json(measures)).into_response(),
        Err(join_error) => {
            error!(error = %join_error, "measures task failed");
            ApiError::internal_error("Erro ao buscar dados dos alimentos").into_response()
        }
    }
}
