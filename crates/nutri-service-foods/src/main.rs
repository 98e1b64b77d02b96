//! Nutri food lookup HTTP microservice.
//!
//! This service provides a REST API for searching food nutritional records
//! and their household measure conversions.
//!
//! # Endpoints
//!
//! - `GET /api/foods?search=<term>` - Prefix search over food names
//! - `GET /api/foods/{foodId}` - Fetch one food with household measures
//! - `GET /api/foods/{foodId}/measures` - Household measures only
//! - `GET /metrics` - Prometheus metrics endpoint
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//!
//! # Configuration
//!
//! - `NUTRI_DATA_PATH` - Path to the foods.db file (required)
//! - `FOOD_SOURCE` - Search source: "store" (default) or "openfoodfacts"
//! - `CORS_ALLOWED_ORIGIN` - Allowed CORS origin (default: http://localhost:4200)
//! - `RUST_LOG` - Log level (default: info)
//! - `LOG_FORMAT` - Log format: json (default) or text
//! - `SERVICE_PORT` - HTTP port (default: 8080)

mod handlers;

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    response::IntoResponse,
    routing::get,
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use nutri_lib::OpenFoodFactsClient;
use nutri_service_shared::{
    health_live, health_ready, init_logging, init_metrics, metrics_handler, ApiError, AppState,
    LoggingConfig, MetricsConfig, MetricsError, MetricsLayer,
};

const DEFAULT_CORS_ORIGIN: &str = "http://localhost:4200";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (reads LOG_FORMAT from environment)
    let logging_config = LoggingConfig::from_env().with_service("foods");
    init_logging(&logging_config);

    // Initialize metrics
    let metrics_config = MetricsConfig::from_env();
    match init_metrics(&metrics_config) {
        Ok(()) => {}
        Err(MetricsError::Disabled) => info!("metrics disabled by configuration"),
        // Log but don't fail - metrics are optional
        Err(e) => warn!(error = %e, "failed to initialize metrics, continuing without metrics"),
    }

    // Load configuration from environment
    let data_path = env::var("NUTRI_DATA_PATH").unwrap_or_else(|_| "/data/foods.db".to_string());
    let port: u16 = env::var("SERVICE_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    let cors_origin =
        env::var("CORS_ALLOWED_ORIGIN").unwrap_or_else(|_| DEFAULT_CORS_ORIGIN.to_string());

    info!(data_path = %data_path, port = port, "starting foods service");

    // Load application state
    let state = AppState::load(&data_path).map_err(|e| {
        error!(error = %e, path = %data_path, "failed to load application state");
        e
    })?;

    // Pick the search source; identifier lookups always use the store
    let state = match env::var("FOOD_SOURCE").as_deref() {
        Ok("openfoodfacts") => {
            // The blocking HTTP client must be built off the async runtime
            let client = tokio::task::spawn_blocking(OpenFoodFactsClient::new).await??;
            info!("search source: OpenFoodFacts");
            state.with_search_source(Arc::new(client))
        }
        _ => {
            info!(
                source = state.repository().source_tag(),
                "search source: local store"
            );
            state
        }
    };

    let app = app(state, &cors_origin);

    // Bind and serve
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(addr = %addr, "listening on");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the router with all middleware layers attached.
fn app(state: AppState, cors_origin: &str) -> Router {
    Router::new()
        .route("/api/foods", get(handlers::search_foods))
        .route("/api/foods/{food_id}", get(handlers::get_food_with_measures))
        .route(
            "/api/foods/{food_id}/measures",
            get(handlers::get_food_measures),
        )
        .route("/metrics", get(metrics_handler))
        .route("/health/live", get(health_live))
        .route("/health/ready", get(health_ready))
        .layer(cors_layer(cors_origin))
        .layer(TraceLayer::new_for_http())
        .layer(MetricsLayer)
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(state)
}

/// Cross-origin policy: one configured origin with credentials enabled.
fn cors_layer(origin: &str) -> CorsLayer {
    let origin = origin
        .parse::<HeaderValue>()
        .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_CORS_ORIGIN));

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::ACCEPT,
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-csrf-token"),
        ])
        .allow_credentials(true)
        .max_age(Duration::from_secs(300))
}

/// Convert an unhandled handler fault into the 500 envelope instead of
/// dropping the connection.
fn panic_response(_err: Box<dyn std::any::Any + Send + 'static>) -> axum::response::Response {
    error!("request handler panicked");
    ApiError::internal_error("Erro interno do servidor").into_response()
}
