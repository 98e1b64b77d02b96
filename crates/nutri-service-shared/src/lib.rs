//! Shared infrastructure for Nutri HTTP microservices.
//!
//! This crate provides the HTTP glue used by the foods service:
//!
//! - [`AppState`]: search source and repository handles for axum handlers
//! - [`ApiError`]: the uniform `{statusCode, message}` error envelope
//! - [`logging`]: structured JSON logging setup
//! - [`metrics`]: Prometheus metrics infrastructure
//! - [`middleware`]: request tracking and metrics middleware
//! - [`health`]: liveness/readiness probe handlers
//!
//! Business logic lives in `nutri-lib`; handlers parse input, call the
//! library, and format responses.
//!
//! # Testing Support
//!
//! The [`test_utils`] module provides a pre-seeded fixture state for handler
//! testing. Enable the `test-utils` feature to access it from dependent
//! crates.

#![deny(warnings)]

mod envelope;
mod health;
pub mod logging;
pub mod metrics;
pub mod middleware;
mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use envelope::{from_lib_error, ApiError};
pub use health::{health_live, health_ready, HealthStatus};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use metrics::{
    init_metrics, metrics_handler, record_food_lookup_failed, record_food_search, MetricsConfig,
    MetricsError,
};
pub use middleware::{extract_or_generate_request_id, MetricsLayer, RequestId};
pub use state::{AppState, AppStateError};
