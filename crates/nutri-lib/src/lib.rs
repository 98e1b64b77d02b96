//! Nutri library entry points.
//!
//! This crate exposes the domain model for food records and household
//! measures, the SQLite-backed food store, the repository that combines
//! store lookups into domain objects, and the OpenFoodFacts client used as
//! an alternate search source. Higher-level consumers (the HTTP service)
//! should only depend on the types exported here instead of reimplementing
//! behavior.

#![deny(warnings)]

pub mod error;
pub mod model;
pub mod openfoodfacts;
pub mod repository;
pub mod store;

#[cfg(any(test, feature = "test-utils"))]
pub mod fixtures;

pub use error::{Error, Result};
pub use model::{Food, FoodRow, HouseholdMeasure, MeasureRow};
pub use openfoodfacts::{FoodSource, NutrientValue, OpenFoodFactsClient};
pub use repository::{normalize_name, FoodRepository, DEFAULT_SOURCE_TAG, SEARCH_RESULT_LIMIT};
pub use store::FoodStore;
