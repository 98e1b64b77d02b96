//! Application state for HTTP microservices.
//!
//! Handlers access the food repository and the configured search source
//! through this state. It is cheaply cloneable and shared via axum's
//! `State` extractor.

use std::path::Path;
use std::sync::Arc;

use nutri_lib::{Error as LibError, FoodRepository, FoodSource, FoodStore, DEFAULT_SOURCE_TAG};

/// Error during application state initialization.
#[derive(Debug)]
pub enum AppStateError {
    /// Failed to open the foods store.
    StoreOpen(LibError),
}

impl std::fmt::Display for AppStateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StoreOpen(e) => write!(f, "failed to open food store: {}", e),
        }
    }
}

impl std::error::Error for AppStateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::StoreOpen(e) => Some(e),
        }
    }
}

impl From<LibError> for AppStateError {
    fn from(err: LibError) -> Self {
        Self::StoreOpen(err)
    }
}

/// Shared application state for all axum handlers.
#[derive(Clone)]
pub struct AppState {
    repository: Arc<FoodRepository>,
    search_source: Arc<dyn FoodSource>,
}

impl AppState {
    /// Open the store at `db_path` and build state with the store-backed
    /// repository serving searches.
    pub fn load(db_path: impl AsRef<Path>) -> Result<Self, AppStateError> {
        let db_path = db_path.as_ref();

        tracing::info!(path = %db_path.display(), "opening food store");
        let store = FoodStore::open(db_path)?;

        let foods = store.count_foods().unwrap_or(0);
        tracing::info!(foods, "food store opened");

        Ok(Self::from_repository(FoodRepository::new(
            store,
            DEFAULT_SOURCE_TAG,
        )))
    }

    /// Build state from a pre-constructed repository.
    pub fn from_repository(repository: FoodRepository) -> Self {
        let repository = Arc::new(repository);
        Self {
            search_source: repository.clone(),
            repository,
        }
    }

    /// Replace the search source, keeping identifier lookups on the store.
    pub fn with_search_source(self, source: Arc<dyn FoodSource>) -> Self {
        Self {
            repository: self.repository,
            search_source: source,
        }
    }

    pub fn repository(&self) -> &FoodRepository {
        &self.repository
    }

    /// Arc handle for moving into blocking tasks.
    pub fn repository_arc(&self) -> Arc<FoodRepository> {
        self.repository.clone()
    }

    /// The source serving `GET /api/foods` searches.
    pub fn search_source(&self) -> Arc<dyn FoodSource> {
        self.search_source.clone()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("source_tag", &self.repository.source_tag())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nutri_lib::fixtures;

    #[test]
    fn test_load_missing_database() {
        let result = AppState::load("/nonexistent/foods.db");
        assert!(matches!(result, Err(AppStateError::StoreOpen(_))));
    }

    #[test]
    fn test_load_and_clone_share_repository() {
        let (_dir, path) = fixtures::fixture_database();
        let state1 = AppState::load(&path).unwrap();
        let state2 = state1.clone();

        assert_eq!(
            state1.repository().source_tag(),
            state2.repository().source_tag()
        );
    }

    #[test]
    fn test_default_search_source_is_the_repository() {
        let (_dir, path) = fixtures::fixture_database();
        let state = AppState::load(&path).unwrap();

        let foods = state.search_source().search("arroz").unwrap();
        assert_eq!(foods.len(), 1);
        assert_eq!(foods[0].source, "TACO");
    }

    #[test]
    fn test_app_state_error_display() {
        let err = AppStateError::StoreOpen(LibError::UnsupportedSchema);
        assert!(err.to_string().contains("failed to open food store"));
    }
}
