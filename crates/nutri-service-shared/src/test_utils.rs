//! Test utilities for microservice handler testing.
//!
//! Builds an [`AppState`] over a fixture database. The temporary directory
//! holding the database lives inside the returned context; dropping the
//! context removes the files.

use nutri_lib::fixtures;
use tempfile::TempDir;

use crate::state::AppState;

/// Fixture state plus the directory keeping its database alive.
pub struct TestContext {
    pub state: AppState,
    _dir: TempDir,
}

/// Build a fresh fixture state.
///
/// # Panics
///
/// Panics if the fixture database cannot be created or opened. This
/// indicates a test configuration issue.
pub fn test_state() -> TestContext {
    let (dir, path) = fixtures::fixture_database();
    let state = AppState::load(&path)
        .unwrap_or_else(|e| panic!("failed to load fixture state from {:?}: {}", path, e));

    TestContext { state, _dir: dir }
}

/// Known fixture identifiers, re-exported for handler tests.
pub use nutri_lib::fixtures::{ARROZ_ID, BANANA_ID, FEIJAO_ID, SOURCE_TAG};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_loads_successfully() {
        let context = test_state();
        assert_eq!(context.state.repository().source_tag(), SOURCE_TAG);
    }

    #[test]
    fn test_state_contains_expected_foods() {
        let context = test_state();
        let food = context.state.repository().get_with_measures(ARROZ_ID);
        assert!(food.is_ok(), "fixture should contain {}", ARROZ_ID);
    }
}
