//! Repository combining store lookups into domain objects.

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::model::{Food, FoodRow, HouseholdMeasure};
use crate::openfoodfacts::FoodSource;
use crate::store::FoodStore;

/// Data source tag the repository queries by default.
pub const DEFAULT_SOURCE_TAG: &str = "TACO";

/// Maximum number of rows returned by a prefix search.
pub const SEARCH_RESULT_LIMIT: u32 = 25;

/// Normalize a display name into its lookup key: trimmed, lowercase.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Read-only access to foods and household measures.
#[derive(Debug)]
pub struct FoodRepository {
    store: FoodStore,
    source_tag: String,
}

impl FoodRepository {
    pub fn new(store: FoodStore, source_tag: impl Into<String>) -> Self {
        Self {
            store,
            source_tag: source_tag.into(),
        }
    }

    /// The canonical source label attached to every record this repository
    /// returns.
    pub fn source_tag(&self) -> &str {
        &self.source_tag
    }

    pub fn store(&self) -> &FoodStore {
        &self.store
    }

    /// Search foods whose normalized name begins with the given prefix.
    ///
    /// An empty or whitespace-only prefix returns an empty list without
    /// touching the store.
    pub fn search_by_name_prefix(&self, prefix: &str) -> Result<Vec<FoodRow>> {
        let normalized = normalize_name(prefix);
        if normalized.is_empty() {
            return Ok(Vec::new());
        }

        self.store
            .query_foods_by_prefix(&self.source_tag, &normalized, SEARCH_RESULT_LIMIT)
    }

    /// Fetch a food by identifier with its household measures attached.
    pub fn get_with_measures(&self, food_id: &str) -> Result<Food> {
        let row = self
            .store
            .get_food(food_id)?
            .ok_or_else(|| Error::FoodNotFound {
                id: food_id.to_string(),
            })?;

        let mut food = row.into_food(&self.source_tag);
        food.household_measures = Some(self.measures_for_food(food_id));
        Ok(food)
    }

    /// Household measures for a food, seeded with the synthetic gram
    /// default.
    ///
    /// A store failure degrades to the partial list built so far instead of
    /// propagating: callers depend on the result always holding at least one
    /// measure.
    pub fn measures_for_food(&self, food_id: &str) -> Vec<HouseholdMeasure> {
        let mut measures = vec![HouseholdMeasure::gram_default()];

        match self.store.query_measures(food_id) {
            Ok(rows) => {
                debug!(food_id, count = rows.len(), "measure rows fetched");
                measures.extend(rows.into_iter().map(HouseholdMeasure::from));
            }
            Err(error) => {
                warn!(food_id, error = %error, "measures query failed, returning partial list");
            }
        }

        measures
    }
}

impl FoodSource for FoodRepository {
    fn search(&self, term: &str) -> Result<Vec<Food>> {
        let rows = self.search_by_name_prefix(term)?;
        Ok(rows
            .into_iter()
            .map(|row| row.into_food(&self.source_tag))
            .collect())
    }

    fn label(&self) -> &str {
        &self.source_tag
    }
}
