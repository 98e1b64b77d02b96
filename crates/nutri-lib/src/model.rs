//! Domain model for food records and household measures.
//!
//! [`Food`] and [`HouseholdMeasure`] are the public JSON shapes returned by
//! the HTTP service. [`FoodRow`] and [`MeasureRow`] mirror the raw store
//! rows and are mapped into the public shapes by the repository. Every value
//! is constructed fresh per request and never mutated afterwards.

use serde::{Deserialize, Serialize};

/// A food record with nutritional values per 100g.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Food {
    /// Unique food identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Which backing origin produced this record (e.g. "TACO").
    pub source: String,
    /// Energy in kcal per 100g.
    pub energy_kcal: f64,
    /// Protein in grams per 100g.
    pub protein_g: f64,
    /// Carbohydrate in grams per 100g.
    pub carbohydrate_g: f64,
    /// Fat in grams per 100g.
    pub fat_g: f64,
    /// Fiber in grams per 100g.
    pub fiber_g: f64,
    /// Household measures, when loaded alongside the record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub household_measures: Option<Vec<HouseholdMeasure>>,
}

/// A colloquial quantity (tablespoon, cup) mapped to a gram weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseholdMeasure {
    /// Unit name, e.g. "colher de sopa".
    pub measure_name: String,
    /// Computed outward display string, e.g. "1 colher de sopa".
    pub display_name: String,
    /// Gram weight of one measure.
    pub gram_equivalent: f64,
}

impl HouseholdMeasure {
    /// The synthetic gram measure every food carries as its first entry.
    pub fn gram_default() -> Self {
        Self {
            measure_name: "grama".to_string(),
            display_name: "Grama".to_string(),
            gram_equivalent: 1.0,
        }
    }
}

impl From<MeasureRow> for HouseholdMeasure {
    fn from(row: MeasureRow) -> Self {
        let display_name = match row.measure_quantity.as_deref() {
            Some(quantity) if !quantity.trim().is_empty() => {
                format!("{} {}", quantity.trim(), row.measure_name)
            }
            _ => row.measure_name.clone(),
        };

        Self {
            measure_name: row.measure_name,
            display_name,
            gram_equivalent: row.measure_weight_g,
        }
    }
}

/// Raw food row as stored in the `foods` table.
#[derive(Debug, Clone, PartialEq)]
pub struct FoodRow {
    pub food_id: String,
    pub data_source: String,
    pub normalized_name: String,
    pub original_name: String,
    pub energy_kcal: f64,
    pub protein_g: f64,
    pub carbohydrate_g: f64,
    pub fat_g: f64,
    pub fiber_g: f64,
}

impl FoodRow {
    /// Map a store row into the public shape.
    ///
    /// The `source` tag is taken from the repository configuration rather
    /// than the row so every response carries one canonical label.
    pub fn into_food(self, source: &str) -> Food {
        Food {
            id: self.food_id,
            name: self.original_name,
            source: source.to_string(),
            energy_kcal: self.energy_kcal,
            protein_g: self.protein_g,
            carbohydrate_g: self.carbohydrate_g,
            fat_g: self.fat_g,
            fiber_g: self.fiber_g,
            household_measures: None,
        }
    }
}

/// Raw measure row as stored in the `household_measures` table.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasureRow {
    pub food_id: String,
    pub measure_name: String,
    pub measure_quantity: Option<String>,
    pub measure_weight_g: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> FoodRow {
        FoodRow {
            food_id: "taco-001".to_string(),
            data_source: "TACO".to_string(),
            normalized_name: "arroz branco cozido".to_string(),
            original_name: "Arroz branco cozido".to_string(),
            energy_kcal: 128.0,
            protein_g: 2.5,
            carbohydrate_g: 28.1,
            fat_g: 0.2,
            fiber_g: 1.6,
        }
    }

    #[test]
    fn test_food_row_into_food_uses_original_name_and_tag() {
        let food = sample_row().into_food("TACO");

        assert_eq!(food.id, "taco-001");
        assert_eq!(food.name, "Arroz branco cozido");
        assert_eq!(food.source, "TACO");
        assert_eq!(food.energy_kcal, 128.0);
        assert!(food.household_measures.is_none());
    }

    #[test]
    fn test_food_serialization_omits_missing_measures() {
        let food = sample_row().into_food("TACO");
        let json = serde_json::to_string(&food).unwrap();

        assert!(json.contains("\"energy_kcal\":128.0"));
        assert!(!json.contains("household_measures"));
    }

    #[test]
    fn test_food_json_round_trip() {
        let mut food = sample_row().into_food("TACO");
        food.household_measures = Some(vec![
            HouseholdMeasure::gram_default(),
            HouseholdMeasure {
                measure_name: "colher de sopa".to_string(),
                display_name: "1 colher de sopa".to_string(),
                gram_equivalent: 15.0,
            },
        ]);

        let json = serde_json::to_string(&food).unwrap();
        let parsed: Food = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, food);
    }

    #[test]
    fn test_gram_default() {
        let measure = HouseholdMeasure::gram_default();
        assert_eq!(measure.measure_name, "grama");
        assert_eq!(measure.display_name, "Grama");
        assert_eq!(measure.gram_equivalent, 1.0);
    }

    #[test]
    fn test_measure_display_name_with_quantity() {
        let measure = HouseholdMeasure::from(MeasureRow {
            food_id: "taco-001".to_string(),
            measure_name: "colher de sopa".to_string(),
            measure_quantity: Some("1".to_string()),
            measure_weight_g: 15.0,
        });

        assert_eq!(measure.display_name, "1 colher de sopa");
        assert_eq!(measure.gram_equivalent, 15.0);
    }

    #[test]
    fn test_measure_display_name_without_quantity() {
        let measure = HouseholdMeasure::from(MeasureRow {
            food_id: "taco-001".to_string(),
            measure_name: "fatia".to_string(),
            measure_quantity: None,
            measure_weight_g: 26.0,
        });

        assert_eq!(measure.display_name, "fatia");
    }

    #[test]
    fn test_measure_display_name_blank_quantity() {
        let measure = HouseholdMeasure::from(MeasureRow {
            food_id: "taco-001".to_string(),
            measure_name: "fatia".to_string(),
            measure_quantity: Some("  ".to_string()),
            measure_weight_g: 26.0,
        });

        assert_eq!(measure.display_name, "fatia");
    }
}
