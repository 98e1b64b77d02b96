//! SQLite-backed food store.
//!
//! The store is consumed through two primitives only: query-by-condition
//! (prefix search against the `food_name_idx` secondary index, measures
//! scoped to a food id) and get-by-key. Each operation opens a short-lived
//! read connection, so a [`FoodStore`] handle is safe for unlimited
//! concurrent use.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OpenFlags, Row};
use tracing::debug;

use crate::error::{Error, Result};
use crate::model::{FoodRow, MeasureRow};

const FOOD_COLUMNS: &str = "food_id, data_source, normalized_name, original_name, \
     energy_kcal, protein_g, carbohydrate_g, fat_g, fiber_g";

const MEASURE_COLUMNS: &str = "food_id, measure_name, measure_quantity, measure_weight_g";

/// Handle to the foods database.
#[derive(Debug, Clone)]
pub struct FoodStore {
    db_path: PathBuf,
}

impl FoodStore {
    /// Open a store, verifying the file exists and carries the expected
    /// schema.
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref();

        if !db_path.exists() {
            return Err(Error::DatabaseNotFound {
                path: db_path.to_path_buf(),
            });
        }

        let store = Self {
            db_path: db_path.to_path_buf(),
        };
        store.verify_schema()?;
        Ok(store)
    }

    fn connection(&self) -> Result<Connection> {
        let connection = Connection::open_with_flags(
            &self.db_path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(connection)
    }

    fn verify_schema(&self) -> Result<()> {
        let connection = self.connection()?;

        if !table_exists(&connection, "foods")?
            || !table_exists(&connection, "household_measures")?
        {
            return Err(Error::UnsupportedSchema);
        }

        if !table_has_columns(
            &connection,
            "foods",
            &["food_id", "data_source", "normalized_name", "original_name"],
        )? {
            return Err(Error::UnsupportedSchema);
        }

        if !table_has_columns(
            &connection,
            "household_measures",
            &["food_id", "measure_name", "measure_weight_g"],
        )? {
            return Err(Error::UnsupportedSchema);
        }

        Ok(())
    }

    /// Query foods whose normalized name begins with the given prefix,
    /// scoped to one data source and capped at `limit` rows.
    ///
    /// The caller is responsible for normalizing the prefix; the store only
    /// escapes it for the begins-with condition.
    pub fn query_foods_by_prefix(
        &self,
        source: &str,
        normalized_prefix: &str,
        limit: u32,
    ) -> Result<Vec<FoodRow>> {
        let connection = self.connection()?;

        let sql = format!(
            "SELECT {FOOD_COLUMNS} FROM foods \
             WHERE data_source = ?1 AND normalized_name LIKE ?2 ESCAPE '\\' \
             ORDER BY normalized_name LIMIT ?3"
        );

        debug!(source, prefix = normalized_prefix, limit, "querying foods by prefix");

        let pattern = format!("{}%", escape_like(normalized_prefix));
        let mut stmt = connection.prepare(&sql)?;
        let rows = stmt.query_map(params![source, pattern, limit], row_to_food)?;

        let mut foods = Vec::new();
        for entry in rows {
            foods.push(entry?);
        }

        debug!(count = foods.len(), "prefix query returned rows");
        Ok(foods)
    }

    /// Fetch a single food row by identifier.
    pub fn get_food(&self, food_id: &str) -> Result<Option<FoodRow>> {
        let connection = self.connection()?;

        let sql = format!("SELECT {FOOD_COLUMNS} FROM foods WHERE food_id = ?1");
        let mut stmt = connection.prepare(&sql)?;
        let mut rows = stmt.query_map(params![food_id], row_to_food)?;

        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    /// Query measure rows scoped to a food identifier.
    pub fn query_measures(&self, food_id: &str) -> Result<Vec<MeasureRow>> {
        let connection = self.connection()?;

        let sql = format!(
            "SELECT {MEASURE_COLUMNS} FROM household_measures WHERE food_id = ?1"
        );
        let mut stmt = connection.prepare(&sql)?;
        let rows = stmt.query_map(params![food_id], row_to_measure)?;

        let mut measures = Vec::new();
        for entry in rows {
            measures.push(entry?);
        }
        Ok(measures)
    }

    /// Count the food rows, used by readiness probes.
    pub fn count_foods(&self) -> Result<i64> {
        let connection = self.connection()?;
        let count = connection.query_row("SELECT COUNT(*) FROM foods", [], |row| row.get(0))?;
        Ok(count)
    }
}

fn row_to_food(row: &Row<'_>) -> rusqlite::Result<FoodRow> {
    Ok(FoodRow {
        food_id: row.get(0)?,
        data_source: row.get(1)?,
        normalized_name: row.get(2)?,
        original_name: row.get(3)?,
        energy_kcal: row.get::<_, Option<f64>>(4)?.unwrap_or(0.0),
        protein_g: row.get::<_, Option<f64>>(5)?.unwrap_or(0.0),
        carbohydrate_g: row.get::<_, Option<f64>>(6)?.unwrap_or(0.0),
        fat_g: row.get::<_, Option<f64>>(7)?.unwrap_or(0.0),
        fiber_g: row.get::<_, Option<f64>>(8)?.unwrap_or(0.0),
    })
}

fn row_to_measure(row: &Row<'_>) -> rusqlite::Result<MeasureRow> {
    Ok(MeasureRow {
        food_id: row.get(0)?,
        measure_name: row.get(1)?,
        measure_quantity: row.get(2)?,
        measure_weight_g: row.get::<_, Option<f64>>(3)?.unwrap_or(0.0),
    })
}

/// Escape LIKE wildcards so a user-supplied prefix matches literally.
fn escape_like(prefix: &str) -> String {
    let mut escaped = String::with_capacity(prefix.len());
    for c in prefix.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn table_exists(connection: &Connection, table: &str) -> Result<bool> {
    let mut stmt = connection
        .prepare("SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1 LIMIT 1")?;
    let mut rows = stmt.query([table])?;
    Ok(rows.next()?.is_some())
}

fn table_has_columns(connection: &Connection, table: &str, required: &[&str]) -> Result<bool> {
    let pragma = format!("PRAGMA table_info('{table}')");
    let mut stmt = connection.prepare(&pragma)?;
    let mut rows = stmt.query([])?;

    let mut columns = Vec::new();
    while let Some(row) = rows.next()? {
        let name: String = row.get(1)?;
        columns.push(name);
    }

    Ok(required.iter().all(|required| {
        columns
            .iter()
            .any(|column| column.eq_ignore_ascii_case(required))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_open_missing_file() {
        let result = FoodStore::open("/nonexistent/foods.db");
        assert!(matches!(result, Err(Error::DatabaseNotFound { .. })));
    }

    #[test]
    fn test_open_rejects_unknown_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.db");
        Connection::open(&path)
            .unwrap()
            .execute("CREATE TABLE other (id TEXT)", [])
            .unwrap();

        let result = FoodStore::open(&path);
        assert!(matches!(result, Err(Error::UnsupportedSchema)));
    }

    #[test]
    fn test_query_foods_by_prefix() {
        let (_dir, store) = fixtures::fixture_store();

        let rows = store
            .query_foods_by_prefix(fixtures::SOURCE_TAG, "arroz", 25)
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].food_id, fixtures::ARROZ_ID);
        assert_eq!(rows[0].original_name, "Arroz branco cozido");
    }

    #[test]
    fn test_query_foods_scoped_to_source() {
        let (_dir, store) = fixtures::fixture_store();

        let rows = store.query_foods_by_prefix("OTHER", "arroz", 25).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_query_foods_escapes_wildcards() {
        let (_dir, store) = fixtures::fixture_store();

        // A bare "%" would otherwise match every row.
        let rows = store
            .query_foods_by_prefix(fixtures::SOURCE_TAG, "%", 25)
            .unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_query_foods_respects_limit() {
        let (_dir, store) = fixtures::fixture_store();

        let rows = store
            .query_foods_by_prefix(fixtures::SOURCE_TAG, "", 2)
            .unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_get_food_found() {
        let (_dir, store) = fixtures::fixture_store();

        let row = store.get_food(fixtures::ARROZ_ID).unwrap();
        assert_eq!(row.unwrap().normalized_name, "arroz branco cozido");
    }

    #[test]
    fn test_get_food_missing() {
        let (_dir, store) = fixtures::fixture_store();

        let row = store.get_food("taco-999").unwrap();
        assert!(row.is_none());
    }

    #[test]
    fn test_query_measures() {
        let (_dir, store) = fixtures::fixture_store();

        let measures = store.query_measures(fixtures::ARROZ_ID).unwrap();
        assert_eq!(measures.len(), 1);
        assert_eq!(measures[0].measure_name, "colher de sopa");
        assert_eq!(measures[0].measure_quantity.as_deref(), Some("1"));
        assert_eq!(measures[0].measure_weight_g, 15.0);
    }

    #[test]
    fn test_query_measures_empty() {
        let (_dir, store) = fixtures::fixture_store();

        let measures = store.query_measures(fixtures::BANANA_ID).unwrap();
        assert!(measures.is_empty());
    }

    #[test]
    fn test_null_nutrients_default_to_zero() {
        let (_dir, store) = fixtures::fixture_store();

        let row = store.get_food(fixtures::BANANA_ID).unwrap().unwrap();
        assert_eq!(row.fiber_g, 0.0);
    }

    #[test]
    fn test_count_foods() {
        let (_dir, store) = fixtures::fixture_store();
        assert_eq!(store.count_foods().unwrap(), 3);
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("arroz"), "arroz");
        assert_eq!(escape_like("10%_"), "10\\%\\_");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
    }
}
