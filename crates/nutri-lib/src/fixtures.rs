//! Fixture databases for tests.
//!
//! Builds a small foods database in a temporary directory with a handful of
//! rows from the TACO table. The returned [`TempDir`] must be kept alive for
//! as long as the store is used.

use rusqlite::Connection;
use tempfile::TempDir;

use crate::store::FoodStore;

/// Source tag used by every fixture food row.
pub const SOURCE_TAG: &str = "TACO";

/// "Arroz branco cozido" - carries one household measure.
pub const ARROZ_ID: &str = "taco-001";

/// "Feijão preto cozido" - carries two household measures.
pub const FEIJAO_ID: &str = "taco-002";

/// "Banana prata" - carries no household measures and a NULL fiber column.
pub const BANANA_ID: &str = "taco-003";

const SCHEMA: &str = "
    CREATE TABLE foods (
        food_id TEXT PRIMARY KEY,
        data_source TEXT NOT NULL,
        normalized_name TEXT NOT NULL,
        original_name TEXT NOT NULL,
        energy_kcal REAL,
        protein_g REAL,
        carbohydrate_g REAL,
        fat_g REAL,
        fiber_g REAL
    );
    CREATE INDEX food_name_idx ON foods (data_source, normalized_name);
    CREATE TABLE household_measures (
        food_id TEXT NOT NULL,
        measure_name TEXT NOT NULL,
        measure_quantity TEXT,
        measure_weight_g REAL NOT NULL
    );
";

const ROWS: &str = "
    INSERT INTO foods VALUES
        ('taco-001', 'TACO', 'arroz branco cozido', 'Arroz branco cozido',
         128.0, 2.5, 28.1, 0.2, 1.6),
        ('taco-002', 'TACO', 'feijão preto cozido', 'Feijão preto cozido',
         77.0, 4.5, 14.0, 0.5, 8.4),
        ('taco-003', 'TACO', 'banana prata', 'Banana prata',
         98.0, 1.3, 26.0, 0.1, NULL);
    INSERT INTO household_measures VALUES
        ('taco-001', 'colher de sopa', '1', 15.0),
        ('taco-002', 'concha', '1', 80.0),
        ('taco-002', 'xícara', NULL, 160.0);
";

/// Create a fixture database on disk and return its directory and path.
pub fn fixture_database() -> (TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().expect("failed to create fixture directory");
    let path = dir.path().join("foods.db");

    let connection = Connection::open(&path).expect("failed to create fixture database");
    connection
        .execute_batch(SCHEMA)
        .expect("failed to create fixture schema");
    connection
        .execute_batch(ROWS)
        .expect("failed to insert fixture rows");

    (dir, path)
}

/// Create a fixture database and open a store on it.
pub fn fixture_store() -> (TempDir, FoodStore) {
    let (dir, path) = fixture_database();
    let store = FoodStore::open(&path).expect("failed to open fixture store");
    (dir, store)
}
