use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for the Nutri library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Database file could not be located at the given path.
    #[error("database not found at {path}")]
    DatabaseNotFound { path: PathBuf },

    /// Raised when the database does not contain the expected tables.
    #[error("unsupported database schema; expected foods/household_measures tables")]
    UnsupportedSchema,

    /// Raised when no food row exists for an identifier.
    #[error("food not found: {id}")]
    FoodNotFound { id: String },

    /// Raised when the upstream food API responds with a non-200 status.
    #[error("food API returned status {status}")]
    UpstreamStatus { status: u16 },

    /// Raised when a response body could not be decoded.
    #[error("failed to decode response: {message}")]
    Decode { message: String },

    /// Wrapper for SQLite errors.
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    /// Wrapper for HTTP client errors.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
