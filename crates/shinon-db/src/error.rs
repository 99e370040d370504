//! Error types for the save store.
//!
//! All errors are propagated via [`DbError`], which wraps the underlying
//! [`sqlx`] and runtime errors. The turn engine sees them as
//! [`StoreError`] through the `From` impl below.

use shinon_core::StoreError;

/// Errors that can occur in the save store.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A `SQLite` operation failed.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] sqlx::Error),

    /// The blocking runtime could not be started.
    #[error("runtime error: {0}")]
    Runtime(#[from] std::io::Error),

    /// A serialization or deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored value is out of range or malformed.
    #[error("Corrupt save: {0}")]
    Corrupt(String),

    /// The save was written by a newer schema.
    #[error("Unsupported schema version {found} (this build supports up to {supported})")]
    UnsupportedSchema {
        /// Version found in the save.
        found: i64,
        /// Highest version this build understands.
        supported: i64,
    },
}

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Serialization(source) => Self::Serde(source),
            other => Self::Backend(other.to_string()),
        }
    }
}
