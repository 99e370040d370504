//! Error types for the console binary.
//!
//! [`ConsoleError`] wraps every failure that can stop the console before
//! or during a session, so `main` can propagate with `?`.

/// Top-level error for the console binary.
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: shinon_core::ConfigError,
    },

    /// The catalog could not be loaded.
    #[error("catalog error: {source}")]
    Catalog {
        /// The underlying catalog error.
        #[from]
        source: shinon_world::CatalogError,
    },

    /// The save file could not be opened.
    #[error("save error: {source}")]
    Save {
        /// The underlying database error.
        #[from]
        source: shinon_db::DbError,
    },

    /// Starting or loading a game failed.
    #[error("engine error: {source}")]
    Engine {
        /// The underlying engine error.
        #[from]
        source: shinon_core::EngineError,
    },

    /// Terminal input or output failed.
    #[error("console I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// The log subscriber could not be installed.
    #[error("logging error: {message}")]
    Logging {
        /// Description of the failure.
        message: String,
    },
}
