//! Error types for the turn engine.

use crate::store::StoreError;
use crate::validation::ActionError;

/// Errors raised while running engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The requested action is invalid. Nothing was changed.
    #[error("{0}")]
    Invalid(#[from] ActionError),

    /// Saved state disagrees with the catalog.
    #[error("integrity error: {0}")]
    Integrity(String),
}

impl EngineError {
    /// Whether this is an operator error rather than an internal fault.
    pub const fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }
}
