//! Error types for the `shinon-world` crate.
//!
//! Catalog loading is the only fallible operation here; the market, event
//! and metrics functions are total over a validated catalog.

/// Errors that can occur while loading or validating the static catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Failed to read the catalog file from disk.
    #[error("failed to read catalog file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse the YAML content (including unknown effect keys).
    #[error("failed to parse catalog YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// Two entries of the same kind share an id.
    #[error("duplicate {kind} id: {id}")]
    DuplicateId {
        /// Entry kind (`good`, `sector`, `policy`, `event`).
        kind: &'static str,
        /// The repeated id.
        id: String,
    },

    /// An entry refers to an id that the catalog does not define.
    #[error("{context} refers to unknown id: {id}")]
    UnknownReference {
        /// Where the reference was found.
        context: String,
        /// The missing id.
        id: String,
    },

    /// A good's price band is empty or its base price lies outside it.
    #[error("good {good} has an invalid price band")]
    InvalidPriceBand {
        /// The offending good.
        good: String,
    },

    /// A policy's magnitude bounds are inconsistent.
    #[error("policy {policy} has invalid magnitude bounds")]
    InvalidMagnitude {
        /// The offending policy.
        policy: String,
    },

    /// A policy uses the `target` placeholder without declaring a target type.
    #[error("policy {policy} uses the target placeholder but takes no target")]
    UntargetedPlaceholder {
        /// The offending policy.
        policy: String,
    },

    /// A required section is empty.
    #[error("catalog has no {0}")]
    Empty(&'static str),
}

impl From<serde_yml::Error> for CatalogError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}
