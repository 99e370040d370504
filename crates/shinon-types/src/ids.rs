//! Type-safe identifier wrappers around catalog strings.
//!
//! Goods, sectors, policies and events are all keyed by short human-readable
//! strings in the static catalog. Wrapping each in its own newtype keeps a
//! good id from being passed where a sector id is expected. Every id
//! implements [`Borrow<str>`] so maps keyed by an id can still be queried
//! with a plain `&str`.

use std::borrow::Borrow;

use serde::{Deserialize, Serialize};

/// Generates a newtype wrapper around [`String`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create an identifier from any string-like value.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

define_id! {
    /// Identifier of a tradable good (lower-case, e.g. `grain`).
    GoodId
}

define_id! {
    /// Identifier of a production sector (lower-case, e.g. `agriculture`).
    SectorId
}

define_id! {
    /// Identifier of an operator policy (upper-case, e.g. `TAX_ADJUST`).
    PolicyId
}

define_id! {
    /// Identifier of a random world event (upper-case, e.g. `DROUGHT`).
    EventId
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn ids_look_up_by_str() {
        let mut prices: BTreeMap<GoodId, f64> = BTreeMap::new();
        prices.insert(GoodId::new("grain"), 10.0);
        assert!(prices.contains_key("grain"));
        assert!(!prices.contains_key("steel"));
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = PolicyId::new("TAX_ADJUST");
        let json = serde_json::to_string(&id).ok();
        assert_eq!(json.as_deref(), Some("\"TAX_ADJUST\""));
    }

    #[test]
    fn display_matches_inner() {
        assert_eq!(SectorId::from("industry").to_string(), "industry");
    }
}
