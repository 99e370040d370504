//! Shared type definitions for the Shinon economy simulation.
//!
//! This crate is the single source of truth for the state types that flow
//! between the world model, the turn engine, the persistence layer and the
//! console kernel.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe string wrappers for catalog identifiers
//! - [`enums`] -- Policy classification, intent kinds, view ids and locales
//! - [`structs`] -- World, market, sector and policy runtime state plus
//!   history records

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{IntentKind, Locale, PolicyStatus, PolicyTier, TargetType, UnknownLocale, ViewId};
pub use ids::{EventId, GoodId, PolicyId, SectorId};
pub use structs::{
    CapacityProgress, EventRecord, GameState, HistoryRecord, LoggedEvent, MarketGood,
    POPULATION_FLOOR, PolicyRuntime, PriceMove, SCALAR_MAX, SectorState, TurnSummary,
    UnlockRecord, WorldState,
};
