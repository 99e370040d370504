//! Turn engine, validation, progression, and persistence seam for Shinon.
//!
//! This crate owns the rules that move a save from one turn to the next.
//! It depends on `shinon-world` for the economy itself and talks to storage
//! only through the [`StateStore`] trait.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `shinon-config.yaml` into
//!   strongly-typed structs.
//! - [`engine`] -- [`SimulationEngine`]: the turn pipeline and the read
//!   queries the console needs.
//! - [`error`] -- [`EngineError`].
//! - [`progression`] -- Collapse and unlock state machines.
//! - [`store`] -- [`StateStore`] trait and [`MemoryStore`].
//! - [`validation`] -- [`validate_action`] and [`ActionError`].
//!
//! [`StateStore`]: store::StateStore
//! [`MemoryStore`]: store::MemoryStore
//! [`SimulationEngine`]: engine::SimulationEngine
//! [`EngineError`]: error::EngineError
//! [`validate_action`]: validation::validate_action
//! [`ActionError`]: validation::ActionError

pub mod config;
pub mod engine;
pub mod error;
pub mod progression;
pub mod store;
pub mod validation;

pub use config::{ConfigError, SimulationConfig};
pub use engine::{
    GoalProgress, IntelHintView, PolicyStatusRow, SimulationEngine, Snapshot, TurnOutcome,
    TurnReport, UnlockStatusRow, aggregate_effects,
};
pub use error::EngineError;
pub use progression::{CollapseTransition, Progression};
pub use store::{MemoryStore, StateStore, StoreError, TurnCommit};
pub use validation::{ActionError, ActionRequest, validate_action};
