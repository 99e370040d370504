//! Catalog, market dynamics, events, and metrics for the Shinon simulation.
//!
//! This crate models the economy itself. It holds no persistent state:
//! every function takes the current state and the static [`Catalog`] and
//! returns or mutates plain values, so the turn engine can replay a turn
//! exactly from a saved state and a seed.
//!
//! # Modules
//!
//! - [`catalog`] -- Static goods, sectors, policies, events, unlock rules,
//!   goals and hints loaded from YAML.
//! - [`economy`] -- The five-phase market step.
//! - [`effects`] -- Typed policy effects and per-turn accumulation.
//! - [`error`] -- Catalog loading errors.
//! - [`events`] -- Seeded, condition-filtered, weighted event selection.
//! - [`metrics`] -- Shortages, inflation, volatility and top movers.
//! - [`rng`] -- Keyed deterministic random streams.
//! - [`worldgen`] -- The turn-0 game state.
//!
//! [`Catalog`]: catalog::Catalog

pub mod catalog;
pub mod economy;
pub mod effects;
pub mod error;
pub mod events;
pub mod metrics;
pub mod rng;
pub mod worldgen;

// Re-export primary types at crate root.
pub use catalog::{
    Catalog, EconomyConfig, EventDefinition, GoalComparison, GoodDefinition, IntelHint,
    MagnitudeBounds, PolicyDefinition, SectorDefinition, SoftGoal, UnlockRule, WorldMetric,
};
pub use economy::{Market, MarketContext, clamp_prices, simulate_market};
pub use effects::{EffectTotals, PolicyEffects, WorldDelta};
pub use error::CatalogError;
pub use events::{apply_event, choose_event};
pub use metrics::{MarketMetrics, compute_metrics, find_shortages};
pub use rng::{RngStream, bounded_noise, pick_index, seeded_rng, stable_seed};
pub use worldgen::initial_state;
