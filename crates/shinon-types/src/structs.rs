//! Core state structs for the Shinon simulation.
//!
//! [`GameState`] is the unit of load/save: the turn engine loads one,
//! mutates it as its sole working set for a turn, and commits it back
//! together with the turn's [`HistoryRecord`].

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{EventId, GoodId, PolicyId, SectorId};

/// Lowest population the simulation allows.
pub const POPULATION_FLOOR: i64 = 10_000;

/// Upper bound for the percentage-style world scalars.
pub const SCALAR_MAX: f64 = 100.0;

// ---------------------------------------------------------------------------
// World
// ---------------------------------------------------------------------------

/// Nation-wide scalars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldState {
    /// Number of turns advanced so far.
    pub turn: u64,
    /// Treasury balance. Negative during a deficit.
    pub treasury: i64,
    /// Head count, never below [`POPULATION_FLOOR`].
    pub population: i64,
    /// Material well-being, 0..=100.
    pub prosperity: f64,
    /// Institutional stability, 0..=100.
    pub stability: f64,
    /// Civil unrest, 0..=100.
    pub unrest: f64,
    /// Technology level, 0..=100.
    pub tech_level: f64,
    /// Wall-clock time of the last enacted action.
    pub last_action_ts: Option<DateTime<Utc>>,
}

impl WorldState {
    /// Clamp every bounded scalar and enforce the population floor.
    pub fn clamp_scalars(&mut self) {
        self.population = self.population.max(POPULATION_FLOOR);
        self.prosperity = self.prosperity.clamp(0.0, SCALAR_MAX);
        self.stability = self.stability.clamp(0.0, SCALAR_MAX);
        self.unrest = self.unrest.clamp(0.0, SCALAR_MAX);
        self.tech_level = self.tech_level.clamp(0.0, SCALAR_MAX);
    }
}

/// Supply, demand and price for one tradable good.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketGood {
    /// Good identifier.
    pub id: GoodId,
    /// Units on offer this turn.
    pub supply: f64,
    /// Units wanted this turn.
    pub demand: f64,
    /// Current price.
    pub price: f64,
    /// Price at the start of the previous market step.
    pub last_price: f64,
}

/// Mutable part of a production sector.
///
/// Input/output recipes are static catalog data and live in the world crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorState {
    /// Sector identifier.
    pub id: SectorId,
    /// Nominal units of throughput per turn.
    pub capacity: f64,
    /// Fraction of capacity realised, soft-bounded to 0.05..=1.5.
    pub efficiency: f64,
    /// Treasury cost per turn.
    pub upkeep: f64,
}

// ---------------------------------------------------------------------------
// Policy runtimes
// ---------------------------------------------------------------------------

/// Progress of a policy's one-shot capacity grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CapacityProgress {
    /// The policy grants no capacity.
    #[default]
    None,
    /// The grant fires once `delay_left` reaches zero.
    Pending {
        /// Active turns still to wait.
        delay_left: u32,
    },
    /// The grant has already been added to the sector.
    Applied,
}

/// A policy that is currently active or cooling down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyRuntime {
    /// The enacted policy.
    pub policy_id: PolicyId,
    /// Turns of effect left.
    pub remaining_ticks: u32,
    /// Turns of cooldown left once the effect has ended.
    pub cooldown_ticks: u32,
    /// Magnitude chosen at enactment.
    pub magnitude: f64,
    /// Resolved target id, if the policy takes one.
    pub target: Option<String>,
    /// Delayed capacity grant progress.
    #[serde(default)]
    pub capacity: CapacityProgress,
}

impl PolicyRuntime {
    /// Whether the policy still contributes effects.
    pub const fn is_active(&self) -> bool {
        self.remaining_ticks > 0
    }

    /// Advance the runtime by one turn.
    ///
    /// Returns `false` once both counters are exhausted and the runtime
    /// should be dropped.
    pub fn tick(&mut self, cooldown_on_expiry: u32) -> bool {
        if self.remaining_ticks > 0 {
            self.remaining_ticks -= 1;
            if self.remaining_ticks == 0 {
                self.cooldown_ticks = cooldown_on_expiry;
            }
        } else if self.cooldown_ticks > 0 {
            self.cooldown_ticks -= 1;
        }
        self.remaining_ticks > 0 || self.cooldown_ticks > 0
    }
}

// ---------------------------------------------------------------------------
// Aggregate
// ---------------------------------------------------------------------------

/// Everything the turn engine loads and saves for one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Nation-wide scalars.
    pub world: WorldState,
    /// One entry per catalog good.
    pub market: BTreeMap<GoodId, MarketGood>,
    /// One entry per catalog sector.
    pub sectors: BTreeMap<SectorId, SectorState>,
    /// Standard-tier policies the operator may enact.
    pub unlocked_policies: BTreeSet<PolicyId>,
    /// Policies currently active or cooling down.
    pub active_policies: BTreeMap<PolicyId, PolicyRuntime>,
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A world event that fired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Event identifier.
    pub id: EventId,
    /// Short label.
    pub label: String,
    /// One-sentence description.
    pub description: String,
}

/// An event together with the turn it fired on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedEvent {
    /// Turn the event fired on.
    pub turn: u64,
    /// The event.
    pub record: EventRecord,
}

/// A price change for one good, in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceMove {
    /// Good identifier.
    pub good: GoodId,
    /// Relative change in percent.
    pub delta_pct: f64,
}

/// Derived numbers stored with each history row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TurnSummary {
    /// Goods short after the turn.
    pub shortages: Vec<GoodId>,
    /// Mean price change in percent.
    pub inflation: f64,
    /// Mean absolute price change in percent.
    pub volatility: f64,
    /// Largest price moves, biggest first.
    pub top_price_movers: Vec<PriceMove>,
    /// Events that fired.
    pub events: Vec<EventId>,
    /// Treasury after the turn.
    pub treasury: i64,
    /// Treasury change over the turn.
    pub net_cashflow: i64,
    /// Net cashflow summed over the trailing three turns.
    pub trailing_cashflow: i64,
    /// Collapse flag after the turn.
    pub collapse_active: bool,
    /// Policies unlocked during the turn.
    pub unlocked: Vec<PolicyId>,
}

/// Immutable record of one advanced turn, keyed by `turn`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Turn number after advancing.
    pub turn: u64,
    /// Wall-clock time the turn was committed.
    pub timestamp: DateTime<Utc>,
    /// Enacted policy id.
    pub action: PolicyId,
    /// Immediate cost plus recurring costs of the turn.
    pub cost: i64,
    /// Derived numbers.
    pub summary: TurnSummary,
}

/// A policy unlock with its provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockRecord {
    /// Unlocked policy.
    pub policy_id: PolicyId,
    /// Turn of the unlock.
    pub turn: u64,
    /// What caused it (`new_game`, `ramp`, ...).
    pub source: String,
}
