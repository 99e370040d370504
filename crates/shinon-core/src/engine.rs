//! The turn engine.
//!
//! [`SimulationEngine::advance_turn`] is the only operation that moves the
//! game forward. It enacts exactly one policy and runs the turn pipeline:
//!
//! 1. Validate the request (seed, policy, tier, [`validate_action`]).
//! 2. Debit the immediate cost and start the policy runtime.
//! 3. Advance the turn counter and stamp the action time.
//! 4. Aggregate effects of every active runtime.
//! 5. Settle sector upkeep, base income, policy income and recurring costs.
//! 6. Run the market step.
//! 7. Apply shortage and inflation pressure to the world scalars.
//! 8. Apply policy world deltas.
//! 9. Maybe fire one event, then re-clamp prices.
//! 10. Recompute metrics against the pre-turn market.
//! 11. Adjust population and clamp scalars.
//! 12. Update the collapse machine.
//! 13. Run the unlock ramp.
//! 14. Tick runtimes.
//! 15. Commit everything through [`StateStore::commit_turn`].
//!
//! All work happens on a loaded copy of the state. A rejection or an
//! internal fault leaves the store untouched.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::Serialize;
use shinon_types::{
    CapacityProgress, EventRecord, GameState, GoodId, HistoryRecord, PolicyId, PolicyRuntime,
    PolicyStatus, PriceMove, SectorId, SectorState, TargetType, TurnSummary, UnlockRecord,
    WorldState,
};
use shinon_world::effects::CapacityGrant;
use shinon_world::{
    Catalog, EffectTotals, GoalComparison, MarketContext, MarketMetrics, WorldMetric,
    apply_event, choose_event, clamp_prices, compute_metrics, find_shortages, initial_state,
    simulate_market,
};
use tracing::{debug, error, info, warn};

use crate::error::EngineError;
use crate::progression::{
    CASHFLOW_WINDOW, CollapseTransition, Progression, is_enactable_tier, policy_status,
};
use crate::store::{StateStore, TurnCommit, meta};
use crate::validation::{ActionError, validate_action};

/// Unrest added per short good.
const SHORTAGE_UNREST: f64 = 1.5;
/// Unrest added per percent of positive inflation.
const INFLATION_UNREST: f64 = 0.15;
/// Prosperity lost per short good.
const SHORTAGE_PROSPERITY: f64 = 0.8;
/// Prosperity lost per percent of positive inflation.
const INFLATION_PROSPERITY: f64 = 0.22;
/// Prosperity gained per tech level.
const TECH_PROSPERITY: f64 = 0.01;
/// Stability lost per point of unrest.
const UNREST_STABILITY: f64 = 0.02;
/// Tech gained every turn.
const TECH_DRIFT: f64 = 0.2;
/// Prosperity minus unrest at which population is flat.
const POPULATION_NEUTRAL: f64 = 30.0;
/// Divisor turning the prosperity/unrest gap into head count.
const POPULATION_DIVISOR: f64 = 200.0;

/// Default minimum turns between unprompted intel hints.
pub const DEFAULT_INTEL_INTERVAL: u64 = 5;

/// Message returned when a turn fails for internal reasons.
pub const INTERNAL_ERROR_MESSAGE: &str = "INTERNAL ERROR turn not advanced";

// ---------------------------------------------------------------------------
// Outcomes and query rows
// ---------------------------------------------------------------------------

/// Detail of a successfully advanced turn.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnReport {
    /// Enacted policy.
    pub action: PolicyId,
    /// Magnitude used.
    pub magnitude: f64,
    /// Resolved target.
    pub target: Option<String>,
    /// World before the action.
    pub world_before: WorldState,
    /// World after the turn.
    pub world_after: WorldState,
    /// Final market metrics.
    pub metrics: MarketMetrics,
    /// Events that fired.
    pub events: Vec<EventRecord>,
    /// Collapse machine transition.
    pub collapse: CollapseTransition,
    /// The stored history row.
    pub history: HistoryRecord,
}

/// Result of [`SimulationEngine::advance_turn`].
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    /// Whether the turn counter moved.
    pub advanced: bool,
    /// Turn after the call.
    pub turn: u64,
    /// `ACTION OK ...`, `INVALID PARAM ...` or the internal error message.
    pub message: String,
    /// Present iff `advanced`.
    pub report: Option<TurnReport>,
}

/// One row of the policies view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyStatusRow {
    /// Policy id.
    pub id: PolicyId,
    /// Display label.
    pub label: String,
    /// Description.
    pub description: String,
    /// Current status.
    pub status: PolicyStatus,
    /// Target type.
    pub target_type: TargetType,
    /// Remaining active turns, when active.
    pub remaining_ticks: u32,
    /// Remaining cooldown turns, when cooling down.
    pub cooldown_ticks: u32,
    /// Whether the policy is emergency tier.
    pub is_emergency: bool,
}

/// One row of the unlocks view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnlockStatusRow {
    /// Policy id.
    pub policy_id: PolicyId,
    /// Display label.
    pub label: String,
    /// Whether the policy is enactable by tier right now.
    pub unlocked: bool,
    /// Turn of the unlock row, if any.
    pub unlocked_turn: Option<u64>,
    /// Provenance, or `collapse_only` / `locked` without a row.
    pub source: String,
}

/// Progress toward one soft goal.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalProgress {
    /// Goal id.
    pub id: String,
    /// Display label.
    pub label: String,
    /// Tracked metric.
    pub metric: WorldMetric,
    /// Comparison direction.
    pub comparison: GoalComparison,
    /// Target value.
    pub target: f64,
    /// Current value.
    pub current: f64,
    /// Whether the goal is met.
    pub done: bool,
    /// Progress ratio in `[0, 1]`.
    pub progress: f64,
}

/// A selected intel hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntelHintView {
    /// Hint id.
    pub id: String,
    /// Hint text.
    pub text: String,
}

/// World scalars in a [`Snapshot`], rounded to 6 decimal places.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotWorld {
    /// Treasury.
    pub treasury: i64,
    /// Population.
    pub population: i64,
    /// Prosperity.
    pub prosperity: f64,
    /// Stability.
    pub stability: f64,
    /// Unrest.
    pub unrest: f64,
    /// Tech level.
    pub tech_level: f64,
}

/// Compact, serializable view of a save used for determinism checks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    /// Current turn.
    pub turn: u64,
    /// World scalars.
    pub world: SnapshotWorld,
    /// Prices, rounded to 6 decimal places.
    pub prices: BTreeMap<GoodId, f64>,
    /// Number of unlocked standard policies.
    pub unlocked_count: usize,
    /// Collapse flag.
    pub collapse_active: bool,
}

fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Runs turns and answers queries for one save.
#[derive(Debug)]
pub struct SimulationEngine<S> {
    catalog: Catalog,
    store: S,
    intel_interval: u64,
}

impl<S: StateStore> SimulationEngine<S> {
    /// Create an engine over a catalog and a store.
    pub const fn new(catalog: Catalog, store: S) -> Self {
        Self {
            catalog,
            store,
            intel_interval: DEFAULT_INTEL_INTERVAL,
        }
    }

    /// Set the minimum number of turns between unprompted intel hints.
    #[must_use]
    pub const fn with_intel_interval(mut self, turns: u64) -> Self {
        self.intel_interval = turns;
        self
    }

    /// The static catalog.
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The backing store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the backing store.
    pub const fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Start a new game with `seed`, replacing any existing save.
    pub fn new_game(&mut self, seed: u64) -> Result<GameState, EngineError> {
        let state = initial_state(&self.catalog);
        let unlocks: Vec<UnlockRecord> = state
            .unlocked_policies
            .iter()
            .map(|id| UnlockRecord {
                policy_id: id.clone(),
                turn: 0,
                source: "new_game".to_owned(),
            })
            .collect();
        self.store.init_new_game(seed, &state, &unlocks)?;
        for (key, value) in Progression::default().meta_entries() {
            self.store.set_meta(&key, &value)?;
        }
        info!(seed, unlocked = unlocks.len(), "New game created");
        Ok(state)
    }

    /// Create a game with `seed` unless one exists. Returns whether one was
    /// created.
    pub fn ensure_game(&mut self, seed: u64) -> Result<bool, EngineError> {
        if self.store.has_game()? {
            return Ok(false);
        }
        self.new_game(seed)?;
        Ok(true)
    }

    /// Give up the engine and return its store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Load the current state.
    pub fn load_state(&self) -> Result<GameState, EngineError> {
        Ok(self.store.load_state()?)
    }

    /// Whether a collapse is in progress.
    pub fn collapse_active(&self) -> Result<bool, EngineError> {
        Ok(self.store.get_bool_meta(meta::COLLAPSE_ACTIVE, false)?)
    }

    /// Status of every catalog policy, ordered by id.
    pub fn policy_status(&self, state: &GameState) -> Result<Vec<PolicyStatusRow>, EngineError> {
        let collapse = self.collapse_active()?;
        Ok(self
            .catalog
            .policies
            .values()
            .map(|policy| {
                let status = policy_status(state, policy, collapse);
                let runtime = state.active_policies.get(&policy.id);
                PolicyStatusRow {
                    id: policy.id.clone(),
                    label: policy.label.clone(),
                    description: policy.description.clone(),
                    status,
                    target_type: policy.target_type,
                    remaining_ticks: match (status, runtime) {
                        (PolicyStatus::Active, Some(r)) => r.remaining_ticks,
                        _ => 0,
                    },
                    cooldown_ticks: match (status, runtime) {
                        (PolicyStatus::Cooldown, Some(r)) => r.cooldown_ticks,
                        _ => 0,
                    },
                    is_emergency: policy.is_emergency(),
                }
            })
            .collect())
    }

    /// Unlock state of every catalog policy, ordered by id.
    pub fn unlock_status(&self, state: &GameState) -> Result<Vec<UnlockStatusRow>, EngineError> {
        let collapse = self.collapse_active()?;
        let rows: BTreeMap<PolicyId, UnlockRecord> = self
            .store
            .unlocked_policy_rows()?
            .into_iter()
            .map(|row| (row.policy_id.clone(), row))
            .collect();
        Ok(self
            .catalog
            .policies
            .values()
            .map(|policy| {
                let row = rows.get(&policy.id);
                let fallback = if policy.is_emergency() {
                    "collapse_only"
                } else {
                    "locked"
                };
                UnlockStatusRow {
                    policy_id: policy.id.clone(),
                    label: policy.label.clone(),
                    unlocked: is_enactable_tier(state, policy, collapse),
                    unlocked_turn: row.map(|r| r.turn),
                    source: row.map_or_else(|| fallback.to_owned(), |r| r.source.clone()),
                }
            })
            .collect())
    }

    /// Progress toward every catalog soft goal.
    pub fn soft_goals(&self, state: &GameState) -> Vec<GoalProgress> {
        self.catalog
            .soft_goals
            .iter()
            .map(|goal| {
                let current = goal.metric.read(&state.world);
                let (done, ratio) = match goal.comparison {
                    GoalComparison::AtLeast => (
                        current >= goal.target,
                        if goal.target.abs() < f64::EPSILON {
                            1.0
                        } else {
                            (current / goal.target).min(1.0)
                        },
                    ),
                    GoalComparison::AtMost => (
                        current <= goal.target,
                        if current <= 0.0 {
                            1.0
                        } else {
                            (goal.target / current).min(1.0)
                        },
                    ),
                };
                GoalProgress {
                    id: goal.id.clone(),
                    label: goal.label.clone(),
                    metric: goal.metric,
                    comparison: goal.comparison,
                    target: goal.target,
                    current,
                    done,
                    progress: ratio.clamp(0.0, 1.0),
                }
            })
            .collect()
    }

    /// Pick an intel hint for `state`.
    ///
    /// The first applicable hint that differs from the last one shown wins;
    /// when only the last one applies it is repeated. With `auto` set, a
    /// hint is produced at most once per intel interval.
    pub fn intel_hint(&mut self, state: &GameState, auto: bool) -> Result<Option<IntelHintView>, EngineError> {
        let turn = i64::try_from(state.world.turn).unwrap_or(i64::MAX);
        if auto {
            let last_turn = self.store.get_int_meta(meta::LAST_AUTO_INTEL_TURN, -9999)?;
            let interval = i64::try_from(self.intel_interval).unwrap_or(i64::MAX);
            if turn.saturating_sub(last_turn) < interval {
                return Ok(None);
            }
        }
        let last_hint = self.store.get_str_meta(meta::LAST_INTEL_HINT_ID, "")?;
        let shortages = find_shortages(&state.market, self.catalog.economy.shortage_threshold).len();
        let candidates: Vec<_> = self
            .catalog
            .intel_hints
            .iter()
            .filter(|hint| hint.applies(&state.world, shortages))
            .collect();
        let Some(hint) = candidates
            .iter()
            .find(|hint| hint.id != last_hint)
            .or_else(|| candidates.first())
        else {
            return Ok(None);
        };
        if auto {
            self.store.set_int_meta(meta::LAST_AUTO_INTEL_TURN, turn)?;
        }
        self.store.set_meta(meta::LAST_INTEL_HINT_ID, &hint.id)?;
        debug!(hint = %hint.id, auto, "Intel hint selected");
        Ok(Some(IntelHintView {
            id: hint.id.clone(),
            text: hint.text.clone(),
        }))
    }

    /// Up to `limit` history rows, newest first.
    pub fn history(&self, limit: usize) -> Result<Vec<HistoryRecord>, EngineError> {
        Ok(self.store.history(limit)?)
    }

    /// Compact view of the current save.
    pub fn snapshot(&self) -> Result<Snapshot, EngineError> {
        let state = self.store.load_state()?;
        let world = &state.world;
        Ok(Snapshot {
            turn: world.turn,
            world: SnapshotWorld {
                treasury: world.treasury,
                population: world.population,
                prosperity: round_to(world.prosperity, 6),
                stability: round_to(world.stability, 6),
                unrest: round_to(world.unrest, 6),
                tech_level: round_to(world.tech_level, 6),
            },
            prices: state
                .market
                .iter()
                .map(|(id, good)| (id.clone(), round_to(good.price, 6)))
                .collect(),
            unlocked_count: state.unlocked_policies.len(),
            collapse_active: self.collapse_active()?,
        })
    }

    /// Enact one policy and advance one turn.
    ///
    /// Never returns an error: rejections and internal faults are reported
    /// through a non-advancing [`TurnOutcome`], and nothing is written.
    pub fn advance_turn(
        &mut self,
        policy_id: &str,
        magnitude: Option<f64>,
        target: Option<&str>,
    ) -> TurnOutcome {
        match self.try_advance(policy_id, magnitude, target) {
            Ok(report) => TurnOutcome {
                advanced: true,
                turn: report.world_after.turn,
                message: format!("ACTION OK {}", report.action),
                report: Some(report),
            },
            Err(err) => {
                if err.is_invalid() {
                    warn!(policy = policy_id, ?magnitude, ?target, %err, "Action rejected");
                } else {
                    error!(policy = policy_id, %err, "Turn failed");
                }
                let turn = self.store.load_state().map_or(0, |s| s.world.turn);
                let message = match err {
                    EngineError::Invalid(invalid) => invalid.to_string(),
                    EngineError::Store(_) | EngineError::Integrity(_) => {
                        INTERNAL_ERROR_MESSAGE.to_owned()
                    }
                };
                TurnOutcome {
                    advanced: false,
                    turn,
                    message,
                    report: None,
                }
            }
        }
    }

    fn try_advance(
        &mut self,
        policy_id: &str,
        magnitude: Option<f64>,
        target: Option<&str>,
    ) -> Result<TurnReport, EngineError> {
        let mut state = self.store.load_state()?;
        let seed = self.store.seed()?.ok_or(ActionError::MissingSeed)?;
        let mut progression = Progression::load(&self.store)?;
        let catalog = &self.catalog;

        let policy = catalog
            .policy(policy_id)
            .ok_or_else(|| ActionError::UnknownPolicy(policy_id.to_owned()))?;
        if !is_enactable_tier(&state, policy, progression.collapse_active) {
            return Err(ActionError::PolicyLocked.into());
        }
        let action = validate_action(&state, catalog, policy, magnitude, target)?;

        let world_before = state.world.clone();
        let market_before = state.market.clone();

        // Enact.
        state.world.treasury -= action.immediate_cost;
        let capacity = policy
            .effects
            .capacity
            .as_ref()
            .map_or(CapacityProgress::None, |grant| CapacityProgress::Pending {
                delay_left: grant.delay,
            });
        state.active_policies.insert(
            policy.id.clone(),
            PolicyRuntime {
                policy_id: policy.id.clone(),
                remaining_ticks: policy.duration_ticks,
                cooldown_ticks: 0,
                magnitude: action.magnitude,
                target: action.target.clone(),
                capacity,
            },
        );

        let now = Utc::now();
        state.world.turn += 1;
        state.world.last_action_ts = Some(now);
        let turn = state.world.turn;

        let effects = aggregate_effects(catalog, &mut state)?;
        debug!(turn, ?effects, "Policy effect totals");

        let upkeep = settle_treasury(catalog, &mut state, &effects);

        let ctx = MarketContext {
            world: &state.world,
            sectors: &state.sectors,
            catalog,
            effects: &effects,
            seed,
            turn,
        };
        let market = simulate_market(&state.market, &ctx);
        state.market = market;

        let threshold = catalog.economy.shortage_threshold;
        let pressure = compute_metrics(&market_before, &state.market, threshold);
        apply_pressure(&mut state.world, &pressure, &effects);
        effects.world_add.apply_to(&mut state.world);

        let mut events = Vec::new();
        if let Some(event) = choose_event(
            &catalog.events,
            &state.world,
            &state.market,
            seed,
            turn,
            catalog.economy.event_chance,
        ) {
            events.push(apply_event(
                event,
                &mut state.world,
                &mut state.market,
                &mut state.sectors,
            ));
        }
        clamp_prices(&mut state.market, catalog);

        let metrics = compute_metrics(&market_before, &state.market, threshold);

        let gap = state.world.prosperity - state.world.unrest - POPULATION_NEUTRAL;
        state.world.population += (gap / POPULATION_DIVISOR).trunc() as i64;
        state.world.clamp_scalars();

        let net_cashflow = state.world.treasury - world_before.treasury;
        let trailing_cashflow = net_cashflow
            + self
                .store
                .history(CASHFLOW_WINDOW - 1)?
                .iter()
                .map(|row| row.summary.net_cashflow)
                .sum::<i64>();
        let collapse = progression.update_collapse(state.world.treasury, trailing_cashflow);
        match collapse {
            CollapseTransition::Entered => warn!(turn, treasury = state.world.treasury, "Collapse entered"),
            CollapseTransition::Cleared => info!(turn, "Collapse cleared"),
            CollapseTransition::Unchanged => {}
        }

        let mut unlocks = Vec::new();
        if let Some(rule) = progression.next_unlock(catalog, &state.unlocked_policies, turn) {
            state.unlocked_policies.insert(rule.policy_id.clone());
            unlocks.push(UnlockRecord {
                policy_id: rule.policy_id.clone(),
                turn,
                source: rule.source.clone(),
            });
        }

        tick_runtimes(catalog, &mut state);

        let cost = action.immediate_cost + (upkeep + effects.recurring_cost()).round() as i64;
        let summary = TurnSummary {
            shortages: metrics.shortages.clone(),
            inflation: round_to(metrics.inflation, 3),
            volatility: round_to(metrics.volatility, 3),
            top_price_movers: metrics
                .top_movers
                .iter()
                .map(|mv| PriceMove {
                    good: mv.good.clone(),
                    delta_pct: round_to(mv.delta_pct, 3),
                })
                .collect(),
            events: events.iter().map(|e| e.id.clone()).collect(),
            treasury: state.world.treasury,
            net_cashflow,
            trailing_cashflow,
            collapse_active: progression.collapse_active,
            unlocked: unlocks.iter().map(|u| u.policy_id.clone()).collect(),
        };
        let history = HistoryRecord {
            turn,
            timestamp: now,
            action: policy.id.clone(),
            cost,
            summary,
        };

        let world_after = state.world.clone();
        let commit = TurnCommit {
            state,
            meta: progression.meta_entries(),
            unlocks,
            history: history.clone(),
            events: events.clone(),
        };
        self.store.commit_turn(&commit)?;

        info!(
            turn,
            action = %action.policy_id,
            magnitude = action.magnitude,
            target = ?action.target,
            shortages = metrics.shortages.len(),
            inflation = metrics.inflation,
            volatility = metrics.volatility,
            events = ?history.summary.events,
            collapse_active = progression.collapse_active,
            unlocked = ?history.summary.unlocked,
            treasury = world_after.treasury,
            "Turn advanced"
        );

        Ok(TurnReport {
            action: action.policy_id,
            magnitude: action.magnitude,
            target: action.target,
            world_before,
            world_after,
            metrics,
            events,
            collapse,
            history,
        })
    }
}

/// Sum the effects of every active runtime.
///
/// Also advances delayed capacity grants: a pending grant counts down once
/// per active turn, is added to its sectors when the countdown is spent,
/// and is then marked applied.
pub fn aggregate_effects(catalog: &Catalog, state: &mut GameState) -> Result<EffectTotals, EngineError> {
    let GameState {
        active_policies,
        sectors,
        ..
    } = state;
    let mut totals = EffectTotals::default();
    for runtime in active_policies.values_mut() {
        if !runtime.is_active() {
            continue;
        }
        let definition = catalog.policy(runtime.policy_id.as_str()).ok_or_else(|| {
            EngineError::Integrity(format!("runtime references unknown policy {}", runtime.policy_id))
        })?;
        totals.add_policy(&definition.effects, runtime.magnitude, runtime.target.as_deref());
        if let Some(grant) = &definition.effects.capacity {
            runtime.capacity = advance_capacity(runtime, grant, sectors);
        }
    }
    Ok(totals)
}

fn advance_capacity(
    runtime: &PolicyRuntime,
    grant: &CapacityGrant,
    sectors: &mut BTreeMap<SectorId, SectorState>,
) -> CapacityProgress {
    match runtime.capacity {
        CapacityProgress::Pending { delay_left } if delay_left > 0 => CapacityProgress::Pending {
            delay_left: delay_left - 1,
        },
        CapacityProgress::Pending { .. } | CapacityProgress::None => {
            for (sector, amount) in grant.resolve(runtime.magnitude, runtime.target.as_deref()) {
                if let Some(entry) = sectors.get_mut(&sector) {
                    entry.capacity += amount;
                }
            }
            CapacityProgress::Applied
        }
        CapacityProgress::Applied => CapacityProgress::Applied,
    }
}

/// Debit sector upkeep and policy costs, credit income. Returns the sector
/// upkeep debited.
fn settle_treasury(catalog: &Catalog, state: &mut GameState, effects: &EffectTotals) -> f64 {
    let economy = &catalog.economy;
    let world = &mut state.world;

    let upkeep: f64 = state.sectors.values().map(|s| s.upkeep).sum();
    world.treasury -= upkeep.round() as i64;

    let prosperity_rate = if economy.prosperity_income_divisor > 0.0 {
        world.prosperity / economy.prosperity_income_divisor
    } else {
        0.0
    };
    let base_income = (world.population as f64 * (economy.base_income_rate + prosperity_rate)).round() as i64;
    world.treasury += base_income + effects.treasury_income.round() as i64;
    world.treasury -= effects.recurring_cost().round() as i64;
    upkeep
}

/// Shortage and inflation pressure on the world scalars.
fn apply_pressure(world: &mut WorldState, metrics: &MarketMetrics, effects: &EffectTotals) {
    let shortages = metrics.shortages.len() as f64;
    let inflation = metrics.inflation.max(0.0);
    let unrest_factor = SHORTAGE_UNREST + effects.shortage_unrest_factor_add;

    world.unrest += shortages * unrest_factor + inflation * INFLATION_UNREST;
    world.prosperity += -shortages * SHORTAGE_PROSPERITY - inflation * INFLATION_PROSPERITY
        + world.tech_level * TECH_PROSPERITY;
    world.stability -= world.unrest * UNREST_STABILITY;
    world.tech_level += TECH_DRIFT;
}

/// Tick every runtime and drop those with both counters spent.
fn tick_runtimes(catalog: &Catalog, state: &mut GameState) {
    state.active_policies.retain(|id, runtime| {
        let cooldown = catalog.policy(id.as_str()).map_or(0, |p| p.cooldown_ticks);
        runtime.tick(cooldown)
    });
}
