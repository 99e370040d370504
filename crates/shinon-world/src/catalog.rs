//! The static catalog: goods, sectors, policies, events, unlock rules,
//! soft goals, intel hints and economy tuning.
//!
//! The built-in catalog lives in `data/catalog.yaml` and is embedded into
//! the binary. [`Catalog::from_file`] loads an override from disk. Both
//! paths run the same integrity checks, so every id an entry refers to is
//! known to exist once a [`Catalog`] has been constructed.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::Deserialize;
use shinon_types::{EventId, GoodId, PolicyId, PolicyTier, SectorId, TargetType, WorldState};
use tracing::debug;

use crate::effects::{PolicyEffects, WorldDelta};
use crate::error::CatalogError;

/// YAML source of the built-in catalog.
const BUILTIN_CATALOG: &str = include_str!("../data/catalog.yaml");

// ---------------------------------------------------------------------------
// World and economy tuning
// ---------------------------------------------------------------------------

/// Starting values for a new game's world scalars.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorldDefaults {
    /// Starting treasury.
    pub treasury: i64,
    /// Starting population.
    pub population: i64,
    /// Starting prosperity.
    pub prosperity: f64,
    /// Starting stability.
    pub stability: f64,
    /// Starting unrest.
    pub unrest: f64,
    /// Starting technology level.
    pub tech_level: f64,
}

/// Market and treasury tuning constants.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EconomyConfig {
    /// Damping constant for the price blend toward the demand ratio.
    #[serde(default = "default_k_demand")]
    pub k_demand: f64,

    /// Half-width of the per-good price noise band.
    #[serde(default = "default_noise_amplitude")]
    pub noise_amplitude: f64,

    /// Probability that an event fires on a turn.
    #[serde(default = "default_event_chance")]
    pub event_chance: f64,

    /// A good is short when supply falls below `demand * (1 - threshold)`.
    #[serde(default = "default_shortage_threshold")]
    pub shortage_threshold: f64,

    /// Base income per head per turn.
    #[serde(default = "default_base_income_rate")]
    pub base_income_rate: f64,

    /// Prosperity divisor for the income bonus per head.
    #[serde(default = "default_prosperity_income_divisor")]
    pub prosperity_income_divisor: f64,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            k_demand: default_k_demand(),
            noise_amplitude: default_noise_amplitude(),
            event_chance: default_event_chance(),
            shortage_threshold: default_shortage_threshold(),
            base_income_rate: default_base_income_rate(),
            prosperity_income_divisor: default_prosperity_income_divisor(),
        }
    }
}

const fn default_k_demand() -> f64 {
    0.35
}
const fn default_noise_amplitude() -> f64 {
    0.01
}
const fn default_event_chance() -> f64 {
    0.35
}
const fn default_shortage_threshold() -> f64 {
    0.12
}
const fn default_base_income_rate() -> f64 {
    0.012
}
const fn default_prosperity_income_divisor() -> f64 {
    9000.0
}

// ---------------------------------------------------------------------------
// Goods and sectors
// ---------------------------------------------------------------------------

/// Static description of a tradable good.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GoodDefinition {
    /// Good identifier.
    pub id: GoodId,
    /// Display label.
    pub label: String,
    /// Supply at world generation.
    pub base_supply: f64,
    /// Demand at world generation.
    pub base_demand: f64,
    /// Price at world generation.
    pub base_price: f64,
    /// Lowest allowed price.
    pub min_price: f64,
    /// Highest allowed price.
    pub max_price: f64,
}

impl GoodDefinition {
    /// Clamp a price into this good's band.
    pub fn clamp_price(&self, price: f64) -> f64 {
        price.clamp(self.min_price, self.max_price)
    }
}

/// Static description of a production sector.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SectorDefinition {
    /// Sector identifier.
    pub id: SectorId,
    /// Display label.
    pub label: String,
    /// Capacity at world generation.
    pub capacity: f64,
    /// Efficiency at world generation.
    pub efficiency: f64,
    /// Treasury cost per turn at world generation.
    pub upkeep: f64,
    /// Goods consumed per unit of throughput.
    #[serde(default)]
    pub inputs: BTreeMap<GoodId, f64>,
    /// Goods produced per unit of throughput.
    #[serde(default)]
    pub outputs: BTreeMap<GoodId, f64>,
}

// ---------------------------------------------------------------------------
// Policies
// ---------------------------------------------------------------------------

/// Tolerance for the magnitude step-alignment test.
pub const STEP_TOLERANCE: f64 = 1e-9;

/// Allowed magnitudes for a policy.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MagnitudeBounds {
    /// Smallest magnitude.
    pub min: f64,
    /// Largest magnitude.
    pub max: f64,
    /// Grid spacing from `min`. Zero or less disables the grid.
    pub step: f64,
    /// Magnitude used when none is given.
    pub default: f64,
}

impl MagnitudeBounds {
    /// Whether `value` lies within `[min, max]`.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Whether `value` sits on the `min + k * step` grid.
    pub fn is_aligned(&self, value: f64) -> bool {
        if self.step <= 0.0 {
            return true;
        }
        let ticks = ((value - self.min) / self.step).round();
        let rebuilt = self.min + ticks * self.step;
        let scale = value.abs().max(rebuilt.abs());
        (rebuilt - value).abs() <= STEP_TOLERANCE * scale.max(1.0)
    }
}

/// Preconditions beyond cost and cooldown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicyConstraints {
    /// Treasury must be at least this much to enact.
    pub min_treasury: i64,
}

/// Static description of an operator policy.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyDefinition {
    /// Policy identifier.
    pub id: PolicyId,
    /// Display label.
    pub label: String,
    /// One-sentence description.
    pub description: String,
    /// Access tier.
    #[serde(default)]
    pub tier: PolicyTier,
    /// What the policy needs as a target.
    #[serde(default)]
    pub target_type: TargetType,
    /// Base immediate cost, scaled by magnitude.
    pub cost: i64,
    /// Active turns.
    pub duration_ticks: u32,
    /// Cooldown turns after the effect ends.
    pub cooldown_ticks: u32,
    /// Allowed magnitudes.
    pub magnitude: MagnitudeBounds,
    /// Effects while active.
    #[serde(default)]
    pub effects: PolicyEffects,
    /// Extra preconditions.
    #[serde(default)]
    pub constraints: PolicyConstraints,
}

impl PolicyDefinition {
    /// Immediate cost for a magnitude: `round(cost * max(|m|, 0.25))`.
    pub fn immediate_cost(&self, magnitude: f64) -> i64 {
        (self.cost as f64 * magnitude.abs().max(0.25)).round() as i64
    }

    /// Whether the policy is offered only during a collapse.
    pub fn is_emergency(&self) -> bool {
        self.tier == PolicyTier::Emergency
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// A world scalar that conditions and goals can refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorldMetric {
    /// Treasury balance.
    Treasury,
    /// Population.
    Population,
    /// Prosperity.
    Prosperity,
    /// Stability.
    Stability,
    /// Unrest.
    Unrest,
    /// Technology level.
    TechLevel,
}

impl WorldMetric {
    /// Read the metric from a world state.
    pub fn read(self, world: &WorldState) -> f64 {
        match self {
            Self::Treasury => world.treasury as f64,
            Self::Population => world.population as f64,
            Self::Prosperity => world.prosperity,
            Self::Stability => world.stability,
            Self::Unrest => world.unrest,
            Self::TechLevel => world.tech_level,
        }
    }

    /// Snake-case name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Treasury => "treasury",
            Self::Population => "population",
            Self::Prosperity => "prosperity",
            Self::Stability => "stability",
            Self::Unrest => "unrest",
            Self::TechLevel => "tech_level",
        }
    }
}

/// Preconditions for an event to be a candidate.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EventConditions {
    /// World scalars that must be at least the given value.
    pub world_min: BTreeMap<WorldMetric, f64>,
    /// World scalars that must be at most the given value.
    pub world_max: BTreeMap<WorldMetric, f64>,
    /// Goods whose price must be at least the given value.
    pub good_price_min: BTreeMap<GoodId, f64>,
    /// Goods whose price must be at most the given value.
    pub good_price_max: BTreeMap<GoodId, f64>,
}

/// What an event does when it fires.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EventEffects {
    /// World-scalar additions.
    pub world_add: WorldDelta,
    /// Supply multiplied by `max(0.05, 1 + v)`.
    pub good_supply_mult: BTreeMap<GoodId, f64>,
    /// Demand multiplied by `max(0.05, 1 + v)`.
    pub good_demand_mult: BTreeMap<GoodId, f64>,
    /// Price multiplied by `max(0.05, 1 + v)`.
    pub good_price_mult: BTreeMap<GoodId, f64>,
    /// Efficiency multiplied by `max(0.05, 1 + v)`.
    pub sector_efficiency_mult: BTreeMap<SectorId, f64>,
}

/// Static description of a random world event.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventDefinition {
    /// Event identifier.
    pub id: EventId,
    /// Display label.
    pub label: String,
    /// One-sentence description.
    pub description: String,
    /// Relative weight in the pick; negative weights count as zero.
    pub base_weight: f64,
    /// Candidate filter.
    #[serde(default)]
    pub conditions: EventConditions,
    /// Effects on fire.
    #[serde(default)]
    pub effects: EventEffects,
}

// ---------------------------------------------------------------------------
// Progression, goals and hints
// ---------------------------------------------------------------------------

/// Rule that unlocks a standard policy on the ramp.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnlockRule {
    /// Policy to unlock.
    pub policy_id: PolicyId,
    /// Earliest turn.
    pub min_turn: u64,
    /// Minimum actions taken.
    pub min_actions: u64,
    /// Provenance recorded with the unlock.
    #[serde(default = "default_unlock_source")]
    pub source: String,
}

fn default_unlock_source() -> String {
    "ramp".to_owned()
}

/// Direction of a soft goal comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalComparison {
    /// Metric must reach the target from below.
    AtLeast,
    /// Metric must fall to the target from above.
    AtMost,
}

impl GoalComparison {
    /// Operator shown in the goals view.
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::AtLeast => ">=",
            Self::AtMost => "<=",
        }
    }
}

/// An optional objective shown in the goals view.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SoftGoal {
    /// Goal identifier.
    pub id: String,
    /// Display label.
    pub label: String,
    /// Tracked scalar.
    pub metric: WorldMetric,
    /// Comparison direction.
    pub comparison: GoalComparison,
    /// Target value.
    pub target: f64,
}

/// Conditions for an intel hint to apply.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HintConditions {
    /// At least this many goods short.
    pub min_shortages: Option<usize>,
    /// Treasury at most this much.
    pub max_treasury: Option<i64>,
    /// Unrest at least this much.
    pub min_unrest: Option<f64>,
    /// Unrest at most this much.
    pub max_unrest: Option<f64>,
    /// Stability at least this much.
    pub min_stability: Option<f64>,
}

/// Advisory text surfaced by the intel view.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IntelHint {
    /// Hint identifier.
    pub id: String,
    /// Hint text.
    pub text: String,
    /// When the hint applies.
    #[serde(default)]
    pub conditions: HintConditions,
}

impl IntelHint {
    /// Whether the hint applies to the given world and shortage count.
    pub fn applies(&self, world: &WorldState, shortages: usize) -> bool {
        let c = &self.conditions;
        c.min_shortages.is_none_or(|n| shortages >= n)
            && c.max_treasury.is_none_or(|t| world.treasury <= t)
            && c.min_unrest.is_none_or(|u| world.unrest >= u)
            && c.max_unrest.is_none_or(|u| world.unrest <= u)
            && c.min_stability.is_none_or(|s| world.stability >= s)
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// On-disk shape of the catalog.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    world: WorldDefaults,
    #[serde(default)]
    economy: EconomyConfig,
    population_needs: BTreeMap<GoodId, f64>,
    goods: Vec<GoodDefinition>,
    sectors: Vec<SectorDefinition>,
    policies: Vec<PolicyDefinition>,
    events: Vec<EventDefinition>,
    #[serde(default)]
    unlocks: Vec<UnlockRule>,
    #[serde(default)]
    start_loadout: Vec<PolicyId>,
    #[serde(default)]
    soft_goals: Vec<SoftGoal>,
    #[serde(default)]
    intel_hints: Vec<IntelHint>,
}

/// The validated static catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    /// New-game world values.
    pub world: WorldDefaults,
    /// Market and treasury tuning.
    pub economy: EconomyConfig,
    /// Per-head demand per good.
    pub population_needs: BTreeMap<GoodId, f64>,
    /// Goods keyed by id.
    pub goods: BTreeMap<GoodId, GoodDefinition>,
    /// Sectors keyed by id.
    pub sectors: BTreeMap<SectorId, SectorDefinition>,
    /// Policies keyed by id.
    pub policies: BTreeMap<PolicyId, PolicyDefinition>,
    /// Events in pick order.
    pub events: Vec<EventDefinition>,
    /// Unlock rules sorted by `(min_turn, min_actions, policy_id)`.
    pub unlocks: Vec<UnlockRule>,
    /// Policies unlocked at turn 0.
    pub start_loadout: Vec<PolicyId>,
    /// Soft goals.
    pub soft_goals: Vec<SoftGoal>,
    /// Intel hints in priority order.
    pub intel_hints: Vec<IntelHint>,
}

fn keyed<K: Ord + Clone + ToString, V>(
    kind: &'static str,
    items: Vec<V>,
    key: impl Fn(&V) -> &K,
) -> Result<BTreeMap<K, V>, CatalogError> {
    let mut map = BTreeMap::new();
    for item in items {
        let id = key(&item).clone();
        if map.contains_key(&id) {
            return Err(CatalogError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
        map.insert(id, item);
    }
    Ok(map)
}

fn require<K: Ord + core::borrow::Borrow<str>, V>(
    map: &BTreeMap<K, V>,
    id: &str,
    context: impl FnOnce() -> String,
) -> Result<(), CatalogError> {
    if map.contains_key(id) {
        Ok(())
    } else {
        Err(CatalogError::UnknownReference {
            context: context(),
            id: id.to_owned(),
        })
    }
}

impl Catalog {
    /// The catalog embedded in the binary.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::parse(BUILTIN_CATALOG)
    }

    /// Load a catalog from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate a catalog from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_yml::from_str(yaml)?;

        if file.goods.is_empty() {
            return Err(CatalogError::Empty("goods"));
        }
        if file.sectors.is_empty() {
            return Err(CatalogError::Empty("sectors"));
        }
        if file.policies.is_empty() {
            return Err(CatalogError::Empty("policies"));
        }

        let goods = keyed("good", file.goods, |g| &g.id)?;
        let sectors = keyed("sector", file.sectors, |s| &s.id)?;
        let policies = keyed("policy", file.policies, |p| &p.id)?;

        let mut seen_events = BTreeSet::new();
        for event in &file.events {
            if !seen_events.insert(event.id.clone()) {
                return Err(CatalogError::DuplicateId {
                    kind: "event",
                    id: event.id.to_string(),
                });
            }
        }

        let mut unlocks = file.unlocks;
        unlocks.sort_by(|a, b| {
            (a.min_turn, a.min_actions, &a.policy_id).cmp(&(b.min_turn, b.min_actions, &b.policy_id))
        });

        let catalog = Self {
            world: file.world,
            economy: file.economy,
            population_needs: file.population_needs,
            goods,
            sectors,
            policies,
            events: file.events,
            unlocks,
            start_loadout: file.start_loadout,
            soft_goals: file.soft_goals,
            intel_hints: file.intel_hints,
        };
        catalog.validate()?;
        debug!(
            goods = catalog.goods.len(),
            sectors = catalog.sectors.len(),
            policies = catalog.policies.len(),
            events = catalog.events.len(),
            "Catalog loaded"
        );
        Ok(catalog)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        for good in self.goods.values() {
            let banded = good.min_price > 0.0
                && good.min_price <= good.max_price
                && good.base_price >= good.min_price
                && good.base_price <= good.max_price;
            if !banded {
                return Err(CatalogError::InvalidPriceBand {
                    good: good.id.to_string(),
                });
            }
        }

        for good in self.population_needs.keys() {
            require(&self.goods, good.as_str(), || "population_needs".to_owned())?;
        }

        for sector in self.sectors.values() {
            for good in sector.inputs.keys().chain(sector.outputs.keys()) {
                require(&self.goods, good.as_str(), || format!("sector {}", sector.id))?;
            }
        }

        for policy in self.policies.values() {
            let m = &policy.magnitude;
            if m.min > m.max || !m.contains(m.default) || !m.is_aligned(m.default) {
                return Err(CatalogError::InvalidMagnitude {
                    policy: policy.id.to_string(),
                });
            }
            if policy.target_type == TargetType::None
                && policy.effects.uses_target_placeholder()
            {
                return Err(CatalogError::UntargetedPlaceholder {
                    policy: policy.id.to_string(),
                });
            }
            for sector in policy.effects.fixed_sector_refs() {
                require(&self.sectors, sector, || format!("policy {}", policy.id))?;
            }
            for good in policy.effects.fixed_good_refs() {
                require(&self.goods, good, || format!("policy {}", policy.id))?;
            }
        }

        for event in &self.events {
            let fx = &event.effects;
            let conds = &event.conditions;
            let good_refs = fx
                .good_supply_mult
                .keys()
                .chain(fx.good_demand_mult.keys())
                .chain(fx.good_price_mult.keys())
                .chain(conds.good_price_min.keys())
                .chain(conds.good_price_max.keys());
            for good in good_refs {
                require(&self.goods, good.as_str(), || format!("event {}", event.id))?;
            }
            for sector in fx.sector_efficiency_mult.keys() {
                require(&self.sectors, sector.as_str(), || format!("event {}", event.id))?;
            }
        }

        for rule in &self.unlocks {
            require(&self.policies, rule.policy_id.as_str(), || "unlocks".to_owned())?;
        }
        for id in &self.start_loadout {
            require(&self.policies, id.as_str(), || "start_loadout".to_owned())?;
        }
        Ok(())
    }

    /// Look up a policy by id.
    pub fn policy(&self, id: &str) -> Option<&PolicyDefinition> {
        self.policies.get(id)
    }

    /// Target type of every policy, for the intent interpreter.
    pub fn policy_target_types(&self) -> BTreeMap<PolicyId, TargetType> {
        self.policies
            .values()
            .map(|p| (p.id.clone(), p.target_type))
            .collect()
    }

    /// Whether `id` names a catalog sector.
    pub fn has_sector(&self, id: &str) -> bool {
        self.sectors.contains_key(id)
    }

    /// Whether `id` names a catalog good.
    pub fn has_good(&self, id: &str) -> bool {
        self.goods.contains_key(id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn bounds(min: f64, max: f64, step: f64) -> MagnitudeBounds {
        MagnitudeBounds {
            min,
            max,
            step,
            default: min,
        }
    }

    #[test]
    fn builtin_catalog_loads() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.goods.len(), 8);
        assert_eq!(catalog.sectors.len(), 3);
        assert!(catalog.policies.len() >= 8);
        assert!(catalog.events.len() >= 10);
        assert!(catalog.goods.contains_key("grain"));
        for id in ["agriculture", "industry", "services"] {
            assert!(catalog.has_sector(id));
        }
    }

    #[test]
    fn unlock_rules_are_sorted() {
        let catalog = Catalog::builtin().unwrap();
        let keys: Vec<_> = catalog
            .unlocks
            .iter()
            .map(|r| (r.min_turn, r.min_actions, r.policy_id.clone()))
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn builtin_has_two_emergency_policies() {
        let catalog = Catalog::builtin().unwrap();
        let emergency: Vec<_> = catalog
            .policies
            .values()
            .filter(|p| p.is_emergency())
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(emergency, vec!["RATIONING_PLUS", "SOS_CREDIT"]);
    }

    #[test]
    fn step_alignment() {
        let b = bounds(0.5, 2.0, 0.5);
        assert!(b.is_aligned(1.0));
        assert!(b.is_aligned(2.0));
        assert!(!b.is_aligned(1.3));
        let fine = bounds(-0.1, 0.2, 0.01);
        assert!(fine.is_aligned(0.05));
        assert!(fine.is_aligned(0.0));
        assert!(!fine.is_aligned(0.055));
        assert!(bounds(0.0, 1.0, 0.0).is_aligned(0.123));
    }

    #[test]
    fn immediate_cost_has_quarter_floor() {
        let catalog = Catalog::builtin().unwrap();
        let tax = catalog.policy("TAX_ADJUST").unwrap();
        assert_eq!(tax.immediate_cost(0.05), (tax.cost as f64 * 0.25).round() as i64);
        assert_eq!(tax.immediate_cost(-1.0), tax.cost);
    }

    #[test]
    fn misspelled_effect_key_fails_to_load() {
        let yaml = BUILTIN_CATALOG.replacen("treasury_income_per_turn", "treasury_incom_per_turn", 1);
        assert!(matches!(Catalog::parse(&yaml), Err(CatalogError::Yaml { .. })));
    }

    #[test]
    fn unknown_recipe_good_is_rejected() {
        let yaml = BUILTIN_CATALOG.replacen("grain: 1.0", "granite: 1.0", 1);
        assert!(matches!(
            Catalog::parse(&yaml),
            Err(CatalogError::UnknownReference { .. })
        ));
    }

    #[test]
    fn hint_conditions_all_apply() {
        let hint = IntelHint {
            id: "H".to_owned(),
            text: "t".to_owned(),
            conditions: HintConditions {
                min_shortages: Some(2),
                max_treasury: Some(1000),
                ..HintConditions::default()
            },
        };
        let world = WorldState {
            turn: 1,
            treasury: 500,
            population: 20_000,
            prosperity: 50.0,
            stability: 50.0,
            unrest: 10.0,
            tech_level: 5.0,
            last_action_ts: None,
        };
        assert!(hint.applies(&world, 2));
        assert!(!hint.applies(&world, 1));
    }
}
