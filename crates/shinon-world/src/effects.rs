//! Typed policy effects and their per-turn accumulation.
//!
//! A [`PolicyEffects`] value is the static effect description of one policy
//! as written in the catalog. Every effect category is a named field, and
//! the catalog is parsed with `deny_unknown_fields`, so a misspelled
//! category fails at load time instead of silently doing nothing.
//!
//! Each turn the engine folds every active runtime into one
//! [`EffectTotals`] through [`EffectTotals::add_policy`], scaling by the
//! runtime's magnitude and resolving the `target` placeholder to the
//! runtime's chosen target.

use std::collections::BTreeMap;

use serde::Deserialize;
use shinon_types::{GoodId, SectorId, WorldState};

// ---------------------------------------------------------------------------
// Target references
// ---------------------------------------------------------------------------

/// Key of a targeted effect entry.
///
/// The literal key `target` stands for whatever the operator chose at
/// enactment; any other key names a fixed catalog id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(from = "String")]
pub enum TargetRef {
    /// Resolved from the runtime's target.
    Target,
    /// A fixed sector or good id.
    Fixed(String),
}

impl From<String> for TargetRef {
    fn from(key: String) -> Self {
        if key == "target" {
            Self::Target
        } else {
            Self::Fixed(key)
        }
    }
}

impl TargetRef {
    /// Resolve against the runtime target, if any.
    pub fn resolve<'a>(&'a self, target: Option<&'a str>) -> Option<&'a str> {
        match self {
            Self::Target => target,
            Self::Fixed(id) => Some(id.as_str()),
        }
    }
}

// ---------------------------------------------------------------------------
// World deltas
// ---------------------------------------------------------------------------

/// Additive changes to the world scalars.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldDelta {
    /// Treasury change, rounded when applied.
    pub treasury: f64,
    /// Prosperity change.
    pub prosperity: f64,
    /// Stability change.
    pub stability: f64,
    /// Unrest change.
    pub unrest: f64,
    /// Technology change.
    pub tech_level: f64,
}

impl WorldDelta {
    /// Every component multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            treasury: self.treasury * factor,
            prosperity: self.prosperity * factor,
            stability: self.stability * factor,
            unrest: self.unrest * factor,
            tech_level: self.tech_level * factor,
        }
    }

    /// Add another delta component-wise.
    pub fn accumulate(&mut self, other: &Self) {
        self.treasury += other.treasury;
        self.prosperity += other.prosperity;
        self.stability += other.stability;
        self.unrest += other.unrest;
        self.tech_level += other.tech_level;
    }

    /// Apply to the world. Scalars are clamped later in the turn.
    pub fn apply_to(&self, world: &mut WorldState) {
        world.treasury += self.treasury.round() as i64;
        world.prosperity += self.prosperity;
        world.stability += self.stability;
        world.unrest += self.unrest;
        world.tech_level += self.tech_level;
    }
}

// ---------------------------------------------------------------------------
// Static policy effects
// ---------------------------------------------------------------------------

/// A one-shot capacity grant that fires after a delay.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CapacityGrant {
    /// Active turns to wait before the grant fires.
    pub delay: u32,
    /// Capacity added per sector, scaled by magnitude.
    pub sector_add: BTreeMap<TargetRef, f64>,
}

impl CapacityGrant {
    /// Resolved `(sector, amount)` pairs for one runtime.
    pub fn resolve(&self, magnitude: f64, target: Option<&str>) -> Vec<(SectorId, f64)> {
        self.sector_add
            .iter()
            .filter_map(|(key, value)| {
                key.resolve(target)
                    .map(|id| (SectorId::new(id), value * magnitude))
            })
            .collect()
    }
}

/// Effect description of one policy.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicyEffects {
    /// Direct world-scalar additions per active turn.
    pub world_add: WorldDelta,
    /// Treasury credited per active turn.
    pub treasury_income_per_turn: f64,
    /// Treasury debited per active turn, scaled by `|magnitude|`.
    pub treasury_upkeep_per_turn: f64,
    /// Added to the global output multiplier.
    pub global_output_mult: f64,
    /// Added to the unrest-per-shortage factor.
    pub shortage_unrest_factor_add: f64,
    /// Added to a sector's output multiplier.
    pub sector_output_mult: BTreeMap<TargetRef, f64>,
    /// Added to a sector's efficiency in the throughput formula.
    pub sector_efficiency_add: BTreeMap<TargetRef, f64>,
    /// Flat units added to a good's supply.
    pub good_supply_add: BTreeMap<TargetRef, f64>,
    /// Added to a good's demand multiplier.
    pub good_demand_mult: BTreeMap<TargetRef, f64>,
    /// Added to a good's price multiplier.
    pub good_price_mult: BTreeMap<TargetRef, f64>,
    /// Treasury cost per unit of positive supply added.
    pub import_cost_per_unit: f64,
    /// Optional delayed capacity grant.
    pub capacity: Option<CapacityGrant>,
}

impl PolicyEffects {
    /// Whether any entry uses the `target` placeholder.
    pub fn uses_target_placeholder(&self) -> bool {
        let maps = [
            &self.sector_output_mult,
            &self.sector_efficiency_add,
            &self.good_supply_add,
            &self.good_demand_mult,
            &self.good_price_mult,
        ];
        maps.iter().any(|m| m.contains_key(&TargetRef::Target))
            || self
                .capacity
                .as_ref()
                .is_some_and(|c| c.sector_add.contains_key(&TargetRef::Target))
    }

    /// Fixed sector ids this policy names.
    pub fn fixed_sector_refs(&self) -> impl Iterator<Item = &str> {
        let capacity = self
            .capacity
            .iter()
            .flat_map(|c| c.sector_add.keys());
        self.sector_output_mult
            .keys()
            .chain(self.sector_efficiency_add.keys())
            .chain(capacity)
            .filter_map(|key| key.resolve(None))
    }

    /// Fixed good ids this policy names.
    pub fn fixed_good_refs(&self) -> impl Iterator<Item = &str> {
        self.good_supply_add
            .keys()
            .chain(self.good_demand_mult.keys())
            .chain(self.good_price_mult.keys())
            .filter_map(|key| key.resolve(None))
    }
}

// ---------------------------------------------------------------------------
// Per-turn totals
// ---------------------------------------------------------------------------

/// Combined effect of every active policy for one turn.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectTotals {
    /// Summed world-scalar additions.
    pub world_add: WorldDelta,
    /// Treasury income.
    pub treasury_income: f64,
    /// Treasury upkeep.
    pub treasury_upkeep: f64,
    /// Cost of imported units.
    pub import_cost: f64,
    /// Global output multiplier offset.
    pub global_output_mult: f64,
    /// Unrest-per-shortage offset.
    pub shortage_unrest_factor_add: f64,
    /// Sector output multiplier offsets.
    pub sector_output_mult: BTreeMap<SectorId, f64>,
    /// Sector efficiency offsets.
    pub sector_efficiency_add: BTreeMap<SectorId, f64>,
    /// Flat supply additions.
    pub good_supply_add: BTreeMap<GoodId, f64>,
    /// Demand multiplier offsets.
    pub good_demand_mult: BTreeMap<GoodId, f64>,
    /// Price multiplier offsets.
    pub good_price_mult: BTreeMap<GoodId, f64>,
}

fn add_keyed<K: Ord + From<String>>(
    into: &mut BTreeMap<K, f64>,
    from: &BTreeMap<TargetRef, f64>,
    magnitude: f64,
    target: Option<&str>,
) {
    for (key, value) in from {
        if let Some(id) = key.resolve(target) {
            *into.entry(K::from(id.to_owned())).or_insert(0.0) += value * magnitude;
        }
    }
}

fn merge_keyed<K: Ord + Clone>(into: &mut BTreeMap<K, f64>, from: &BTreeMap<K, f64>) {
    for (key, value) in from {
        *into.entry(key.clone()).or_insert(0.0) += value;
    }
}

impl EffectTotals {
    /// Fold one active policy into the totals.
    ///
    /// Capacity grants are not handled here; they mutate sector state and
    /// the runtime's progress and are applied by the turn engine.
    pub fn add_policy(&mut self, effects: &PolicyEffects, magnitude: f64, target: Option<&str>) {
        self.world_add
            .accumulate(&effects.world_add.scaled(magnitude));
        self.treasury_income += effects.treasury_income_per_turn * magnitude;
        self.treasury_upkeep += effects.treasury_upkeep_per_turn * magnitude.abs();
        self.global_output_mult += effects.global_output_mult * magnitude;
        self.shortage_unrest_factor_add += effects.shortage_unrest_factor_add * magnitude;

        add_keyed(&mut self.sector_output_mult, &effects.sector_output_mult, magnitude, target);
        add_keyed(&mut self.sector_efficiency_add, &effects.sector_efficiency_add, magnitude, target);
        add_keyed(&mut self.good_demand_mult, &effects.good_demand_mult, magnitude, target);
        add_keyed(&mut self.good_price_mult, &effects.good_price_mult, magnitude, target);

        for (key, value) in &effects.good_supply_add {
            if let Some(id) = key.resolve(target) {
                let amount = value * magnitude;
                *self.good_supply_add.entry(GoodId::new(id)).or_insert(0.0) += amount;
                self.import_cost += amount.max(0.0) * effects.import_cost_per_unit;
            }
        }
    }

    /// Add another set of totals.
    pub fn merge(&mut self, other: &Self) {
        self.world_add.accumulate(&other.world_add);
        self.treasury_income += other.treasury_income;
        self.treasury_upkeep += other.treasury_upkeep;
        self.import_cost += other.import_cost;
        self.global_output_mult += other.global_output_mult;
        self.shortage_unrest_factor_add += other.shortage_unrest_factor_add;
        merge_keyed(&mut self.sector_output_mult, &other.sector_output_mult);
        merge_keyed(&mut self.sector_efficiency_add, &other.sector_efficiency_add);
        merge_keyed(&mut self.good_supply_add, &other.good_supply_add);
        merge_keyed(&mut self.good_demand_mult, &other.good_demand_mult);
        merge_keyed(&mut self.good_price_mult, &other.good_price_mult);
    }

    /// Recurring treasury cost of the turn (policy upkeep plus imports).
    pub fn recurring_cost(&self) -> f64 {
        self.treasury_upkeep + self.import_cost
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn import_effects() -> PolicyEffects {
        serde_yml::from_str(
            "good_supply_add: { target: 12.0 }\nimport_cost_per_unit: 6.0\ntreasury_upkeep_per_turn: 100.0\n",
        )
        .unwrap()
    }

    #[test]
    fn unknown_effect_key_is_rejected() {
        let parsed: Result<PolicyEffects, _> = serde_yml::from_str("world_addd: { unrest: 1.0 }\n");
        assert!(parsed.is_err());
        let parsed: Result<PolicyEffects, _> = serde_yml::from_str("world_add: { unrset: 1.0 }\n");
        assert!(parsed.is_err());
    }

    #[test]
    fn placeholder_resolves_to_runtime_target() {
        let mut totals = EffectTotals::default();
        totals.add_policy(&import_effects(), 10.0, Some("grain"));
        assert!((totals.good_supply_add["grain"] - 120.0).abs() < 1e-9);
        assert!((totals.import_cost - 720.0).abs() < 1e-9);
        assert!((totals.treasury_upkeep - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn placeholder_without_target_is_skipped() {
        let mut totals = EffectTotals::default();
        totals.add_policy(&import_effects(), 10.0, None);
        assert!(totals.good_supply_add.is_empty());
        assert!(totals.import_cost.abs() < f64::EPSILON);
    }

    #[test]
    fn upkeep_uses_absolute_magnitude() {
        let effects: PolicyEffects =
            serde_yml::from_str("treasury_income_per_turn: 1000.0\ntreasury_upkeep_per_turn: 50.0\n").unwrap();
        let mut totals = EffectTotals::default();
        totals.add_policy(&effects, -0.5, None);
        assert!((totals.treasury_income + 500.0).abs() < 1e-9);
        assert!((totals.treasury_upkeep - 25.0).abs() < 1e-9);
    }

    #[test]
    fn merge_sums_keyed_entries() {
        let effects: PolicyEffects =
            serde_yml::from_str("sector_output_mult: { industry: 0.1 }\nworld_add: { unrest: 2.0 }\n").unwrap();
        let mut a = EffectTotals::default();
        a.add_policy(&effects, 1.0, None);
        let mut b = EffectTotals::default();
        b.add_policy(&effects, 0.5, None);
        a.merge(&b);
        assert!((a.sector_output_mult["industry"] - 0.15).abs() < 1e-9);
        assert!((a.world_add.unrest - 3.0).abs() < 1e-9);
    }

    #[test]
    fn capacity_grant_resolves_target() {
        let effects: PolicyEffects =
            serde_yml::from_str("capacity: { delay: 2, sector_add: { target: 60.0 } }\n").unwrap();
        let grant = effects.capacity.as_ref().unwrap();
        assert_eq!(grant.delay, 2);
        let resolved = grant.resolve(1.5, Some("industry"));
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].0.as_str(), "industry");
        assert!((resolved[0].1 - 90.0).abs() < 1e-9);
        assert!(effects.uses_target_placeholder());
    }

    #[test]
    fn world_delta_rounds_treasury() {
        let mut world = WorldState {
            turn: 0,
            treasury: 100,
            population: 50_000,
            prosperity: 50.0,
            stability: 50.0,
            unrest: 10.0,
            tech_level: 5.0,
            last_action_ts: None,
        };
        let delta = WorldDelta {
            treasury: 10.6,
            unrest: -2.0,
            ..WorldDelta::default()
        };
        delta.apply_to(&mut world);
        assert_eq!(world.treasury, 111);
        assert!((world.unrest - 8.0).abs() < 1e-9);
    }
}
