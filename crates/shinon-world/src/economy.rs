//! Market step: supply, demand and price for every good.
//!
//! One call to [`simulate_market`] runs five phases in a fixed order:
//!
//! 1. **Decay** -- carried-over supply and demand shrink to
//!    [`DECAY_FACTOR`] of their previous value (floor [`MIN_STOCK`]).
//! 2. **Production** -- each sector's throughput consumes its inputs
//!    (added to demand) and produces its outputs (added to supply).
//! 3. **Population** -- per-head needs scaled by a living-standard factor
//!    derived from prosperity are added to demand.
//! 4. **Modifiers** -- flat supply additions and demand multipliers from
//!    active policies.
//! 5. **Pricing** -- price blends toward the clamped demand/supply ratio,
//!    picks up seeded noise and any price multiplier, then is clamped to
//!    the good's band.

use std::collections::BTreeMap;

use shinon_types::{GoodId, MarketGood, SectorId, SectorState, WorldState};

use crate::catalog::Catalog;
use crate::effects::EffectTotals;
use crate::rng::bounded_noise;

/// The market keyed by good id.
pub type Market = BTreeMap<GoodId, MarketGood>;

/// Fraction of last turn's supply and demand that carries over.
pub const DECAY_FACTOR: f64 = 0.45;

/// Floor for carried-over supply and demand.
pub const MIN_STOCK: f64 = 0.1;

/// Guard for the demand/supply ratio.
const RATIO_EPSILON: f64 = 1e-6;

/// Bounds of the demand/supply ratio used for pricing.
const RATIO_MIN: f64 = 0.5;
const RATIO_MAX: f64 = 2.0;

/// Soft efficiency bounds in the throughput formula.
pub const EFFICIENCY_MIN: f64 = 0.05;
/// Upper soft efficiency bound.
pub const EFFICIENCY_MAX: f64 = 1.5;

/// Everything besides the market itself that the step reads.
#[derive(Debug, Clone, Copy)]
pub struct MarketContext<'a> {
    /// World scalars (population and prosperity drive demand).
    pub world: &'a WorldState,
    /// Mutable sector state (capacity, efficiency).
    pub sectors: &'a BTreeMap<SectorId, SectorState>,
    /// Static catalog (recipes, price bands, needs, tuning).
    pub catalog: &'a Catalog,
    /// Combined policy effects of the turn.
    pub effects: &'a EffectTotals,
    /// Game seed.
    pub seed: u64,
    /// Turn being simulated.
    pub turn: u64,
}

/// Units of throughput a sector delivers this turn.
pub fn sector_throughput(sector: &SectorState, effects: &EffectTotals) -> f64 {
    let bonus = effects
        .sector_efficiency_add
        .get(&sector.id)
        .copied()
        .unwrap_or(0.0);
    let efficiency = (sector.efficiency + bonus).clamp(EFFICIENCY_MIN, EFFICIENCY_MAX);
    let global = (1.0 + effects.global_output_mult).max(0.2);
    sector.capacity * efficiency * global
}

/// Living-standard multiplier on per-head demand.
pub fn living_standard(prosperity: f64) -> f64 {
    0.8 + prosperity / 200.0
}

fn linear_blend(from: f64, to: f64, k: f64) -> f64 {
    from + (to - from) * k
}

/// Run one market step and return the new market.
pub fn simulate_market(market: &Market, ctx: &MarketContext<'_>) -> Market {
    let mut next = market.clone();
    let effects = ctx.effects;

    // Decay
    for good in next.values_mut() {
        good.supply = (good.supply * DECAY_FACTOR).max(MIN_STOCK);
        good.demand = (good.demand * DECAY_FACTOR).max(MIN_STOCK);
        good.last_price = good.price;
    }

    // Production
    for sector in ctx.sectors.values() {
        let Some(recipe) = ctx.catalog.sectors.get(&sector.id) else {
            continue;
        };
        let throughput = sector_throughput(sector, effects);
        let output_factor = (1.0
            + effects
                .sector_output_mult
                .get(&sector.id)
                .copied()
                .unwrap_or(0.0))
        .max(0.2);

        for (good, amount) in &recipe.inputs {
            if let Some(entry) = next.get_mut(good) {
                entry.demand += throughput * amount;
            }
        }
        for (good, amount) in &recipe.outputs {
            if let Some(entry) = next.get_mut(good) {
                entry.supply += throughput * amount * output_factor;
            }
        }
    }

    // Population
    let living = living_standard(ctx.world.prosperity);
    let population = ctx.world.population as f64;
    for (good, need) in &ctx.catalog.population_needs {
        if let Some(entry) = next.get_mut(good) {
            entry.demand += population * need * living;
        }
    }

    // Modifiers
    for (good, add) in &effects.good_supply_add {
        if let Some(entry) = next.get_mut(good) {
            entry.supply += add;
        }
    }
    for (good, mult) in &effects.good_demand_mult {
        if let Some(entry) = next.get_mut(good) {
            entry.demand *= (1.0 + mult).max(0.1);
        }
    }
    for good in next.values_mut() {
        good.supply = good.supply.max(0.0);
        good.demand = good.demand.max(0.0);
    }

    // Pricing
    let economy = &ctx.catalog.economy;
    for (id, good) in &mut next {
        let ratio = (good.demand / good.supply.max(RATIO_EPSILON)).clamp(RATIO_MIN, RATIO_MAX);
        let trend = linear_blend(1.0, ratio, economy.k_demand);
        let noise = bounded_noise(ctx.seed, ctx.turn, id.as_str(), economy.noise_amplitude);
        let price_mult = (1.0 + effects.good_price_mult.get(id).copied().unwrap_or(0.0)).max(0.1);
        let raw = good.last_price * trend * (1.0 + noise) * price_mult;
        good.price = ctx
            .catalog
            .goods
            .get(id)
            .map_or(raw.max(0.0), |def| def.clamp_price(raw));
    }

    next
}

/// Clamp every price back into its band (after event multipliers).
pub fn clamp_prices(market: &mut Market, catalog: &Catalog) {
    for (id, good) in market.iter_mut() {
        if let Some(def) = catalog.goods.get(id) {
            good.price = def.clamp_price(good.price);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::worldgen::initial_state;

    fn run(catalog: &Catalog, effects: &EffectTotals, seed: u64, turn: u64) -> Market {
        let state = initial_state(catalog);
        let ctx = MarketContext {
            world: &state.world,
            sectors: &state.sectors,
            catalog,
            effects,
            seed,
            turn,
        };
        simulate_market(&state.market, &ctx)
    }

    #[test]
    fn step_is_deterministic() {
        let catalog = Catalog::builtin().unwrap();
        let effects = EffectTotals::default();
        assert_eq!(run(&catalog, &effects, 5, 1), run(&catalog, &effects, 5, 1));
    }

    #[test]
    fn seed_changes_noise() {
        let catalog = Catalog::builtin().unwrap();
        let effects = EffectTotals::default();
        let a = run(&catalog, &effects, 5, 1);
        let b = run(&catalog, &effects, 6, 1);
        assert!(a.iter().any(|(id, g)| (g.price - b[id].price).abs() > 1e-12));
    }

    #[test]
    fn prices_stay_in_band_and_last_price_is_recorded() {
        let catalog = Catalog::builtin().unwrap();
        let state = initial_state(&catalog);
        let market = run(&catalog, &EffectTotals::default(), 11, 1);
        for (id, good) in &market {
            let def = &catalog.goods[id];
            assert!(good.price >= def.min_price && good.price <= def.max_price);
            assert!((good.last_price - state.market[id].price).abs() < f64::EPSILON);
            assert!(good.supply >= 0.0 && good.demand >= 0.0);
        }
    }

    #[test]
    fn supply_addition_lowers_price_pressure() {
        let catalog = Catalog::builtin().unwrap();
        let base = run(&catalog, &EffectTotals::default(), 3, 2);
        let mut effects = EffectTotals::default();
        effects.good_supply_add.insert(GoodId::new("grain"), 500.0);
        let boosted = run(&catalog, &effects, 3, 2);
        assert!(boosted["grain"].supply > base["grain"].supply);
        assert!(boosted["grain"].price < base["grain"].price);
    }

    #[test]
    fn throughput_respects_soft_bounds() {
        let sector = SectorState {
            id: SectorId::new("industry"),
            capacity: 100.0,
            efficiency: 1.4,
            upkeep: 0.0,
        };
        let mut effects = EffectTotals::default();
        effects
            .sector_efficiency_add
            .insert(SectorId::new("industry"), 1.0);
        effects.global_output_mult = -5.0;
        let t = sector_throughput(&sector, &effects);
        assert!((t - 100.0 * EFFICIENCY_MAX * 0.2).abs() < 1e-9);
    }

    #[test]
    fn decay_floors_empty_stock() {
        let catalog = Catalog::builtin().unwrap();
        let mut state = initial_state(&catalog);
        state.sectors.clear();
        for good in state.market.values_mut() {
            good.supply = 0.0;
        }
        let ctx = MarketContext {
            world: &state.world,
            sectors: &state.sectors,
            catalog: &catalog,
            effects: &EffectTotals::default(),
            seed: 1,
            turn: 1,
        };
        let next = simulate_market(&state.market, &ctx);
        for good in next.values() {
            assert!((good.supply - MIN_STOCK).abs() < 1e-12);
        }
    }
}
