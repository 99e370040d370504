//! New-game state built from the catalog.

use std::collections::{BTreeMap, BTreeSet};

use shinon_types::{GameState, MarketGood, SectorState, WorldState};

use crate::catalog::Catalog;

/// Build the turn-0 state: catalog world values, every good at its base
/// supply/demand/price, every sector at its base capacity, and the start
/// loadout unlocked.
pub fn initial_state(catalog: &Catalog) -> GameState {
    let defaults = &catalog.world;
    let world = WorldState {
        turn: 0,
        treasury: defaults.treasury,
        population: defaults.population,
        prosperity: defaults.prosperity,
        stability: defaults.stability,
        unrest: defaults.unrest,
        tech_level: defaults.tech_level,
        last_action_ts: None,
    };

    let market: BTreeMap<_, _> = catalog
        .goods
        .values()
        .map(|good| {
            let entry = MarketGood {
                id: good.id.clone(),
                supply: good.base_supply,
                demand: good.base_demand,
                price: good.base_price,
                last_price: good.base_price,
            };
            (good.id.clone(), entry)
        })
        .collect();

    let sectors: BTreeMap<_, _> = catalog
        .sectors
        .values()
        .map(|sector| {
            let entry = SectorState {
                id: sector.id.clone(),
                capacity: sector.capacity,
                efficiency: sector.efficiency,
                upkeep: sector.upkeep,
            };
            (sector.id.clone(), entry)
        })
        .collect();

    let unlocked_policies: BTreeSet<_> = catalog.start_loadout.iter().cloned().collect();

    GameState {
        world,
        market,
        sectors,
        unlocked_policies,
        active_policies: BTreeMap::new(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_mirrors_catalog() {
        let catalog = Catalog::builtin().unwrap();
        let state = initial_state(&catalog);
        assert_eq!(state.world.turn, 0);
        assert_eq!(state.world.treasury, catalog.world.treasury);
        assert!(state.market.keys().eq(catalog.goods.keys()));
        assert!(state.sectors.keys().eq(catalog.sectors.keys()));
        assert!(state.active_policies.is_empty());
        assert!(state.unlocked_policies.contains("TAX_ADJUST"));
        assert!(state.unlocked_policies.contains("SUBSIDY_SECTOR"));
        assert!(state.unlocked_policies.contains("IMPORT_PROGRAM"));
        assert!(!state.unlocked_policies.contains("FUND_RESEARCH"));
    }

    #[test]
    fn prices_start_at_base() {
        let catalog = Catalog::builtin().unwrap();
        let state = initial_state(&catalog);
        for (id, good) in &state.market {
            let def = &catalog.goods[id];
            assert!((good.price - def.base_price).abs() < f64::EPSILON);
            assert!((good.last_price - def.base_price).abs() < f64::EPSILON);
        }
    }
}
