//! Random world events: at most one per turn.
//!
//! [`choose_event`] makes one roll on the event stream to decide whether
//! anything fires, filters the catalog events by their conditions, and
//! picks one by cumulative base weight using the same generator.
//! [`apply_event`] mutates the world, market and sectors.

use std::collections::BTreeMap;

use rand::Rng;
use shinon_types::{EventRecord, SectorId, SectorState, WorldState};

use crate::catalog::{EventConditions, EventDefinition};
use crate::economy::Market;
use crate::rng::{RngStream, seeded_rng};

/// Floor for the multiplicative factors an event applies.
pub const MIN_EVENT_FACTOR: f64 = 0.05;

/// Whether an event's conditions hold for the given world and market.
pub fn conditions_met(conditions: &EventConditions, world: &WorldState, market: &Market) -> bool {
    let world_min = conditions
        .world_min
        .iter()
        .all(|(metric, bound)| metric.read(world) >= *bound);
    let world_max = conditions
        .world_max
        .iter()
        .all(|(metric, bound)| metric.read(world) <= *bound);
    let price_min = conditions
        .good_price_min
        .iter()
        .all(|(good, bound)| market.get(good).is_some_and(|g| g.price >= *bound));
    let price_max = conditions
        .good_price_max
        .iter()
        .all(|(good, bound)| market.get(good).is_some_and(|g| g.price <= *bound));
    world_min && world_max && price_min && price_max
}

/// Decide whether an event fires this turn and which one.
pub fn choose_event<'a>(
    events: &'a [EventDefinition],
    world: &WorldState,
    market: &Market,
    seed: u64,
    turn: u64,
    event_chance: f64,
) -> Option<&'a EventDefinition> {
    let mut rng = seeded_rng(seed, RngStream::Event, turn, "");
    let roll: f64 = rng.random();
    if roll >= event_chance {
        return None;
    }

    let candidates: Vec<(&EventDefinition, f64)> = events
        .iter()
        .filter(|event| conditions_met(&event.conditions, world, market))
        .map(|event| (event, event.base_weight.max(0.0)))
        .collect();
    let total: f64 = candidates.iter().map(|(_, w)| w).sum();
    if total <= 0.0 {
        return None;
    }

    let pick = rng.random_range(0.0..=total);
    let mut cumulative = 0.0;
    for (event, weight) in &candidates {
        cumulative += weight;
        if cumulative >= pick {
            return Some(*event);
        }
    }
    candidates.last().map(|(event, _)| *event)
}

fn factor(value: f64) -> f64 {
    (1.0 + value).max(MIN_EVENT_FACTOR)
}

/// Apply an event's effects and return its record.
pub fn apply_event(
    event: &EventDefinition,
    world: &mut WorldState,
    market: &mut Market,
    sectors: &mut BTreeMap<SectorId, SectorState>,
) -> EventRecord {
    let fx = &event.effects;
    fx.world_add.apply_to(world);

    for (good, value) in &fx.good_supply_mult {
        if let Some(entry) = market.get_mut(good) {
            entry.supply *= factor(*value);
        }
    }
    for (good, value) in &fx.good_demand_mult {
        if let Some(entry) = market.get_mut(good) {
            entry.demand *= factor(*value);
        }
    }
    for (good, value) in &fx.good_price_mult {
        if let Some(entry) = market.get_mut(good) {
            entry.price *= factor(*value);
        }
    }
    for (sector, value) in &fx.sector_efficiency_mult {
        if let Some(entry) = sectors.get_mut(sector) {
            entry.efficiency *= factor(*value);
        }
    }

    EventRecord {
        id: event.id.clone(),
        label: event.label.clone(),
        description: event.description.clone(),
    }
}
