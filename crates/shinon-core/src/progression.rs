//! Collapse and unlock progression.
//!
//! Two small state machines run at the end of every turn:
//!
//! - **Collapse**: entered when the treasury and the trailing cashflow are
//!   both negative; cleared after [`RECOVERY_TURNS`] consecutive turns with
//!   both non-negative. While active, emergency-tier policies become
//!   available.
//! - **Unlock ramp**: at most one standard-tier policy per turn becomes
//!   available according to the catalog's unlock rules, throttled to one
//!   every [`UNLOCK_SPACING`] turns from turn [`UNLOCK_THROTTLE_FROM`] on.

use std::collections::BTreeSet;

use shinon_types::{GameState, PolicyId, PolicyStatus};
use shinon_world::{Catalog, PolicyDefinition, UnlockRule};

use crate::store::{StateStore, StoreError, meta};

/// History rows (including the current turn) summed for the trailing cashflow.
pub const CASHFLOW_WINDOW: usize = 3;

/// Consecutive healthy turns needed to leave a collapse.
pub const RECOVERY_TURNS: u32 = 2;

/// First turn at which unlocks are throttled.
pub const UNLOCK_THROTTLE_FROM: u64 = 6;

/// Minimum turns between throttled unlocks.
pub const UNLOCK_SPACING: u64 = 3;

/// Outcome of one collapse update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollapseTransition {
    /// The nation just entered a collapse.
    Entered,
    /// A collapse just ended.
    Cleared,
    /// No change of the flag.
    Unchanged,
}

/// Persisted progression counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progression {
    /// Whether a collapse is in progress.
    pub collapse_active: bool,
    /// Healthy turns in a row while collapsed.
    pub recovery_streak: u32,
    /// Earliest turn for the next throttled unlock.
    pub next_unlock_turn: u64,
}

impl Progression {
    /// Read the counters from store metadata.
    pub fn load<S: StateStore + ?Sized>(store: &S) -> Result<Self, StoreError> {
        Ok(Self {
            collapse_active: store.get_bool_meta(meta::COLLAPSE_ACTIVE, false)?,
            recovery_streak: u32::try_from(store.get_int_meta(meta::COLLAPSE_RECOVERY_STREAK, 0)?)
                .unwrap_or(0),
            next_unlock_turn: u64::try_from(store.get_int_meta(meta::NEXT_UNLOCK_TURN, 0)?)
                .unwrap_or(0),
        })
    }

    /// Metadata entries that persist these counters.
    pub fn meta_entries(&self) -> Vec<(String, String)> {
        vec![
            (
                meta::COLLAPSE_ACTIVE.to_owned(),
                if self.collapse_active { "1" } else { "0" }.to_owned(),
            ),
            (
                meta::COLLAPSE_RECOVERY_STREAK.to_owned(),
                self.recovery_streak.to_string(),
            ),
            (
                meta::NEXT_UNLOCK_TURN.to_owned(),
                self.next_unlock_turn.to_string(),
            ),
        ]
    }

    /// Advance the collapse machine with the post-turn treasury and
    /// trailing cashflow.
    pub fn update_collapse(&mut self, treasury: i64, trailing_cashflow: i64) -> CollapseTransition {
        let was_active = self.collapse_active;
        if treasury < 0 && trailing_cashflow < 0 {
            self.collapse_active = true;
            self.recovery_streak = 0;
        } else if self.collapse_active && treasury >= 0 && trailing_cashflow >= 0 {
            self.recovery_streak += 1;
            if self.recovery_streak >= RECOVERY_TURNS {
                self.collapse_active = false;
                self.recovery_streak = 0;
            }
        } else {
            self.recovery_streak = 0;
        }

        match (was_active, self.collapse_active) {
            (false, true) => CollapseTransition::Entered,
            (true, false) => CollapseTransition::Cleared,
            _ => CollapseTransition::Unchanged,
        }
    }

    /// Pick the policy to unlock at `turn`, if any, and update the throttle.
    ///
    /// Only the lowest eligible rule is considered. Rules are ordered by
    /// `(min_turn, min_actions, policy_id)`, and every advanced turn counts
    /// as one action.
    pub fn next_unlock<'a>(
        &mut self,
        catalog: &'a Catalog,
        unlocked: &BTreeSet<PolicyId>,
        turn: u64,
    ) -> Option<&'a UnlockRule> {
        if turn == 0 {
            return None;
        }
        let candidate = catalog.unlocks.iter().find(|rule| {
            !unlocked.contains(&rule.policy_id)
                && catalog
                    .policy(rule.policy_id.as_str())
                    .is_some_and(|p| !p.is_emergency())
                && turn >= rule.min_turn
                && turn >= rule.min_actions
        })?;

        if turn >= UNLOCK_THROTTLE_FROM && turn < self.next_unlock_turn {
            return None;
        }
        if turn >= UNLOCK_THROTTLE_FROM {
            self.next_unlock_turn = turn + UNLOCK_SPACING;
        }
        Some(candidate)
    }
}

/// Status of `policy` for the given state and collapse flag.
///
/// A policy that is not currently enactable reports `Locked` even when a
/// runtime from an earlier collapse still ticks.
pub fn policy_status(state: &GameState, policy: &PolicyDefinition, collapse_active: bool) -> PolicyStatus {
    if !is_enactable_tier(state, policy, collapse_active) {
        return PolicyStatus::Locked;
    }
    match state.active_policies.get(&policy.id) {
        Some(runtime) if runtime.remaining_ticks > 0 => PolicyStatus::Active,
        Some(runtime) if runtime.cooldown_ticks > 0 => PolicyStatus::Cooldown,
        _ => PolicyStatus::Available,
    }
}

/// Whether the policy's tier lets the operator enact it right now.
pub fn is_enactable_tier(state: &GameState, policy: &PolicyDefinition, collapse_active: bool) -> bool {
    if policy.is_emergency() {
        collapse_active
    } else {
        state.unlocked_policies.contains(&policy.id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use shinon_types::{CapacityProgress, PolicyRuntime};
    use shinon_world::initial_state;

    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn collapse_enters_on_double_deficit() {
        let mut p = Progression::default();
        assert_eq!(p.update_collapse(-10, 5), CollapseTransition::Unchanged);
        assert!(!p.collapse_active);
        assert_eq!(p.update_collapse(-10, -5), CollapseTransition::Entered);
        assert!(p.collapse_active);
    }

    #[test]
    fn collapse_clears_after_two_healthy_turns() {
        let mut p = Progression {
            collapse_active: true,
            ..Progression::default()
        };
        assert_eq!(p.update_collapse(0, 0), CollapseTransition::Unchanged);
        assert_eq!(p.recovery_streak, 1);
        assert_eq!(p.update_collapse(100, 20), CollapseTransition::Cleared);
        assert!(!p.collapse_active);
        assert_eq!(p.recovery_streak, 0);
    }

    #[test]
    fn mixed_turn_resets_recovery() {
        let mut p = Progression {
            collapse_active: true,
            recovery_streak: 1,
            ..Progression::default()
        };
        // Positive treasury but negative trailing cashflow.
        p.update_collapse(100, -1);
        assert!(p.collapse_active);
        assert_eq!(p.recovery_streak, 0);
    }

    #[test]
    fn counters_round_trip_through_meta() {
        let mut store = MemoryStore::new();
        let p = Progression {
            collapse_active: true,
            recovery_streak: 1,
            next_unlock_turn: 12,
        };
        for (key, value) in p.meta_entries() {
            store.set_meta(&key, &value).unwrap();
        }
        assert_eq!(Progression::load(&store).unwrap(), p);
        assert_eq!(Progression::load(&MemoryStore::new()).unwrap(), Progression::default());
    }

    #[test]
    fn ramp_unlocks_one_per_turn_then_throttles() {
        let catalog = Catalog::builtin().unwrap();
        let mut unlocked: BTreeSet<PolicyId> = catalog.start_loadout.iter().cloned().collect();
        let mut p = Progression::default();
        let mut order = Vec::new();
        for turn in 1..=12 {
            if let Some(rule) = p.next_unlock(&catalog, &unlocked, turn) {
                unlocked.insert(rule.policy_id.clone());
                order.push((turn, rule.policy_id.as_str().to_owned()));
            }
        }
        let expected = vec![
            (1, "FUND_RESEARCH"),
            (2, "SECURITY_BUDGET"),
            (3, "RATIONING"),
            (4, "WORK_HOURS_REFORM"),
            (5, "BUILD_INFRA"),
            (6, "PRICE_STABILIZER"),
            (9, "LOGISTICS_PUSH"),
        ];
        let got: Vec<_> = order.iter().map(|(t, id)| (*t, id.as_str())).collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn turn_zero_never_unlocks() {
        let catalog = Catalog::builtin().unwrap();
        let mut p = Progression::default();
        assert!(p.next_unlock(&catalog, &BTreeSet::new(), 0).is_none());
    }

    #[test]
    fn status_follows_runtime_and_tier() {
        let catalog = Catalog::builtin().unwrap();
        let mut state = initial_state(&catalog);
        let tax = catalog.policy("TAX_ADJUST").unwrap();
        let sos = catalog.policy("SOS_CREDIT").unwrap();
        let research = catalog.policy("FUND_RESEARCH").unwrap();

        assert_eq!(policy_status(&state, tax, false), PolicyStatus::Available);
        assert_eq!(policy_status(&state, research, false), PolicyStatus::Locked);
        assert_eq!(policy_status(&state, sos, false), PolicyStatus::Locked);
        assert_eq!(policy_status(&state, sos, true), PolicyStatus::Available);

        let mut runtime = PolicyRuntime {
            policy_id: tax.id.clone(),
            remaining_ticks: 2,
            cooldown_ticks: 0,
            magnitude: 0.05,
            target: None,
            capacity: CapacityProgress::None,
        };
        state.active_policies.insert(tax.id.clone(), runtime.clone());
        assert_eq!(policy_status(&state, tax, false), PolicyStatus::Active);
        runtime.remaining_ticks = 0;
        runtime.cooldown_ticks = 1;
        state.active_policies.insert(tax.id.clone(), runtime);
        assert_eq!(policy_status(&state, tax, false), PolicyStatus::Cooldown);
    }
}
