//! The persistence seam used by the turn engine.
//!
//! [`StateStore`] abstracts where a save lives. The engine only ever talks
//! to this trait: it loads a [`GameState`], validates and simulates in
//! memory, and hands the complete result back through
//! [`StateStore::commit_turn`] so that a turn is either fully recorded or
//! not at all.
//!
//! [`MemoryStore`] keeps everything in ordered maps and is used by tests
//! and by callers that do not need a save file. The `SQLite` backend lives
//! in the `shinon-db` crate.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use shinon_types::{EventRecord, GameState, HistoryRecord, LoggedEvent, PolicyId, UnlockRecord};
use tracing::warn;

/// Metadata keys shared by every backend.
pub mod meta {
    /// Base seed of the save.
    pub const SEED: &str = "seed";
    /// RFC 3339 creation time.
    pub const CREATED_AT: &str = "created_at";
    /// Narration locale code.
    pub const LANGUAGE: &str = "language";
    /// Collapse flag (`1`/`0`).
    pub const COLLAPSE_ACTIVE: &str = "collapse_active";
    /// Consecutive non-negative turns while collapsed.
    pub const COLLAPSE_RECOVERY_STREAK: &str = "collapse_recovery_streak";
    /// Earliest turn of the next throttled unlock.
    pub const NEXT_UNLOCK_TURN: &str = "next_unlock_turn";
    /// Turn of the last unprompted intel hint.
    pub const LAST_AUTO_INTEL_TURN: &str = "last_auto_intel_turn";
    /// Id of the last intel hint shown.
    pub const LAST_INTEL_HINT_ID: &str = "last_intel_hint_id";
}

/// Errors raised by a [`StateStore`] backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No game has been initialised in this store.
    #[error("no game in store")]
    NoGame,

    /// A metadata value could not be interpreted.
    #[error("bad metadata value for {key}: {value}")]
    BadMeta {
        /// Metadata key.
        key: String,
        /// Raw stored value.
        value: String,
    },

    /// A stored JSON blob failed to (de)serialize.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// The backend itself failed.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Everything one advanced turn writes, committed atomically.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnCommit {
    /// State after the turn.
    pub state: GameState,
    /// Metadata entries to upsert (progression counters).
    pub meta: Vec<(String, String)>,
    /// Policies unlocked during the turn.
    pub unlocks: Vec<UnlockRecord>,
    /// The turn's history row.
    pub history: HistoryRecord,
    /// Events that fired during the turn.
    pub events: Vec<EventRecord>,
}

/// Storage for one save: world state, history, events, unlocks, metadata.
///
/// All methods are synchronous. Backends that drive an async client block
/// internally until the operation completes.
pub trait StateStore {
    /// Whether a game has been initialised.
    fn has_game(&self) -> Result<bool, StoreError>;

    /// Wipe any existing save and write a fresh one.
    ///
    /// Stores the seed and creation time and records `unlocks` with their
    /// provenance.
    fn init_new_game(
        &mut self,
        seed: u64,
        state: &GameState,
        unlocks: &[UnlockRecord],
    ) -> Result<(), StoreError>;

    /// Load the current state.
    ///
    /// The unlocked policy set is derived from the unlock rows.
    fn load_state(&self) -> Result<GameState, StoreError>;

    /// Overwrite the current state outside a turn.
    ///
    /// Policies in `state.unlocked_policies` that have no unlock row yet are
    /// recorded with source `restore`.
    fn save_state(&mut self, state: &GameState) -> Result<(), StoreError>;

    /// Write a whole turn in one transaction.
    fn commit_turn(&mut self, commit: &TurnCommit) -> Result<(), StoreError>;

    /// Up to `limit` history rows, newest first.
    fn history(&self, limit: usize) -> Result<Vec<HistoryRecord>, StoreError>;

    /// Insert or replace the history row for `record.turn`.
    fn append_history(&mut self, record: &HistoryRecord) -> Result<(), StoreError>;

    /// Insert or replace events keyed by `(turn, event id)`.
    fn append_events(&mut self, turn: u64, events: &[EventRecord]) -> Result<(), StoreError>;

    /// Events logged on turns `>= turn`, oldest first.
    fn events_since(&self, turn: u64) -> Result<Vec<LoggedEvent>, StoreError>;

    /// All unlock rows, ordered by policy id.
    fn unlocked_policy_rows(&self) -> Result<Vec<UnlockRecord>, StoreError>;

    /// Insert or replace one unlock row.
    fn unlock_policy(&mut self, record: &UnlockRecord) -> Result<(), StoreError>;

    /// Raw metadata value.
    fn get_meta(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Insert or replace a metadata value.
    fn set_meta(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// String metadata, or `default` when absent.
    fn get_str_meta(&self, key: &str, default: &str) -> Result<String, StoreError> {
        Ok(self.get_meta(key)?.unwrap_or_else(|| default.to_owned()))
    }

    /// Integer metadata, or `default` when absent or malformed.
    fn get_int_meta(&self, key: &str, default: i64) -> Result<i64, StoreError> {
        let Some(raw) = self.get_meta(key)? else {
            return Ok(default);
        };
        Ok(raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, "malformed integer metadata, using default");
            default
        }))
    }

    /// Boolean metadata stored as `1`/`0`, or `default` when absent.
    fn get_bool_meta(&self, key: &str, default: bool) -> Result<bool, StoreError> {
        Ok(self.get_int_meta(key, i64::from(default))? != 0)
    }

    /// Store an integer.
    fn set_int_meta(&mut self, key: &str, value: i64) -> Result<(), StoreError> {
        self.set_meta(key, &value.to_string())
    }

    /// Store a boolean as `1`/`0`.
    fn set_bool_meta(&mut self, key: &str, value: bool) -> Result<(), StoreError> {
        self.set_meta(key, if value { "1" } else { "0" })
    }

    /// The save's base seed, if one is recorded.
    fn seed(&self) -> Result<Option<u64>, StoreError> {
        match self.get_meta(meta::SEED)? {
            None => Ok(None),
            Some(raw) => match raw.trim().parse() {
                Ok(seed) => Ok(Some(seed)),
                Err(_) => Err(StoreError::BadMeta {
                    key: meta::SEED.to_owned(),
                    value: raw,
                }),
            },
        }
    }
}

/// Insert unlock rows for policies in `state` that have none yet.
fn restore_rows(
    unlocks: &mut BTreeMap<PolicyId, UnlockRecord>,
    state: &GameState,
) {
    for policy_id in &state.unlocked_policies {
        unlocks
            .entry(policy_id.clone())
            .or_insert_with(|| UnlockRecord {
                policy_id: policy_id.clone(),
                turn: state.world.turn,
                source: "restore".to_owned(),
            });
    }
}

/// A [`StateStore`] held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Option<GameState>,
    history: BTreeMap<u64, HistoryRecord>,
    events: BTreeMap<(u64, String), EventRecord>,
    unlocks: BTreeMap<PolicyId, UnlockRecord>,
    meta: BTreeMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creation time recorded by [`StateStore::init_new_game`].
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.meta
            .get(meta::CREATED_AT)
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|ts| ts.with_timezone(&Utc))
    }
}

impl StateStore for MemoryStore {
    fn has_game(&self) -> Result<bool, StoreError> {
        Ok(self.state.is_some())
    }

    fn init_new_game(
        &mut self,
        seed: u64,
        state: &GameState,
        unlocks: &[UnlockRecord],
    ) -> Result<(), StoreError> {
        *self = Self::default();
        self.meta.insert(meta::SEED.to_owned(), seed.to_string());
        self.meta
            .insert(meta::CREATED_AT.to_owned(), Utc::now().to_rfc3339());
        for record in unlocks {
            self.unlocks.insert(record.policy_id.clone(), record.clone());
        }
        restore_rows(&mut self.unlocks, state);
        self.state = Some(state.clone());
        Ok(())
    }

    fn load_state(&self) -> Result<GameState, StoreError> {
        let mut state = self.state.clone().ok_or(StoreError::NoGame)?;
        state.unlocked_policies = self.unlocks.keys().cloned().collect();
        Ok(state)
    }

    fn save_state(&mut self, state: &GameState) -> Result<(), StoreError> {
        restore_rows(&mut self.unlocks, state);
        self.state = Some(state.clone());
        Ok(())
    }

    fn commit_turn(&mut self, commit: &TurnCommit) -> Result<(), StoreError> {
        // Stage on a copy so a failure leaves the store untouched.
        let mut staged = self.clone();
        for record in &commit.unlocks {
            staged.unlock_policy(record)?;
        }
        staged.save_state(&commit.state)?;
        for (key, value) in &commit.meta {
            staged.set_meta(key, value)?;
        }
        staged.append_history(&commit.history)?;
        staged.append_events(commit.history.turn, &commit.events)?;
        *self = staged;
        Ok(())
    }

    fn history(&self, limit: usize) -> Result<Vec<HistoryRecord>, StoreError> {
        Ok(self.history.values().rev().take(limit).cloned().collect())
    }

    fn append_history(&mut self, record: &HistoryRecord) -> Result<(), StoreError> {
        self.history.insert(record.turn, record.clone());
        Ok(())
    }

    fn append_events(&mut self, turn: u64, events: &[EventRecord]) -> Result<(), StoreError> {
        for event in events {
            self.events
                .insert((turn, event.id.as_str().to_owned()), event.clone());
        }
        Ok(())
    }

    fn events_since(&self, turn: u64) -> Result<Vec<LoggedEvent>, StoreError> {
        Ok(self
            .events
            .range((turn, String::new())..)
            .map(|((t, _), record)| LoggedEvent {
                turn: *t,
                record: record.clone(),
            })
            .collect())
    }

    fn unlocked_policy_rows(&self) -> Result<Vec<UnlockRecord>, StoreError> {
        Ok(self.unlocks.values().cloned().collect())
    }

    fn unlock_policy(&mut self, record: &UnlockRecord) -> Result<(), StoreError> {
        self.unlocks.insert(record.policy_id.clone(), record.clone());
        Ok(())
    }

    fn get_meta(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.meta.get(key).cloned())
    }

    fn set_meta(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.meta.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use shinon_types::{TurnSummary, WorldState};

    use super::*;

    fn state(turn: u64) -> GameState {
        GameState {
            world: WorldState {
                turn,
                treasury: 1000,
                population: 50_000,
                prosperity: 50.0,
                stability: 50.0,
                unrest: 10.0,
                tech_level: 5.0,
                last_action_ts: None,
            },
            market: BTreeMap::new(),
            sectors: BTreeMap::new(),
            unlocked_policies: ["TAX_ADJUST".into()].into_iter().collect(),
            active_policies: BTreeMap::new(),
        }
    }

    fn history(turn: u64, net: i64) -> HistoryRecord {
        HistoryRecord {
            turn,
            timestamp: Utc::now(),
            action: "TAX_ADJUST".into(),
            cost: 10,
            summary: TurnSummary {
                net_cashflow: net,
                ..TurnSummary::default()
            },
        }
    }

    fn event(id: &str) -> EventRecord {
        EventRecord {
            id: id.into(),
            label: id.to_owned(),
            description: String::new(),
        }
    }

    #[test]
    fn empty_store_has_no_game() {
        let store = MemoryStore::new();
        assert!(!store.has_game().unwrap());
        assert!(matches!(store.load_state(), Err(StoreError::NoGame)));
        assert_eq!(store.seed().unwrap(), None);
    }

    #[test]
    fn init_records_seed_and_unlocks() {
        let mut store = MemoryStore::new();
        let unlock = UnlockRecord {
            policy_id: "TAX_ADJUST".into(),
            turn: 0,
            source: "new_game".to_owned(),
        };
        store.init_new_game(42, &state(0), &[unlock.clone()]).unwrap();
        assert!(store.has_game().unwrap());
        assert_eq!(store.seed().unwrap(), Some(42));
        assert!(store.created_at().is_some());
        assert_eq!(store.unlocked_policy_rows().unwrap(), vec![unlock]);
    }

    #[test]
    fn init_wipes_previous_game() {
        let mut store = MemoryStore::new();
        store.init_new_game(1, &state(0), &[]).unwrap();
        store.append_history(&history(1, 5)).unwrap();
        store.set_int_meta("next_unlock_turn", 9).unwrap();
        store.init_new_game(2, &state(0), &[]).unwrap();
        assert!(store.history(10).unwrap().is_empty());
        assert_eq!(store.get_int_meta("next_unlock_turn", 0).unwrap(), 0);
    }

    #[test]
    fn save_state_restores_missing_unlock_rows() {
        let mut store = MemoryStore::new();
        store.init_new_game(1, &state(0), &[]).unwrap();
        let mut next = state(3);
        next.unlocked_policies.insert("FUND_RESEARCH".into());
        store.save_state(&next).unwrap();
        let rows = store.unlocked_policy_rows().unwrap();
        let research = rows.iter().find(|r| r.policy_id.as_str() == "FUND_RESEARCH").unwrap();
        assert_eq!(research.source, "restore");
        assert_eq!(research.turn, 3);
        assert!(store.load_state().unwrap().unlocked_policies.contains("FUND_RESEARCH"));
    }

    #[test]
    fn history_is_newest_first_and_upserts() {
        let mut store = MemoryStore::new();
        for turn in 1..=4 {
            store.append_history(&history(turn, 1)).unwrap();
        }
        store.append_history(&history(2, 99)).unwrap();
        let rows = store.history(3).unwrap();
        let turns: Vec<_> = rows.iter().map(|r| r.turn).collect();
        assert_eq!(turns, vec![4, 3, 2]);
        assert_eq!(rows[2].summary.net_cashflow, 99);
        assert_eq!(store.history(100).unwrap().len(), 4);
    }

    #[test]
    fn events_upsert_by_turn_and_id() {
        let mut store = MemoryStore::new();
        store.append_events(1, &[event("DROUGHT")]).unwrap();
        store.append_events(1, &[event("DROUGHT")]).unwrap();
        store.append_events(3, &[event("PROTESTS")]).unwrap();
        assert_eq!(store.events_since(0).unwrap().len(), 2);
        let later = store.events_since(2).unwrap();
        assert_eq!(later.len(), 1);
        assert_eq!(later[0].turn, 3);
    }

    #[test]
    fn meta_helpers_fall_back_to_defaults() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get_int_meta("missing", -9999).unwrap(), -9999);
        assert!(store.get_bool_meta("missing", true).unwrap());
        store.set_meta("broken", "not-a-number").unwrap();
        assert_eq!(store.get_int_meta("broken", 7).unwrap(), 7);
        store.set_bool_meta("flag", true).unwrap();
        assert!(store.get_bool_meta("flag", false).unwrap());
        assert_eq!(store.get_str_meta("language", "en").unwrap(), "en");
    }

    #[test]
    fn malformed_seed_is_an_error() {
        let mut store = MemoryStore::new();
        store.set_meta(meta::SEED, "abc").unwrap();
        assert!(matches!(store.seed(), Err(StoreError::BadMeta { .. })));
    }

    #[test]
    fn commit_turn_writes_everything() {
        let mut store = MemoryStore::new();
        store.init_new_game(5, &state(0), &[]).unwrap();
        let commit = TurnCommit {
            state: state(1),
            meta: vec![(meta::COLLAPSE_ACTIVE.to_owned(), "1".to_owned())],
            unlocks: vec![UnlockRecord {
                policy_id: "FUND_RESEARCH".into(),
                turn: 1,
                source: "ramp".to_owned(),
            }],
            history: history(1, -50),
            events: vec![event("DROUGHT")],
        };
        store.commit_turn(&commit).unwrap();
        let loaded = store.load_state().unwrap();
        assert_eq!(loaded.world.turn, 1);
        assert!(loaded.unlocked_policies.contains("FUND_RESEARCH"));
        assert!(store.get_bool_meta(meta::COLLAPSE_ACTIVE, false).unwrap());
        assert_eq!(store.history(1).unwrap()[0].turn, 1);
        assert_eq!(store.events_since(1).unwrap().len(), 1);
        let research = store
            .unlocked_policy_rows()
            .unwrap()
            .into_iter()
            .find(|r| r.policy_id.as_str() == "FUND_RESEARCH")
            .unwrap();
        assert_eq!(research.source, "ramp");
    }
}
