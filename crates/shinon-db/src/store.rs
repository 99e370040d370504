//! [`SqliteStore`]: the [`StateStore`] backed by a `SQLite` save file.
//!
//! The console is synchronous, so the store owns a current-thread tokio
//! runtime whose only job is to drive [`sqlx`]. Every trait method blocks
//! until its query finishes. Writes that touch more than one row run in a
//! transaction; [`StateStore::commit_turn`] writes a whole turn in one.
//!
//! The pool holds a single connection. That keeps an in-memory database
//! alive for the lifetime of the store and serialises all access.

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shinon_core::store::meta;
use shinon_core::{StateStore, StoreError, TurnCommit};
use shinon_types::{
    CapacityProgress, EventRecord, GameState, HistoryRecord, LoggedEvent, MarketGood,
    PolicyRuntime, SectorState, UnlockRecord, WorldState,
};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqliteConnection, SqlitePool};
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, info};

use crate::error::DbError;
use crate::schema::{self, SCHEMA_VERSION_KEY};

/// Runtime fields of a policy kept as JSON in `active_policies.state_json`.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct RuntimeExtras {
    target: Option<String>,
    capacity: CapacityProgress,
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn to_u64(value: i64, column: &str) -> Result<u64, DbError> {
    u64::try_from(value).map_err(|err| DbError::Corrupt(format!("{column} {value}: {err}")))
}

fn to_u32(value: i64, column: &str) -> Result<u32, DbError> {
    u32::try_from(value).map_err(|err| DbError::Corrupt(format!("{column} {value}: {err}")))
}

/// A save file (or in-memory database) implementing [`StateStore`].
#[derive(Debug)]
pub struct SqliteStore {
    pool: SqlitePool,
    runtime: Runtime,
}

impl SqliteStore {
    /// Open or create the save file at `path` and migrate it.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the file cannot be opened or migrated.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);
        let store = Self::connect(options)?;
        info!(path = %path.display(), "Save file opened");
        Ok(store)
    }

    /// Open a fresh in-memory save.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the database cannot be created.
    pub fn in_memory() -> Result<Self, DbError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        Self::connect(options)
    }

    fn connect(options: SqliteConnectOptions) -> Result<Self, DbError> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        let pool = runtime.block_on(
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options),
        )?;
        let store = Self { pool, runtime };
        store.migrate()?;
        Ok(store)
    }

    /// Run the schema migrations again. Returns the version found before.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a migration step fails.
    pub fn migrate(&self) -> Result<i64, DbError> {
        self.runtime.block_on(async {
            let mut conn = self.pool.acquire().await?;
            schema::migrate(&mut conn).await
        })
    }

    /// The schema version recorded in the save.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails.
    pub fn schema_version(&self) -> Result<i64, DbError> {
        self.runtime.block_on(async {
            let mut conn = self.pool.acquire().await?;
            schema::stored_version(&mut conn).await
        })
    }

    /// The underlying pool.
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the pool.
    pub fn close(self) {
        self.runtime.block_on(self.pool.close());
        debug!("Save store closed");
    }

    fn block_on<T, F>(&self, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, DbError>>,
    {
        self.runtime.block_on(fut).map_err(StoreError::from)
    }
}

// =========================================================================
// Writes
// =========================================================================

async fn wipe(conn: &mut SqliteConnection) -> Result<(), DbError> {
    for statement in [
        "DELETE FROM world_state",
        "DELETE FROM market",
        "DELETE FROM sectors",
        "DELETE FROM active_policies",
        "DELETE FROM history",
        "DELETE FROM events_log",
        "DELETE FROM unlocked_policies",
    ] {
        sqlx::query(statement).execute(&mut *conn).await?;
    }
    sqlx::query("DELETE FROM meta WHERE key <> ?")
        .bind(SCHEMA_VERSION_KEY)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

async fn write_meta(conn: &mut SqliteConnection, key: &str, value: &str) -> Result<(), DbError> {
    sqlx::query(
        r"INSERT INTO meta (key, value) VALUES (?, ?)
          ON CONFLICT (key) DO UPDATE SET value = excluded.value",
    )
    .bind(key)
    .bind(value)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

async fn write_world(conn: &mut SqliteConnection, world: &WorldState) -> Result<(), DbError> {
    sqlx::query(
        r"INSERT INTO world_state
          (id, turn, treasury, population, prosperity, stability, unrest, tech_level, last_action_ts)
          VALUES (1, ?, ?, ?, ?, ?, ?, ?, ?)
          ON CONFLICT (id) DO UPDATE SET
            turn = excluded.turn,
            treasury = excluded.treasury,
            population = excluded.population,
            prosperity = excluded.prosperity,
            stability = excluded.stability,
            unrest = excluded.unrest,
            tech_level = excluded.tech_level,
            last_action_ts = excluded.last_action_ts",
    )
    .bind(to_i64(world.turn))
    .bind(world.treasury)
    .bind(world.population)
    .bind(world.prosperity)
    .bind(world.stability)
    .bind(world.unrest)
    .bind(world.tech_level)
    .bind(world.last_action_ts)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

async fn write_state(conn: &mut SqliteConnection, state: &GameState) -> Result<(), DbError> {
    write_world(conn, &state.world).await?;

    sqlx::query("DELETE FROM market").execute(&mut *conn).await?;
    for good in state.market.values() {
        sqlx::query(
            "INSERT INTO market (good_id, supply, demand, price, last_price) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(good.id.as_str())
        .bind(good.supply)
        .bind(good.demand)
        .bind(good.price)
        .bind(good.last_price)
        .execute(&mut *conn)
        .await?;
    }

    sqlx::query("DELETE FROM sectors").execute(&mut *conn).await?;
    for sector in state.sectors.values() {
        sqlx::query("INSERT INTO sectors (sector_id, capacity, efficiency, upkeep) VALUES (?, ?, ?, ?)")
            .bind(sector.id.as_str())
            .bind(sector.capacity)
            .bind(sector.efficiency)
            .bind(sector.upkeep)
            .execute(&mut *conn)
            .await?;
    }

    sqlx::query("DELETE FROM active_policies")
        .execute(&mut *conn)
        .await?;
    for runtime in state.active_policies.values() {
        let extras = serde_json::to_string(&RuntimeExtras {
            target: runtime.target.clone(),
            capacity: runtime.capacity,
        })?;
        sqlx::query(
            r"INSERT INTO active_policies
              (policy_id, remaining_ticks, cooldown_ticks, magnitude, state_json)
              VALUES (?, ?, ?, ?, ?)",
        )
        .bind(runtime.policy_id.as_str())
        .bind(i64::from(runtime.remaining_ticks))
        .bind(i64::from(runtime.cooldown_ticks))
        .bind(runtime.magnitude)
        .bind(extras)
        .execute(&mut *conn)
        .await?;
    }

    for policy_id in &state.unlocked_policies {
        sqlx::query(
            r"INSERT INTO unlocked_policies (policy_id, unlocked_turn, source)
              VALUES (?, ?, 'restore')
              ON CONFLICT (policy_id) DO NOTHING",
        )
        .bind(policy_id.as_str())
        .bind(to_i64(state.world.turn))
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

async fn write_unlock(conn: &mut SqliteConnection, record: &UnlockRecord) -> Result<(), DbError> {
    sqlx::query(
        r"INSERT INTO unlocked_policies (policy_id, unlocked_turn, source)
          VALUES (?, ?, ?)
          ON CONFLICT (policy_id) DO UPDATE SET
            unlocked_turn = excluded.unlocked_turn,
            source = excluded.source",
    )
    .bind(record.policy_id.as_str())
    .bind(to_i64(record.turn))
    .bind(record.source.as_str())
    .execute(&mut *conn)
    .await?;
    Ok(())
}

async fn write_history(conn: &mut SqliteConnection, record: &HistoryRecord) -> Result<(), DbError> {
    let summary = serde_json::to_string(&record.summary)?;
    sqlx::query(
        r"INSERT INTO history (turn, ts, action, cost, summary_json)
          VALUES (?, ?, ?, ?, ?)
          ON CONFLICT (turn) DO UPDATE SET
            ts = excluded.ts,
            action = excluded.action,
            cost = excluded.cost,
            summary_json = excluded.summary_json",
    )
    .bind(to_i64(record.turn))
    .bind(record.timestamp)
    .bind(record.action.as_str())
    .bind(record.cost)
    .bind(summary)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

async fn write_events(
    conn: &mut SqliteConnection,
    turn: u64,
    events: &[EventRecord],
) -> Result<(), DbError> {
    for event in events {
        let summary = serde_json::to_string(event)?;
        sqlx::query(
            r"INSERT INTO events_log (turn, event_id, summary_json)
              VALUES (?, ?, ?)
              ON CONFLICT (turn, event_id) DO UPDATE SET summary_json = excluded.summary_json",
        )
        .bind(to_i64(turn))
        .bind(event.id.as_str())
        .bind(summary)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

// =========================================================================
// Reads
// =========================================================================

fn world_from_row(row: &SqliteRow) -> Result<WorldState, DbError> {
    Ok(WorldState {
        turn: to_u64(row.try_get("turn")?, "turn")?,
        treasury: row.try_get("treasury")?,
        population: row.try_get("population")?,
        prosperity: row.try_get("prosperity")?,
        stability: row.try_get("stability")?,
        unrest: row.try_get("unrest")?,
        tech_level: row.try_get("tech_level")?,
        last_action_ts: row.try_get::<Option<DateTime<Utc>>, _>("last_action_ts")?,
    })
}

fn runtime_from_row(row: &SqliteRow) -> Result<PolicyRuntime, DbError> {
    let raw: String = row.try_get("state_json")?;
    let extras: RuntimeExtras = serde_json::from_str(&raw)?;
    let policy_id: String = row.try_get("policy_id")?;
    Ok(PolicyRuntime {
        policy_id: policy_id.into(),
        remaining_ticks: to_u32(row.try_get("remaining_ticks")?, "remaining_ticks")?,
        cooldown_ticks: to_u32(row.try_get("cooldown_ticks")?, "cooldown_ticks")?,
        magnitude: row.try_get("magnitude")?,
        target: extras.target,
        capacity: extras.capacity,
    })
}

fn unlock_from_row(row: &SqliteRow) -> Result<UnlockRecord, DbError> {
    let policy_id: String = row.try_get("policy_id")?;
    Ok(UnlockRecord {
        policy_id: policy_id.into(),
        turn: to_u64(row.try_get("unlocked_turn")?, "unlocked_turn")?,
        source: row.try_get("source")?,
    })
}

async fn read_unlocks(conn: &mut SqliteConnection) -> Result<Vec<UnlockRecord>, DbError> {
    let rows = sqlx::query(
        "SELECT policy_id, unlocked_turn, source FROM unlocked_policies ORDER BY policy_id",
    )
    .fetch_all(&mut *conn)
    .await?;
    rows.iter().map(unlock_from_row).collect()
}

async fn read_state(conn: &mut SqliteConnection) -> Result<Option<GameState>, DbError> {
    let Some(world_row) = sqlx::query(
        r"SELECT turn, treasury, population, prosperity, stability, unrest, tech_level, last_action_ts
          FROM world_state WHERE id = 1",
    )
    .fetch_optional(&mut *conn)
    .await?
    else {
        return Ok(None);
    };
    let world = world_from_row(&world_row)?;

    let mut market = BTreeMap::new();
    for row in sqlx::query("SELECT good_id, supply, demand, price, last_price FROM market")
        .fetch_all(&mut *conn)
        .await?
    {
        let id: String = row.try_get("good_id")?;
        let good = MarketGood {
            id: id.into(),
            supply: row.try_get("supply")?,
            demand: row.try_get("demand")?,
            price: row.try_get("price")?,
            last_price: row.try_get("last_price")?,
        };
        market.insert(good.id.clone(), good);
    }

    let mut sectors = BTreeMap::new();
    for row in sqlx::query("SELECT sector_id, capacity, efficiency, upkeep FROM sectors")
        .fetch_all(&mut *conn)
        .await?
    {
        let id: String = row.try_get("sector_id")?;
        let sector = SectorState {
            id: id.into(),
            capacity: row.try_get("capacity")?,
            efficiency: row.try_get("efficiency")?,
            upkeep: row.try_get("upkeep")?,
        };
        sectors.insert(sector.id.clone(), sector);
    }

    let mut active_policies = BTreeMap::new();
    for row in sqlx::query(
        "SELECT policy_id, remaining_ticks, cooldown_ticks, magnitude, state_json FROM active_policies",
    )
    .fetch_all(&mut *conn)
    .await?
    {
        let runtime = runtime_from_row(&row)?;
        active_policies.insert(runtime.policy_id.clone(), runtime);
    }

    let unlocked_policies = read_unlocks(conn)
        .await?
        .into_iter()
        .map(|row| row.policy_id)
        .collect();

    Ok(Some(GameState {
        world,
        market,
        sectors,
        unlocked_policies,
        active_policies,
    }))
}

async fn read_meta(conn: &mut SqliteConnection, key: &str) -> Result<Option<String>, DbError> {
    let row = sqlx::query("SELECT value FROM meta WHERE key = ?")
        .bind(key)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(row.map(|r| r.try_get("value")).transpose()?)
}

// =========================================================================
// StateStore
// =========================================================================

impl StateStore for SqliteStore {
    fn has_game(&self) -> Result<bool, StoreError> {
        self.block_on(async {
            let row = sqlx::query("SELECT 1 FROM world_state WHERE id = 1")
                .fetch_optional(&self.pool)
                .await?;
            Ok::<_, DbError>(row.is_some())
        })
    }

    fn init_new_game(
        &mut self,
        seed: u64,
        state: &GameState,
        unlocks: &[UnlockRecord],
    ) -> Result<(), StoreError> {
        self.block_on(async {
            let mut tx = self.pool.begin().await?;
            wipe(&mut tx).await?;
            write_meta(&mut tx, meta::SEED, &seed.to_string()).await?;
            write_meta(&mut tx, meta::CREATED_AT, &Utc::now().to_rfc3339()).await?;
            for record in unlocks {
                write_unlock(&mut tx, record).await?;
            }
            write_state(&mut tx, state).await?;
            tx.commit().await?;
            Ok::<_, DbError>(())
        })
    }

    fn load_state(&self) -> Result<GameState, StoreError> {
        let state = self.block_on(async {
            let mut conn = self.pool.acquire().await?;
            read_state(&mut conn).await
        })?;
        state.ok_or(StoreError::NoGame)
    }

    fn save_state(&mut self, state: &GameState) -> Result<(), StoreError> {
        self.block_on(async {
            let mut tx = self.pool.begin().await?;
            write_state(&mut tx, state).await?;
            tx.commit().await?;
            Ok::<_, DbError>(())
        })
    }

    fn commit_turn(&mut self, commit: &TurnCommit) -> Result<(), StoreError> {
        self.block_on(async {
            let mut tx = self.pool.begin().await?;
            for record in &commit.unlocks {
                write_unlock(&mut tx, record).await?;
            }
            write_state(&mut tx, &commit.state).await?;
            for (key, value) in &commit.meta {
                write_meta(&mut tx, key, value).await?;
            }
            write_history(&mut tx, &commit.history).await?;
            write_events(&mut tx, commit.history.turn, &commit.events).await?;
            tx.commit().await?;
            debug!(turn = commit.history.turn, "Turn committed");
            Ok::<_, DbError>(())
        })
    }

    fn history(&self, limit: usize) -> Result<Vec<HistoryRecord>, StoreError> {
        self.block_on(async {
            let rows = sqlx::query(
                r"SELECT turn, ts, action, cost, summary_json
                  FROM history ORDER BY turn DESC LIMIT ?",
            )
            .bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await?;
            rows.iter()
                .map(|row| -> Result<HistoryRecord, DbError> {
                    let action: String = row.try_get("action")?;
                    let summary: String = row.try_get("summary_json")?;
                    Ok(HistoryRecord {
                        turn: to_u64(row.try_get("turn")?, "turn")?,
                        timestamp: row.try_get("ts")?,
                        action: action.into(),
                        cost: row.try_get("cost")?,
                        summary: serde_json::from_str(&summary)?,
                    })
                })
                .collect::<Result<Vec<_>, DbError>>()
        })
    }

    fn append_history(&mut self, record: &HistoryRecord) -> Result<(), StoreError> {
        self.block_on(async {
            let mut conn = self.pool.acquire().await?;
            write_history(&mut conn, record).await
        })
    }

    fn append_events(&mut self, turn: u64, events: &[EventRecord]) -> Result<(), StoreError> {
        self.block_on(async {
            let mut tx = self.pool.begin().await?;
            write_events(&mut tx, turn, events).await?;
            tx.commit().await?;
            Ok::<_, DbError>(())
        })
    }

    fn events_since(&self, turn: u64) -> Result<Vec<LoggedEvent>, StoreError> {
        self.block_on(async {
            let rows = sqlx::query(
                r"SELECT turn, summary_json FROM events_log
                  WHERE turn >= ? ORDER BY turn, event_id",
            )
            .bind(to_i64(turn))
            .fetch_all(&self.pool)
            .await?;
            rows.iter()
                .map(|row| -> Result<LoggedEvent, DbError> {
                    let summary: String = row.try_get("summary_json")?;
                    Ok(LoggedEvent {
                        turn: to_u64(row.try_get("turn")?, "turn")?,
                        record: serde_json::from_str(&summary)?,
                    })
                })
                .collect::<Result<Vec<_>, DbError>>()
        })
    }

    fn unlocked_policy_rows(&self) -> Result<Vec<UnlockRecord>, StoreError> {
        self.block_on(async {
            let mut conn = self.pool.acquire().await?;
            read_unlocks(&mut conn).await
        })
    }

    fn unlock_policy(&mut self, record: &UnlockRecord) -> Result<(), StoreError> {
        self.block_on(async {
            let mut conn = self.pool.acquire().await?;
            write_unlock(&mut conn, record).await
        })
    }

    fn get_meta(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.block_on(async {
            let mut conn = self.pool.acquire().await?;
            read_meta(&mut conn, key).await
        })
    }

    fn set_meta(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.block_on(async {
            let mut conn = self.pool.acquire().await?;
            write_meta(&mut conn, key, value).await
        })
    }
}
