//! Save-file schema and forward-only migrations.
//!
//! The schema version lives in the `meta` table under `schema_version`.
//! A save with no `meta` table is brand new and receives the current
//! schema directly. Older saves are upgraded one step at a time; each step
//! checks for what it adds first, so re-running a migration is a no-op.
//!
//! | Version | Adds |
//! |---------|------|
//! | 1 | `meta`, `world_state`, `market`, `sectors`, `active_policies` |
//! | 2 | `history`, `events_log`, `active_policies.state_json` |
//! | 3 | `unlocked_policies` |

use sqlx::{Row, SqliteConnection};
use tracing::info;

use crate::error::DbError;

/// Schema version written by this build.
pub const SCHEMA_VERSION: i64 = 3;

/// Metadata key holding the schema version.
pub const SCHEMA_VERSION_KEY: &str = "schema_version";

const CREATE_META: &str = r"CREATE TABLE IF NOT EXISTS meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)";

const CREATE_WORLD_STATE: &str = r"CREATE TABLE IF NOT EXISTS world_state (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    turn INTEGER NOT NULL,
    treasury INTEGER NOT NULL,
    population INTEGER NOT NULL,
    prosperity REAL NOT NULL,
    stability REAL NOT NULL,
    unrest REAL NOT NULL,
    tech_level REAL NOT NULL,
    last_action_ts TEXT
)";

const CREATE_MARKET: &str = r"CREATE TABLE IF NOT EXISTS market (
    good_id TEXT PRIMARY KEY,
    supply REAL NOT NULL,
    demand REAL NOT NULL,
    price REAL NOT NULL,
    last_price REAL NOT NULL
)";

const CREATE_SECTORS: &str = r"CREATE TABLE IF NOT EXISTS sectors (
    sector_id TEXT PRIMARY KEY,
    capacity REAL NOT NULL,
    efficiency REAL NOT NULL,
    upkeep REAL NOT NULL
)";

const CREATE_ACTIVE_POLICIES_V1: &str = r"CREATE TABLE IF NOT EXISTS active_policies (
    policy_id TEXT PRIMARY KEY,
    remaining_ticks INTEGER NOT NULL,
    cooldown_ticks INTEGER NOT NULL,
    magnitude REAL NOT NULL
)";

const CREATE_ACTIVE_POLICIES: &str = r"CREATE TABLE IF NOT EXISTS active_policies (
    policy_id TEXT PRIMARY KEY,
    remaining_ticks INTEGER NOT NULL,
    cooldown_ticks INTEGER NOT NULL,
    magnitude REAL NOT NULL,
    state_json TEXT NOT NULL DEFAULT '{}'
)";

const ADD_STATE_JSON: &str =
    "ALTER TABLE active_policies ADD COLUMN state_json TEXT NOT NULL DEFAULT '{}'";

const CREATE_HISTORY: &str = r"CREATE TABLE IF NOT EXISTS history (
    turn INTEGER PRIMARY KEY,
    ts TEXT NOT NULL,
    action TEXT NOT NULL,
    cost INTEGER NOT NULL,
    summary_json TEXT NOT NULL
)";

const CREATE_EVENTS_LOG: &str = r"CREATE TABLE IF NOT EXISTS events_log (
    turn INTEGER NOT NULL,
    event_id TEXT NOT NULL,
    summary_json TEXT NOT NULL,
    PRIMARY KEY (turn, event_id)
)";

const CREATE_UNLOCKED_POLICIES: &str = r"CREATE TABLE IF NOT EXISTS unlocked_policies (
    policy_id TEXT PRIMARY KEY,
    unlocked_turn INTEGER NOT NULL,
    source TEXT NOT NULL
)";

/// Tables of a version-1 save, in creation order.
pub const V1_TABLES: [&str; 5] = [
    CREATE_META,
    CREATE_WORLD_STATE,
    CREATE_MARKET,
    CREATE_SECTORS,
    CREATE_ACTIVE_POLICIES_V1,
];

/// Bring the save on `conn` up to [`SCHEMA_VERSION`].
///
/// Returns the version the save had before migrating (`0` for a new file).
///
/// # Errors
///
/// Returns [`DbError::UnsupportedSchema`] for saves from a newer build and
/// [`DbError::Sqlite`] if a statement fails.
pub async fn migrate(conn: &mut SqliteConnection) -> Result<i64, DbError> {
    let found = if table_exists(conn, "meta").await? {
        stored_version(conn).await?
    } else {
        0
    };
    if found > SCHEMA_VERSION {
        return Err(DbError::UnsupportedSchema {
            found,
            supported: SCHEMA_VERSION,
        });
    }

    if found == 0 {
        create_current(conn).await?;
    } else {
        if found < 2 {
            migrate_to_v2(conn).await?;
        }
        if found < 3 {
            migrate_to_v3(conn).await?;
        }
    }
    set_version(conn, SCHEMA_VERSION).await?;

    if found != SCHEMA_VERSION {
        info!(from = found, to = SCHEMA_VERSION, "Save schema migrated");
    }
    Ok(found)
}

/// Version recorded in `meta`, or 1 for saves that predate the key.
pub async fn stored_version(conn: &mut SqliteConnection) -> Result<i64, DbError> {
    let row = sqlx::query("SELECT value FROM meta WHERE key = ?")
        .bind(SCHEMA_VERSION_KEY)
        .fetch_optional(&mut *conn)
        .await?;
    let Some(row) = row else {
        return Ok(1);
    };
    let raw: String = row.try_get("value")?;
    raw.trim()
        .parse()
        .map_err(|err| DbError::Corrupt(format!("schema_version {raw:?}: {err}")))
}

async fn create_current(conn: &mut SqliteConnection) -> Result<(), DbError> {
    for statement in [
        CREATE_META,
        CREATE_WORLD_STATE,
        CREATE_MARKET,
        CREATE_SECTORS,
        CREATE_ACTIVE_POLICIES,
        CREATE_HISTORY,
        CREATE_EVENTS_LOG,
        CREATE_UNLOCKED_POLICIES,
    ] {
        sqlx::query(statement).execute(&mut *conn).await?;
    }
    Ok(())
}

async fn migrate_to_v2(conn: &mut SqliteConnection) -> Result<(), DbError> {
    for statement in [CREATE_ACTIVE_POLICIES, CREATE_HISTORY, CREATE_EVENTS_LOG] {
        sqlx::query(statement).execute(&mut *conn).await?;
    }
    if !column_exists(conn, "active_policies", "state_json").await? {
        sqlx::query(ADD_STATE_JSON).execute(&mut *conn).await?;
    }
    Ok(())
}

async fn migrate_to_v3(conn: &mut SqliteConnection) -> Result<(), DbError> {
    sqlx::query(CREATE_UNLOCKED_POLICIES)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

async fn set_version(conn: &mut SqliteConnection, version: i64) -> Result<(), DbError> {
    sqlx::query(
        r"INSERT INTO meta (key, value) VALUES (?, ?)
          ON CONFLICT (key) DO UPDATE SET value = excluded.value",
    )
    .bind(SCHEMA_VERSION_KEY)
    .bind(version.to_string())
    .execute(&mut *conn)
    .await?;
    Ok(())
}

async fn table_exists(conn: &mut SqliteConnection, table: &str) -> Result<bool, DbError> {
    let row = sqlx::query("SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?")
        .bind(table)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(row.is_some())
}

async fn column_exists(
    conn: &mut SqliteConnection,
    table: &str,
    column: &str,
) -> Result<bool, DbError> {
    let row = sqlx::query("SELECT 1 FROM pragma_table_info(?) WHERE name = ?")
        .bind(table)
        .bind(column)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(row.is_some())
}
