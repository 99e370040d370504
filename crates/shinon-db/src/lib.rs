//! `SQLite` save store for the Shinon simulation.
//!
//! A save is a single `SQLite` file holding the current world, market,
//! sectors, running policies, unlock rows, turn history, the event log and
//! a small key/value metadata table. [`SqliteStore`] implements the
//! [`StateStore`] seam from `shinon-core`, so the turn engine never sees
//! SQL.
//!
//! # Modules
//!
//! - [`error`] -- [`DbError`] and its mapping into [`StoreError`].
//! - [`schema`] -- Table definitions and forward-only migrations.
//! - [`store`] -- [`SqliteStore`].
//!
//! [`StateStore`]: shinon_core::StateStore
//! [`StoreError`]: shinon_core::StoreError

pub mod error;
pub mod schema;
pub mod store;

pub use error::DbError;
pub use schema::SCHEMA_VERSION;
pub use store::SqliteStore;
