//! Key-value schema migrations.
//!
//! The whole engine persists through one `kv_entries` table, so the registry
//! stays short: each step reshapes that table and bumps `PRAGMA user_version`.
//!
//! # Invariants
//! - `version` values must remain monotonic.
//! - A database reporting the latest version must still hold [`KV_TABLE`];
//!   otherwise it is rejected rather than silently recreated.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

/// Table holding every persisted key (per-user state blobs, active user).
pub const KV_TABLE: &str = "kv_entries";

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("0001_kv_entries.sql"),
}];

/// Returns the latest migration version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Brings the key-value schema up to [`latest_version`] in one transaction.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let current_version = current_user_version(conn)?;
    let latest = latest_version();

    if current_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: latest,
        });
    }

    if current_version < latest {
        let tx = conn.transaction()?;
        for migration in MIGRATIONS
            .iter()
            .filter(|migration| migration.version > current_version)
        {
            tx.execute_batch(migration.sql)?;
            tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
        }
        tx.commit()?;
        info!(
            "event=db_migrate module=db status=ok from_version={current_version} to_version={latest}"
        );
    }

    if !kv_table_exists(conn)? {
        return Err(DbError::MissingKvTable {
            schema_version: latest,
        });
    }

    Ok(())
}

/// Whether the connection already holds the [`KV_TABLE`] table.
pub fn kv_table_exists(conn: &Connection) -> DbResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [KV_TABLE],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
