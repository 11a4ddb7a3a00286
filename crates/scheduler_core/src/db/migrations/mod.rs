//! Schema migrations for the scheduler database.
//!
//! # Invariants
//! - Versions start at 1 and increase by one per entry.
//! - Pending migrations run in one transaction; `user_version` moves with them.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::{Connection, Transaction};

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const SCHEDULER_MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "scheduler_table",
    sql: include_str!("0001_init.sql"),
}];

/// How a connection's schema relates to this build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaState {
    Current,
    Behind { found: u32, latest: u32 },
    TooNew { found: u32, latest: u32 },
}

/// Returns the highest schema version this build can migrate to.
pub fn latest_version() -> u32 {
    SCHEDULER_MIGRATIONS.len() as u32
}

/// Compares the connection's `user_version` with [`latest_version`].
pub fn schema_state(conn: &Connection) -> DbResult<SchemaState> {
    let found: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let latest = latest_version();
    Ok(match found.cmp(&latest) {
        std::cmp::Ordering::Equal => SchemaState::Current,
        std::cmp::Ordering::Less => SchemaState::Behind { found, latest },
        std::cmp::Ordering::Greater => SchemaState::TooNew { found, latest },
    })
}

/// Migrates the connection to [`latest_version`].
///
/// # Errors
/// - `SchemaTooNew` when the database is ahead of this build.
/// - `Migration` naming the first script that failed.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    match schema_state(conn)? {
        SchemaState::Current => Ok(()),
        SchemaState::TooNew { found, latest } => Err(DbError::SchemaTooNew {
            found,
            supported: latest,
        }),
        SchemaState::Behind { found, latest } => {
            let tx = conn.transaction()?;
            run_pending(&tx, SCHEDULER_MIGRATIONS, found)?;
            tx.commit()?;
            info!("event=db_migrate module=db status=ok from_version={found} to_version={latest}");
            Ok(())
        }
    }
}

fn run_pending(tx: &Transaction<'_>, migrations: &[Migration], applied: u32) -> DbResult<()> {
    for migration in migrations.iter().filter(|m| m.version > applied) {
        debug!(
            "event=db_migrate module=db status=start version={} name={}",
            migration.version, migration.name
        );
        tx.execute_batch(migration.sql)
            .and_then(|()| tx.pragma_update(None, "user_version", migration.version))
            .map_err(|source| DbError::Migration {
                version: migration.version,
                name: migration.name,
                source,
            })?;
    }
    Ok(())
}
