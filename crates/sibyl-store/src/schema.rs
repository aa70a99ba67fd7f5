//! Schema management and migrations for the context index

use rusqlite::Connection;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};

/// Schema version - increment when making schema changes
const SCHEMA_VERSION: i32 = 1;

/// Apply all pending migrations
pub fn apply_migrations(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )?;

    let current_version = get_current_version(conn)?;
    debug!(current_version, target_version = SCHEMA_VERSION, "Checking migrations");

    if current_version < SCHEMA_VERSION {
        info!(from = current_version, to = SCHEMA_VERSION, "Applying schema migrations");
        apply_migration_v1(conn)?;
    }

    Ok(())
}

fn get_current_version(conn: &Connection) -> StoreResult<i32> {
    let version: Option<i32> = conn
        .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
            row.get(0)
        })
        .unwrap_or(None);
    Ok(version.unwrap_or(0))
}

fn record_migration(conn: &Connection, version: i32) -> StoreResult<()> {
    conn.execute("INSERT INTO schema_migrations (version) VALUES (?)", [version])?;
    Ok(())
}

// Migration v1: the context record table
fn apply_migration_v1(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch(SCHEMA_V1)
        .map_err(|e| StoreError::Schema(format!("Failed to apply v1 schema: {e}")))?;
    record_migration(conn, 1)?;
    Ok(())
}

/// Initial schema SQL
///
/// One table holds all three collections; `collection` discriminates.
/// `rowid` preserves insertion order for stable tie-breaking, `embedding`
/// is a little-endian f32 blob of `dims` components produced by
/// `embedding_model`.
const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS context_records (
    id TEXT PRIMARY KEY NOT NULL,
    collection TEXT NOT NULL CHECK (collection IN ('ddl', 'documentation', 'sql_examples')),
    content TEXT NOT NULL,
    metadata TEXT,  -- JSON object, optional
    embedding BLOB NOT NULL,
    embedding_model TEXT NOT NULL,
    dims INTEGER NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_context_records_collection ON context_records(collection);
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        apply_migrations(&conn).unwrap();
        apply_migrations(&conn).unwrap();
        let version: i32 = conn
            .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[test]
    fn unknown_collection_rejected_by_check() {
        let conn = Connection::open_in_memory().unwrap();
        apply_migrations(&conn).unwrap();
        let result = conn.execute(
            "INSERT INTO context_records (id, collection, content, embedding, embedding_model, dims)
             VALUES ('x', 'bogus', 'text', x'00', 'm', 1)",
            [],
        );
        assert!(result.is_err());
    }
}
