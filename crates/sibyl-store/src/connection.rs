//! SQLite connection management for the context index
//!
//! Uses a simple `Arc<Mutex<Connection>>` wrapper: the index has a single
//! writer (the training path) and WAL mode covers concurrent readers.

use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use rusqlite::Connection;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::schema;

/// Thread-safe connection wrapper for the context index
#[derive(Clone)]
pub struct StorePool {
    conn: Arc<Mutex<Connection>>,
}

impl StorePool {
    /// Open (or create) the index at the given path and apply migrations
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "Opening context index");

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StoreError::Connection(format!("Failed to create directory: {e}"))
                })?;
            }
        }

        let conn = Connection::open(path)?;
        let pool = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        pool.initialize()?;
        Ok(pool)
    }

    /// Create an in-memory index for testing
    pub fn memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let pool = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        pool.initialize()?;
        Ok(pool)
    }

    /// Execute a closure with the connection
    pub fn with_connection<F, T>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&Connection) -> StoreResult<T>,
    {
        let conn = self.conn.lock();
        f(&conn)
    }

    /// Configure pragmas and apply schema migrations
    fn initialize(&self) -> StoreResult<()> {
        self.with_connection(|conn| {
            debug!("Configuring context index pragmas");
            conn.execute_batch(
                "PRAGMA journal_mode = WAL;
                 PRAGMA synchronous = NORMAL;
                 PRAGMA busy_timeout = 5000;
                 PRAGMA foreign_keys = ON;",
            )?;
            schema::apply_migrations(conn)?;
            Ok(())
        })
    }
}
