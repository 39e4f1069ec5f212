//! Shared record store handle.
//!
//! # Responsibility
//! - Hold the single SQLite connection used by request handlers.
//! - Lend the connection to one caller at a time.
//! - Close the connection explicitly at shutdown.

use super::{open_db, open_db_in_memory, DbError, DbResult};
use log::{info, warn};
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Explicitly constructed store client injected into request handling.
#[derive(Debug)]
pub struct RecordStore {
    conn: Mutex<Connection>,
}

impl RecordStore {
    /// Opens (or creates) a file-backed store with migrations applied.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        open_db(path).map(Self::from_connection)
    }

    /// Opens an ephemeral in-memory store with migrations applied.
    pub fn open_in_memory() -> DbResult<Self> {
        open_db_in_memory().map(Self::from_connection)
    }

    /// Wraps an already bootstrapped connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Runs `f` with exclusive access to the connection.
    ///
    /// Blocks while another caller holds the connection, so async callers
    /// must invoke this from a blocking worker. A caller that panicked while
    /// holding the connection does not take the store down with it.
    pub fn with_connection<T>(&self, f: impl FnOnce(&Connection) -> T) -> T {
        let guard = self.lock();
        f(&guard)
    }

    /// Flushes and closes the connection.
    pub fn close(self) -> DbResult<()> {
        let conn = self.conn.into_inner().unwrap_or_else(PoisonError::into_inner);
        conn.close().map_err(|(_, err)| DbError::Sqlite(err))?;
        info!("event=db_close module=db status=ok");
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| {
            self.conn.clear_poison();
            let guard = poisoned.into_inner();
            // Roll back whatever the panicking caller left open.
            let rollback = if guard.is_autocommit() {
                Ok(())
            } else {
                guard.execute_batch("ROLLBACK;")
            };
            match rollback {
                Ok(()) => warn!("event=db_lock module=db status=recovered"),
                Err(err) => {
                    warn!("event=db_lock module=db status=recovered rollback=error error={err}")
                }
            }
            guard
        })
    }
}
