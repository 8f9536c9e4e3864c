//! Transport-agnostic application state.
//!
//! `CoreState` owns the single connection to the record store. The IPC loop
//! and any other front end share it behind an `Arc`; each operation holds the
//! connection lock for its whole duration, so no caller ever observes another
//! operation half-way (the compound patient delete in particular).

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;

use crate::db::{self, DatabaseError};

pub struct CoreState {
    conn: Mutex<Connection>,
    /// On-disk location, `None` for in-memory stores.
    db_path: Option<PathBuf>,
}

impl CoreState {
    /// Open (or create) the record store at `path`, creating the parent
    /// directory and schema as needed.
    pub fn open(path: &Path) -> Result<Self, CoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = db::open_database(path)?;
        tracing::info!(path = %path.display(), "Record store opened");
        Ok(Self {
            conn: Mutex::new(conn),
            db_path: Some(path.to_path_buf()),
        })
    }

    /// In-memory store (for testing).
    pub fn in_memory() -> Result<Self, CoreError> {
        Ok(Self {
            conn: Mutex::new(db::open_memory_database()?),
            db_path: None,
        })
    }

    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// Acquire the connection for one unit of work.
    pub fn lock_db(&self) -> Result<MutexGuard<'_, Connection>, CoreError> {
        self.conn.lock().map_err(|_| CoreError::LockPoisoned)
    }

    /// Run `op` against the store while holding the connection lock.
    pub fn with_db<T>(
        &self,
        op: impl FnOnce(&Connection) -> Result<T, DatabaseError>,
    ) -> Result<T, CoreError> {
        let conn = self.lock_db()?;
        op(&conn).map_err(CoreError::Database)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Internal lock error")]
    LockPoisoned,
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
    #[error("Cannot create data directory: {0}")]
    DataDir(#[from] std::io::Error),
}
