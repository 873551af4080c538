//! File-backed database handle shared across requests.

use super::{open_db, DbResult};
use log::info;
use std::path::PathBuf;

/// Location of the journal store.
///
/// Cloning is cheap; the handle holds no connection. Each caller gets its own
/// connection from [`Database::connect`] and closes it by dropping it.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    /// Opens the store once to create or upgrade the schema, then returns a
    /// handle for later per-request connections.
    pub fn bootstrap(path: impl Into<PathBuf>) -> DbResult<Self> {
        let path = path.into();
        let conn = open_db(&path)?;
        drop(conn);
        info!(
            "event=db_bootstrap module=db status=ok path={}",
            path.display()
        );
        Ok(Self { path })
    }

    /// Opens a fresh, fully bootstrapped connection.
    pub fn connect(&self) -> DbResult<rusqlite::Connection> {
        open_db(&self.path)
    }
}
