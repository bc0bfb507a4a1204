//! Embedded relational backend.

use crate::error::{CellcalcError, Result};
use cellcalc_engine::engine::{CellId, CellSource};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

use super::{CellStore, PutOutcome};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS cells (
    cellid TEXT PRIMARY KEY,
    formula TEXT NOT NULL
);";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database file and make sure the table exists.
    pub fn open(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "opening sqlite cell store");
        Self::with_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(SqliteStore {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| CellcalcError::LockPoisoned)
    }
}

impl CellSource for SqliteStore {
    type Error = CellcalcError;

    fn get(&self, id: &str) -> Result<Option<String>> {
        let conn = self.conn()?;
        let formula = conn
            .query_row(
                "SELECT formula FROM cells WHERE cellid = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(formula)
    }

    fn list(&self) -> Result<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT cellid FROM cells ORDER BY cellid")?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(ids)
    }
}

impl CellStore for SqliteStore {
    fn put(&self, id: &CellId, formula: &str) -> Result<PutOutcome> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let exists = tx
            .query_row(
                "SELECT 1 FROM cells WHERE cellid = ?1",
                params![id.as_str()],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        tx.execute(
            "INSERT INTO cells (cellid, formula) VALUES (?1, ?2)
             ON CONFLICT(cellid) DO UPDATE SET formula = excluded.formula",
            params![id.as_str(), formula],
        )?;
        tx.commit()?;

        Ok(if exists {
            PutOutcome::Updated
        } else {
            PutOutcome::Created
        })
    }

    fn delete(&self, id: &str) -> Result<bool> {
        let conn = self.conn()?;
        let removed = conn.execute("DELETE FROM cells WHERE cellid = ?1", params![id])?;
        Ok(removed > 0)
    }

    fn clear(&self) -> Result<()> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM cells", [])?;
        Ok(())
    }
}
