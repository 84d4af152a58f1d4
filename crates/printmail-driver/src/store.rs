// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Printer preference store backed by SQLite.
//
// One row says: documents of `module`, printed by `userid` through `driver`,
// go to `printer_id`. Rows are written by a settings UI; the driver only
// reads them.

use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use rusqlite::{Connection, Row, params};
use tracing::{debug, info, instrument};

use printmail_core::error::{PrintmailError, Result};
use printmail_core::types::PrinterPreference;

/// SQLite schema for the printing preferences table.
const CREATE_TABLE_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS printing (
        rowid        INTEGER PRIMARY KEY AUTOINCREMENT,
        created_at   TEXT    NOT NULL,
        printer_name TEXT    NOT NULL DEFAULT '',
        driver       TEXT    NOT NULL,
        printer_id   TEXT    NOT NULL,
        copy         INTEGER NOT NULL DEFAULT 1 CHECK (copy >= 1),
        module       TEXT    NOT NULL,
        userid       INTEGER NOT NULL
    );
    CREATE INDEX IF NOT EXISTS printing_lookup ON printing (module, driver, userid);
"#;

const SELECT_COLUMNS: &str = "rowid, module, driver, userid, printer_id, copy";

/// Convert a `rusqlite::Error` into a `PrintmailError::Database`.
fn db_err(e: rusqlite::Error) -> PrintmailError {
    PrintmailError::Database(e.to_string())
}

fn row_to_preference(row: &Row<'_>) -> rusqlite::Result<PrinterPreference> {
    Ok(PrinterPreference {
        id: row.get(0)?,
        module: row.get(1)?,
        driver: row.get(2)?,
        user_id: row.get(3)?,
        destination_address: row.get(4)?,
        copies: copies_from_column(row.get(5)?),
    })
}

/// Tables created before the `copy >= 1` check can still hold zero or
/// negative counts; those read as a single copy.
fn copies_from_column(copy: i64) -> u32 {
    u32::try_from(copy).unwrap_or(u32::MAX).max(1)
}

/// Read access to stored printer preferences.
pub trait PreferenceStore: Send + Sync {
    /// All preferences matching `module`, `driver` and `user_id`, in store
    /// order. Uniqueness is not enforced; callers decide what to do with
    /// more than one row.
    fn find_preferences(
        &self,
        module: &str,
        driver: &str,
        user_id: i64,
    ) -> Result<Vec<PrinterPreference>>;
}

/// A preference to be written by a settings surface.
#[derive(Debug, Clone)]
pub struct NewPreference {
    pub module: String,
    pub driver: String,
    pub user_id: i64,
    pub destination_address: String,
    pub printer_name: String,
    pub copies: u32,
}

impl NewPreference {
    pub fn new(
        module: impl Into<String>,
        driver: impl Into<String>,
        user_id: i64,
        destination_address: impl Into<String>,
    ) -> Self {
        Self {
            module: module.into(),
            driver: driver.into(),
            user_id,
            destination_address: destination_address.into(),
            printer_name: String::new(),
            copies: 1,
        }
    }
}

/// Preference store in a SQLite database.
///
/// `rusqlite::Connection` is not `Sync`, so it sits behind a mutex; every
/// query is a single indexed lookup.
pub struct SqlitePreferenceStore {
    conn: Mutex<Connection>,
}

impl SqlitePreferenceStore {
    /// Open (or create) the preference database at the given path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref())
            .map_err(|e| PrintmailError::Database(format!("open: {e}")))?;

        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get::<_, String>(0))
            .map_err(|e| PrintmailError::Database(format!("WAL pragma: {e}")))?;

        conn.execute_batch(CREATE_TABLE_SQL)
            .map_err(|e| PrintmailError::Database(format!("create table: {e}")))?;

        info!("preference database opened");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (useful for tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| PrintmailError::Database(format!("open in-memory: {e}")))?;

        conn.execute_batch(CREATE_TABLE_SQL)
            .map_err(|e| PrintmailError::Database(format!("create table: {e}")))?;

        debug!("in-memory preference database opened");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Store a preference and return its row id.
    #[instrument(skip(self, pref), fields(module = %pref.module, driver = %pref.driver, user_id = pref.user_id))]
    pub fn save_preference(&self, pref: &NewPreference) -> Result<i64> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO printing (created_at, printer_name, driver, printer_id, copy, module, userid)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                Utc::now().to_rfc3339(),
                pref.printer_name,
                pref.driver,
                pref.destination_address,
                pref.copies,
                pref.module,
                pref.user_id,
            ],
        )
        .map_err(|e| PrintmailError::Database(format!("insert preference: {e}")))?;

        let id = conn.last_insert_rowid();
        info!(id, "printer preference saved");
        Ok(id)
    }

    /// Delete a preference by row id. Returns whether a row was removed.
    #[instrument(skip(self))]
    pub fn remove_preference(&self, id: i64) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM printing WHERE rowid = ?1", params![id])
            .map_err(|e| PrintmailError::Database(format!("delete preference: {e}")))?;

        debug!(id, removed = rows, "printer preference delete");
        Ok(rows > 0)
    }

    /// Every preference of `user_id`, across modules and drivers.
    pub fn preferences_for_user(&self, user_id: i64) -> Result<Vec<PrinterPreference>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {SELECT_COLUMNS} FROM printing WHERE userid = ?1 ORDER BY module, rowid"
            ))
            .map_err(db_err)?;

        let rows = stmt
            .query_map(params![user_id], row_to_preference)
            .map_err(db_err)?;

        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(db_err)
    }
}

impl PreferenceStore for SqlitePreferenceStore {
    #[instrument(skip(self))]
    fn find_preferences(
        &self,
        module: &str,
        driver: &str,
        user_id: i64,
    ) -> Result<Vec<PrinterPreference>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {SELECT_COLUMNS} FROM printing
                 WHERE module = ?1 AND driver = ?2 AND userid = ?3
                 ORDER BY rowid"
            ))
            .map_err(db_err)?;

        let rows = stmt
            .query_map(params![module, driver, user_id], row_to_preference)
            .map_err(db_err)?;

        let prefs = rows.collect::<rusqlite::Result<Vec<_>>>().map_err(db_err)?;
        debug!(found = prefs.len(), "preference lookup");
        Ok(prefs)
    }
}
