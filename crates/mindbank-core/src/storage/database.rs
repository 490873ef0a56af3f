//! SQLite-backed journal storage.
//!
//! Provides persistent storage for:
//! - The append-only event log (deposits, reframes, routine checks)
//! - The daily flag ledger (see [`super::flags`])
//! - A key-value store for application state (user settings live here)
//!
//! Event rows are immutable once written; the only delete path is the full
//! [`Database::reset_all`].

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use crate::day::LocalDay;
use crate::error::DatabaseError;
use crate::journal::{Deposit, DepositKind, Reframe, RoutineCheck, RoutineKey};

use super::data_dir;
use super::migrations;
use super::settings;

/// Row counts removed by [`Database::reset_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetSummary {
    pub deleted_deposits: usize,
    pub deleted_reframes: usize,
    pub deleted_routine_checks: usize,
    pub deleted_flags: usize,
    pub deleted_projects: usize,
}

/// SQLite database holding the journal event log, flag ledger, and kv store.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `~/.config/mindbank/mindbank.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, DatabaseError> {
        let path = data_dir()?.join("mindbank.db");
        let conn = Connection::open(&path).map_err(|source| DatabaseError::OpenFailed {
            path: path.clone(),
            source,
        })?;
        Self::from_connection(conn)
    }

    /// Open an in-memory database. Used by tests and ephemeral tooling.
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, DatabaseError> {
        migrations::migrate(&conn).map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    // === Event log: deposits ===

    /// Append a deposit to the event log.
    pub fn insert_deposit(&self, deposit: &Deposit) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO deposits (id, recorded_at, day, kind, text)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                deposit.id,
                deposit.recorded_at.to_rfc3339(),
                deposit.day.key(),
                deposit.kind.as_str(),
                deposit.text,
            ],
        )?;
        Ok(())
    }

    /// All deposits, newest first. Malformed rows are skipped with a warning.
    pub fn list_deposits(&self) -> Result<Vec<Deposit>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, recorded_at, day, kind, text
             FROM deposits ORDER BY recorded_at DESC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut deposits = Vec::new();
        for row in rows {
            let (id, recorded_at, day, kind, text) = row?;
            let Some(kind) = DepositKind::parse(&kind) else {
                log::warn!("skipping deposit {id} with unknown kind '{kind}'");
                continue;
            };
            let Some((recorded_at, day)) = parse_row_times(&id, &recorded_at, &day) else {
                continue;
            };
            deposits.push(Deposit {
                id,
                recorded_at,
                day,
                kind,
                text,
            });
        }
        Ok(deposits)
    }

    /// Legacy-data fallback: does any deposit of `kind` exist on `day`?
    pub fn has_deposit_on(&self, day: &LocalDay, kind: DepositKind) -> Result<bool, DatabaseError> {
        let exists = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM deposits WHERE day = ?1 AND kind = ?2)",
            params![day.key(), kind.as_str()],
            |row| row.get::<_, bool>(0),
        )?;
        Ok(exists)
    }

    // === Event log: reframes ===

    /// Append a reframe to the event log.
    pub fn insert_reframe(&self, reframe: &Reframe) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO reframes (id, recorded_at, day, original, reframed)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                reframe.id,
                reframe.recorded_at.to_rfc3339(),
                reframe.day.key(),
                reframe.original,
                reframe.reframed,
            ],
        )?;
        Ok(())
    }

    /// All reframes, newest first. Malformed rows are skipped with a warning.
    pub fn list_reframes(&self) -> Result<Vec<Reframe>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, recorded_at, day, original, reframed
             FROM reframes ORDER BY recorded_at DESC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut reframes = Vec::new();
        for row in rows {
            let (id, recorded_at, day, original, reframed) = row?;
            let Some((recorded_at, day)) = parse_row_times(&id, &recorded_at, &day) else {
                continue;
            };
            reframes.push(Reframe {
                id,
                recorded_at,
                day,
                original,
                reframed,
            });
        }
        Ok(reframes)
    }

    /// Legacy-data fallback: does any reframe exist on `day`?
    pub fn has_reframe_on(&self, day: &LocalDay) -> Result<bool, DatabaseError> {
        let exists = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM reframes WHERE day = ?1)",
            params![day.key()],
            |row| row.get::<_, bool>(0),
        )?;
        Ok(exists)
    }

    // === Event log: routine checks ===

    /// Append a routine check to the event log.
    pub fn insert_routine_check(&self, check: &RoutineCheck) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO routine_checks (id, recorded_at, day, routine, done)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                check.id,
                check.recorded_at.to_rfc3339(),
                check.day.key(),
                check.routine.as_str(),
                check.done,
            ],
        )?;
        Ok(())
    }

    /// All routine checks, newest first. Malformed rows are skipped with a
    /// warning.
    pub fn list_routine_checks(&self) -> Result<Vec<RoutineCheck>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, recorded_at, day, routine, done
             FROM routine_checks ORDER BY recorded_at DESC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, bool>(4)?,
            ))
        })?;

        let mut checks = Vec::new();
        for row in rows {
            let (id, recorded_at, day, routine, done) = row?;
            let Some(routine) = RoutineKey::parse(&routine) else {
                log::warn!("skipping routine check {id} with unknown routine '{routine}'");
                continue;
            };
            let Some((recorded_at, day)) = parse_row_times(&id, &recorded_at, &day) else {
                continue;
            };
            checks.push(RoutineCheck {
                id,
                recorded_at,
                day,
                routine,
                done,
            });
        }
        Ok(checks)
    }

    /// Legacy-data fallback: was `routine` marked done on `day`?
    pub fn has_routine_check_on(
        &self,
        day: &LocalDay,
        routine: RoutineKey,
    ) -> Result<bool, DatabaseError> {
        let exists = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM routine_checks
             WHERE day = ?1 AND routine = ?2 AND done = 1)",
            params![day.key(), routine.as_str()],
            |row| row.get::<_, bool>(0),
        )?;
        Ok(exists)
    }

    // === Key-value store ===

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    // === Reset ===

    /// Clear the event log, flag ledger, projects, and stored settings in a
    /// single transaction. No partial reset state is ever observable: either
    /// everything is back to empty/default or nothing changed.
    pub fn reset_all(&self) -> Result<ResetSummary, DatabaseError> {
        let count = |table: &str| -> Result<usize, rusqlite::Error> {
            self.conn
                .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                    row.get::<_, i64>(0)
                })
                .map(|n| n as usize)
        };
        let summary = ResetSummary {
            deleted_deposits: count("deposits")?,
            deleted_reframes: count("reframes")?,
            deleted_routine_checks: count("routine_checks")?,
            deleted_flags: count("daily_flags")?,
            deleted_projects: count("projects")?,
        };

        self.conn.execute_batch("BEGIN IMMEDIATE TRANSACTION;")?;
        let result: Result<(), rusqlite::Error> = (|| {
            self.conn.execute("DELETE FROM deposits", [])?;
            self.conn.execute("DELETE FROM reframes", [])?;
            self.conn.execute("DELETE FROM routine_checks", [])?;
            self.conn.execute("DELETE FROM daily_flags", [])?;
            self.conn.execute("DELETE FROM projects", [])?;
            self.conn.execute(
                "DELETE FROM kv WHERE key = ?1",
                params![settings::SETTINGS_KEY],
            )?;
            Ok(())
        })();

        match result {
            Ok(()) => {
                self.conn.execute_batch("COMMIT;")?;
                log::info!(
                    "reset complete: {} deposits, {} reframes, {} routine checks, {} flags removed",
                    summary.deleted_deposits,
                    summary.deleted_reframes,
                    summary.deleted_routine_checks,
                    summary.deleted_flags,
                );
                Ok(summary)
            }
            Err(err) => {
                let _ = self.conn.execute_batch("ROLLBACK;");
                Err(err.into())
            }
        }
    }
}

/// Parse the timestamp and day columns of an event row. Returns `None` (and
/// warns) when either is unreadable, so one bad row never aborts a scan.
fn parse_row_times(id: &str, recorded_at: &str, day: &str) -> Option<(DateTime<Utc>, LocalDay)> {
    let ts = match DateTime::parse_from_rfc3339(recorded_at) {
        Ok(ts) => ts.with_timezone(&Utc),
        Err(e) => {
            log::warn!("skipping event {id} with unreadable timestamp '{recorded_at}': {e}");
            return None;
        }
    };
    let day = match day.parse::<LocalDay>() {
        Ok(day) => day,
        Err(e) => {
            log::warn!("skipping event {id} with unreadable day '{day}': {e}");
            return None;
        }
    };
    Some((ts, day))
}
