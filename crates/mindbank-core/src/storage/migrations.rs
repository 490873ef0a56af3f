//! Database schema migrations for mindbank.
//!
//! Migrations are versioned and applied automatically when opening the
//! database. The `schema_version` table tracks the current migration version.

use rusqlite::{Connection, Result as SqliteResult};

/// Apply all pending migrations to bring the database to the current schema
/// version.
///
/// # Errors
/// Returns an error if migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = get_schema_version(conn);

    if current_version < 1 {
        migrate_v1(conn)?;
    }
    if current_version < 2 {
        migrate_v2(conn)?;
    }

    Ok(())
}

fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

/// Get the current schema version from the database.
///
/// Returns 0 if no version is set (initial database).
fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    })
    .unwrap_or_else(|e| {
        if !matches!(e, rusqlite::Error::QueryReturnedNoRows) {
            log::warn!("failed to read schema_version, assuming 0: {e}");
        }
        0
    })
}

fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// v1: journal event log, daily flag ledger, and the kv store.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS deposits (
            id          TEXT PRIMARY KEY,
            recorded_at TEXT NOT NULL,
            day         TEXT NOT NULL,
            kind        TEXT NOT NULL,
            text        TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS reframes (
            id          TEXT PRIMARY KEY,
            recorded_at TEXT NOT NULL,
            day         TEXT NOT NULL,
            original    TEXT NOT NULL,
            reframed    TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS routine_checks (
            id          TEXT PRIMARY KEY,
            recorded_at TEXT NOT NULL,
            day         TEXT NOT NULL,
            routine     TEXT NOT NULL,
            done        INTEGER NOT NULL DEFAULT 1
        );

        CREATE TABLE IF NOT EXISTS daily_flags (
            day      TEXT NOT NULL,
            question TEXT NOT NULL,
            set_at   TEXT NOT NULL,
            PRIMARY KEY (day, question)
        );

        CREATE TABLE IF NOT EXISTS kv (
            key   TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_deposits_day_kind ON deposits(day, kind);
        CREATE INDEX IF NOT EXISTS idx_deposits_recorded_at ON deposits(recorded_at);
        CREATE INDEX IF NOT EXISTS idx_reframes_day ON reframes(day);
        CREATE INDEX IF NOT EXISTS idx_reframes_recorded_at ON reframes(recorded_at);
        CREATE INDEX IF NOT EXISTS idx_routine_checks_day_routine ON routine_checks(day, routine);",
    )?;
    set_schema_version(conn, 1)
}

/// v2: performance project worksheets.
fn migrate_v2(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS projects (
            id         TEXT PRIMARY KEY,
            title      TEXT NOT NULL,
            created_at TEXT NOT NULL,
            body       TEXT NOT NULL
        );",
    )?;
    set_schema_version(conn, 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrate_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), 2);
    }

    #[test]
    fn fresh_database_has_all_tables() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'
                 AND name IN ('deposits', 'reframes', 'routine_checks', 'daily_flags', 'kv', 'projects')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 6);
    }
}
