use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{LaunchCount, LaunchRecord, LaunchStore, LaunchStoreError};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS launches (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id TEXT NOT NULL,
        entry_id TEXT NOT NULL,
        app_id TEXT NOT NULL,
        launched_at TEXT NOT NULL,
        stopped_at TEXT
    );

    CREATE INDEX IF NOT EXISTS idx_launches_launched_at ON launches(launched_at);

    CREATE TABLE IF NOT EXISTS launch_counts (
        entry_id TEXT PRIMARY KEY,
        count INTEGER NOT NULL DEFAULT 0
    );
"#;

/// Stored as fixed-width RFC 3339 so text order is time order.
fn format_timestamp(t: &DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Current time at the precision that survives a round trip.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

const SELECT_LAUNCH: &str =
    "SELECT id, user_id, entry_id, app_id, launched_at, stopped_at FROM launches";

/// SQLite-backed launch history
pub struct SqliteLaunchStore {
    conn: Mutex<Connection>,
}

impl SqliteLaunchStore {
    /// Open (or create) the database file and its tables.
    pub fn new(path: &Path) -> Result<Self, LaunchStoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory store (useful for testing)
    pub fn in_memory() -> Result<Self, LaunchStoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, LaunchStoreError> {
        self.conn
            .lock()
            .map_err(|_| LaunchStoreError::Database("connection lock poisoned".to_string()))
    }

    fn latest_with(conn: &Connection) -> Result<Option<LaunchRecord>, LaunchStoreError> {
        let sql = format!("{} ORDER BY launched_at DESC, id DESC LIMIT 1", SELECT_LAUNCH);
        Ok(conn.query_row(&sql, [], row_to_launch).optional()?)
    }
}

fn parse_timestamp(idx: usize, text: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

fn row_to_launch(row: &Row<'_>) -> rusqlite::Result<LaunchRecord> {
    let launched_at: String = row.get(4)?;
    let stopped_at: Option<String> = row.get(5)?;

    Ok(LaunchRecord {
        id: row.get(0)?,
        user_id: row.get(1)?,
        entry_id: row.get(2)?,
        app_id: row.get(3)?,
        launched_at: parse_timestamp(4, &launched_at)?,
        stopped_at: stopped_at
            .map(|t| parse_timestamp(5, &t))
            .transpose()?,
    })
}

impl LaunchStore for SqliteLaunchStore {
    fn start_launch(
        &self,
        user_id: &str,
        entry_id: &str,
        app_id: &str,
    ) -> Result<LaunchRecord, LaunchStoreError> {
        let conn = self.conn()?;
        let launched_at = now();

        conn.execute(
            "INSERT INTO launches (user_id, entry_id, app_id, launched_at) VALUES (?, ?, ?, ?)",
            params![user_id, entry_id, app_id, format_timestamp(&launched_at)],
        )?;

        Ok(LaunchRecord {
            id: conn.last_insert_rowid(),
            user_id: user_id.to_string(),
            entry_id: entry_id.to_string(),
            app_id: app_id.to_string(),
            launched_at,
            stopped_at: None,
        })
    }

    fn end_latest(&self) -> Result<Option<LaunchRecord>, LaunchStoreError> {
        let conn = self.conn()?;

        let mut launch = match Self::latest_with(&conn)? {
            Some(launch) if launch.is_running() => launch,
            Some(launch) => {
                tracing::warn!(id = launch.id, "Latest launch already stopped");
                return Ok(None);
            }
            None => {
                tracing::warn!("No launch to stop");
                return Ok(None);
            }
        };

        let stopped_at = now();
        conn.execute(
            "UPDATE launches SET stopped_at = ? WHERE id = ?",
            params![format_timestamp(&stopped_at), launch.id],
        )?;
        launch.stopped_at = Some(stopped_at);

        Ok(Some(launch))
    }

    fn latest(&self) -> Result<Option<LaunchRecord>, LaunchStoreError> {
        let conn = self.conn()?;
        Self::latest_with(&conn)
    }

    fn recent(&self, limit: usize) -> Result<Vec<LaunchRecord>, LaunchStoreError> {
        let conn = self.conn()?;
        let sql = format!("{} ORDER BY launched_at DESC, id DESC LIMIT ?", SELECT_LAUNCH);

        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map(params![limit as i64], row_to_launch)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    fn increment_count(&self, entry_id: &str) -> Result<u64, LaunchStoreError> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "INSERT INTO launch_counts (entry_id, count) VALUES (?, 1)
             ON CONFLICT (entry_id) DO UPDATE SET count = count + 1
             RETURNING count",
            params![entry_id],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn count_for(&self, entry_id: &str) -> Result<u64, LaunchStoreError> {
        let conn = self.conn()?;
        let count: Option<i64> = conn
            .query_row(
                "SELECT count FROM launch_counts WHERE entry_id = ?",
                params![entry_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(count.unwrap_or(0) as u64)
    }

    fn top_counts(&self, limit: usize) -> Result<Vec<LaunchCount>, LaunchStoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT entry_id, count FROM launch_counts ORDER BY count DESC, entry_id ASC LIMIT ?",
        )?;

        let counts = stmt
            .query_map(params![limit as i64], |row| {
                let count: i64 = row.get(1)?;
                Ok(LaunchCount {
                    entry_id: row.get(0)?,
                    count: count as u64,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(counts)
    }
}
