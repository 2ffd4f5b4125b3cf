//! Breathing session storage.
//!
//! Persists finished sessions to the local database, keyed by user.

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use super::recorder::{SessionRecord, SessionRecorder};
use crate::error::BreatheError;
use crate::storage::Database;

/// A recorded session as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    /// Database ID
    pub id: i64,
    /// Who the session belongs to
    pub user_id: String,
    #[serde(flatten)]
    pub record: SessionRecord,
}

/// Storage for breathing sessions belonging to one user.
pub struct SessionStorage {
    db: Database,
    user_id: String,
}

const SELECT_COLUMNS: &str = "SELECT id, user_id, preset_id, started_at, ended_at, \
     duration_seconds, completed FROM breathing_sessions";

impl SessionStorage {
    /// Open storage in the default database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open(user_id: &str) -> Result<Self, BreatheError> {
        Ok(Self::with_database(Database::open()?, user_id))
    }

    /// Create storage with an existing database connection.
    #[must_use]
    pub fn with_database(db: Database, user_id: &str) -> Self {
        Self {
            db,
            user_id: user_id.to_string(),
        }
    }

    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Insert a finished session and return its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn save(&self, record: &SessionRecord) -> Result<i64, BreatheError> {
        let conn = self.db.connection();
        let duration = i64::try_from(record.duration_seconds).map_err(|_| {
            BreatheError::Validation(format!(
                "session duration out of range: {}",
                record.duration_seconds
            ))
        })?;

        conn.execute(
            r"INSERT INTO breathing_sessions
              (user_id, preset_id, started_at, ended_at, duration_seconds, completed)
              VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                self.user_id,
                record.preset_id,
                record.started_at.to_rfc3339(),
                record.ended_at.to_rfc3339(),
                duration,
                record.completed,
            ],
        )
        .map_err(|e| BreatheError::Database(format!("Failed to insert session: {e}")))?;

        Ok(conn.last_insert_rowid())
    }

    /// Get a session by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get(&self, id: i64) -> Result<Option<StoredSession>, BreatheError> {
        self.db
            .connection()
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1 AND user_id = ?2"),
                params![id, self.user_id],
                row_to_session,
            )
            .optional()
            .map_err(|e| BreatheError::Database(format!("Failed to query session: {e}")))
    }

    /// Most recent sessions first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_recent(&self, limit: usize) -> Result<Vec<StoredSession>, BreatheError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.query(
            &format!("{SELECT_COLUMNS} WHERE user_id = ?1 ORDER BY started_at DESC, id DESC LIMIT ?2"),
            params![self.user_id, limit],
        )
    }

    /// Sessions started in `[start, end)`, most recent first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<StoredSession>, BreatheError> {
        self.query(
            &format!(
                "{SELECT_COLUMNS} WHERE user_id = ?1 AND started_at >= ?2 AND started_at < ?3 \
                 ORDER BY started_at DESC, id DESC"
            ),
            params![self.user_id, start.to_rfc3339(), end.to_rfc3339()],
        )
    }

    /// Sessions of one preset, most recent first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_by_preset(
        &self,
        preset_id: &str,
        limit: usize,
    ) -> Result<Vec<StoredSession>, BreatheError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.query(
            &format!(
                "{SELECT_COLUMNS} WHERE user_id = ?1 AND preset_id = ?2 \
                 ORDER BY started_at DESC, id DESC LIMIT ?3"
            ),
            params![self.user_id, preset_id, limit],
        )
    }

    /// Total recorded seconds for sessions started in `[start, end)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_total_seconds(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<u64, BreatheError> {
        let total: i64 = self
            .db
            .connection()
            .query_row(
                r"SELECT COALESCE(SUM(duration_seconds), 0)
                  FROM breathing_sessions
                  WHERE user_id = ?1 AND started_at >= ?2 AND started_at < ?3",
                params![self.user_id, start.to_rfc3339(), end.to_rfc3339()],
                |row| row.get(0),
            )
            .map_err(|e| BreatheError::Database(format!("Failed to query total time: {e}")))?;

        Ok(u64::try_from(total).unwrap_or(0))
    }

    /// Number of sessions started in `[start, end)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_session_count(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<u64, BreatheError> {
        let count: i64 = self
            .db
            .connection()
            .query_row(
                r"SELECT COUNT(*)
                  FROM breathing_sessions
                  WHERE user_id = ?1 AND started_at >= ?2 AND started_at < ?3",
                params![self.user_id, start.to_rfc3339(), end.to_rfc3339()],
                |row| row.get(0),
            )
            .map_err(|e| BreatheError::Database(format!("Failed to query session count: {e}")))?;

        Ok(u64::try_from(count).unwrap_or(0))
    }

    /// Delete one session. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete(&self, id: i64) -> Result<bool, BreatheError> {
        let rows = self
            .db
            .connection()
            .execute(
                "DELETE FROM breathing_sessions WHERE id = ?1 AND user_id = ?2",
                params![id, self.user_id],
            )
            .map_err(|e| BreatheError::Database(format!("Failed to delete session: {e}")))?;

        Ok(rows > 0)
    }

    /// Delete all of this user's sessions. Returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn clear(&self) -> Result<usize, BreatheError> {
        self.db
            .connection()
            .execute(
                "DELETE FROM breathing_sessions WHERE user_id = ?1",
                params![self.user_id],
            )
            .map_err(|e| BreatheError::Database(format!("Failed to delete sessions: {e}")))
    }

    fn query(
        &self,
        sql: &str,
        params: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<StoredSession>, BreatheError> {
        let conn = self.db.connection();
        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| BreatheError::Database(format!("Failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map(params, row_to_session)
            .map_err(|e| BreatheError::Database(format!("Failed to query sessions: {e}")))?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| BreatheError::Database(e.to_string()))
    }
}

impl SessionRecorder for SessionStorage {
    fn record(&mut self, record: &SessionRecord) -> Result<(), BreatheError> {
        self.save(record).map(|_| ())
    }
}

/// Convert a database row to a `StoredSession`.
fn row_to_session(row: &Row<'_>) -> Result<StoredSession, rusqlite::Error> {
    let started_at: String = row.get(3)?;
    let ended_at: String = row.get(4)?;
    let duration: i64 = row.get(5)?;

    Ok(StoredSession {
        id: row.get(0)?,
        user_id: row.get(1)?,
        record: SessionRecord {
            preset_id: row.get(2)?,
            started_at: parse_timestamp(3, &started_at)?,
            ended_at: parse_timestamp(4, &ended_at)?,
            duration_seconds: u64::try_from(duration).unwrap_or(0),
            completed: row.get(6)?,
        },
    })
}

fn parse_timestamp(column: usize, value: &str) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                column,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })
}
