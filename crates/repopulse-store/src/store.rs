use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database operation failed: {0}")]
    Database(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// One recorded score for a repository.
///
/// Rows accumulate over time; nothing in this crate updates or deletes them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoreSample {
    pub id: i64,
    pub repo_id: i64,
    pub repo_name: String,
    pub score: f64,
    pub recorded_at: DateTime<Utc>,
}

/// A stored weight triple, one row per user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PreferenceRow {
    pub id: i64,
    pub user_id: i64,
    pub stars_weight: f64,
    pub forks_weight: f64,
    pub recency_weight: f64,
}

/// SQLite store for the score-sample log and the preference table.
///
/// SQLite because it is zero-config, embedded, and plenty for a table
/// that only ever sees single-row reads and appends.
pub struct ScoreStore {
    conn: Connection,
}

impl ScoreStore {
    pub fn open(db_path: &Path) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        Self::init_schema(&conn)?;
        Ok(Self { conn })
    }

    /// In-memory database, used by tests
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self { conn })
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS repository_scores (
                id INTEGER PRIMARY KEY,
                repo_id INTEGER NOT NULL,
                repo_name TEXT NOT NULL,
                popularity_score REAL NOT NULL,
                recorded_at INTEGER NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_scores_repo_recorded
             ON repository_scores (repo_id, recorded_at DESC)",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS user_preferences (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                stars_weight REAL NOT NULL,
                forks_weight REAL NOT NULL,
                recency_weight REAL NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    /// Append a score sample. Existing rows are never touched.
    pub fn insert_sample(
        &self,
        repo_id: i64,
        repo_name: &str,
        score: f64,
        recorded_at: DateTime<Utc>,
    ) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO repository_scores (repo_id, repo_name, popularity_score, recorded_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![repo_id, repo_name, score, recorded_at.timestamp_millis()],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!("Recorded score {} for repo {} ({})", score, repo_id, id);
        Ok(id)
    }

    /// Most recent sample for a repository, if any.
    ///
    /// Ties on recorded_at resolve to the later insert.
    pub fn latest_sample(&self, repo_id: i64) -> Result<Option<ScoreSample>> {
        let sample = self
            .conn
            .query_row(
                "SELECT id, repo_id, repo_name, popularity_score, recorded_at
                 FROM repository_scores
                 WHERE repo_id = ?1
                 ORDER BY recorded_at DESC, id DESC
                 LIMIT 1",
                params![repo_id],
                |row| {
                    Ok(ScoreSample {
                        id: row.get(0)?,
                        repo_id: row.get(1)?,
                        repo_name: row.get(2)?,
                        score: row.get(3)?,
                        recorded_at: millis_to_datetime(row.get(4)?),
                    })
                },
            )
            .optional()?;
        Ok(sample)
    }

    /// Number of samples recorded for a repository.
    pub fn sample_count(&self, repo_id: i64) -> Result<u64> {
        let count: u64 = self.conn.query_row(
            "SELECT COUNT(*) FROM repository_scores WHERE repo_id = ?1",
            params![repo_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Insert a new preference row and return it with its assigned id.
    pub fn insert_preferences(
        &self,
        user_id: i64,
        stars_weight: f64,
        forks_weight: f64,
        recency_weight: f64,
    ) -> Result<PreferenceRow> {
        self.conn.execute(
            "INSERT INTO user_preferences (user_id, stars_weight, forks_weight, recency_weight)
             VALUES (?1, ?2, ?3, ?4)",
            params![user_id, stars_weight, forks_weight, recency_weight],
        )?;
        Ok(PreferenceRow {
            id: self.conn.last_insert_rowid(),
            user_id,
            stars_weight,
            forks_weight,
            recency_weight,
        })
    }

    /// Stored preferences for a user, if any.
    pub fn find_preferences(&self, user_id: i64) -> Result<Option<PreferenceRow>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, user_id, stars_weight, forks_weight, recency_weight
                 FROM user_preferences
                 WHERE user_id = ?1",
                params![user_id],
                |row| {
                    Ok(PreferenceRow {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        stars_weight: row.get(2)?,
                        forks_weight: row.get(3)?,
                        recency_weight: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    /// Overwrite the weight columns for an existing user.
    ///
    /// Returns the updated row, or None when the user has no row. The row
    /// keeps its original id.
    pub fn update_preferences(
        &self,
        user_id: i64,
        stars_weight: f64,
        forks_weight: f64,
        recency_weight: f64,
    ) -> Result<Option<PreferenceRow>> {
        let changed = self.conn.execute(
            "UPDATE user_preferences
             SET stars_weight = ?2, forks_weight = ?3, recency_weight = ?4
             WHERE user_id = ?1",
            params![user_id, stars_weight, forks_weight, recency_weight],
        )?;

        if changed == 0 {
            return Ok(None);
        }
        self.find_preferences(user_id)
    }

    /// Remove a user's preference row. Returns false when nothing existed.
    pub fn delete_preferences(&self, user_id: i64) -> Result<bool> {
        let deleted = self.conn.execute(
            "DELETE FROM user_preferences WHERE user_id = ?1",
            params![user_id],
        )?;
        Ok(deleted > 0)
    }
}

fn millis_to_datetime(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or(DateTime::UNIX_EPOCH)
}
