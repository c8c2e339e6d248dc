//! SQLite turn store.
//!
//! One `turns` table. `seq` is an autoincrement rowid used as the recency
//! axis: "last N turns" is a `seq DESC` scan, reversed before returning so
//! callers always see chronological order. Identity is `(id, session_id)`
//! and every query filters on `session_id`.

use async_trait::async_trait;
use chrono::Utc;
use palaver_core::error::HistoryError;
use palaver_core::history::HistoryStore;
use palaver_core::turn::TurnRecord;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::{debug, info};
use uuid::Uuid;

/// The production SQLite history store.
pub struct SqliteHistory {
    pool: SqlitePool,
}

impl SqliteHistory {
    /// Open (or create) the store at the given SQLite path.
    ///
    /// Pass `"sqlite::memory:"` for an in-process ephemeral database.
    pub async fn new(path: &str) -> Result<Self, HistoryError> {
        let options = SqliteConnectOptions::from_str(path)
            .map_err(|e| HistoryError::Storage(format!("Invalid SQLite path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .pragma("foreign_keys", "ON");

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(|e| HistoryError::Storage(format!("Failed to open SQLite: {e}")))?;

        let store = Self { pool };
        store.run_migrations().await?;
        info!("SQLite history store initialized at {path}");
        Ok(store)
    }

    /// Create from an existing pool (useful for testing).
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, HistoryError> {
        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    async fn run_migrations(&self) -> Result<(), HistoryError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS turns (
                seq                INTEGER PRIMARY KEY AUTOINCREMENT,
                id                 TEXT NOT NULL,
                session_id         TEXT NOT NULL,
                user_prompt        TEXT NOT NULL,
                assistant_response TEXT NOT NULL,
                total_tokens       INTEGER NOT NULL DEFAULT 0,
                feedback_rating    INTEGER,
                created_at         TEXT NOT NULL,
                UNIQUE (id, session_id)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| HistoryError::Storage(format!("turns table: {e}")))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_turns_session_seq ON turns(session_id, seq DESC)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| HistoryError::Storage(format!("session index: {e}")))?;

        debug!("SQLite migrations complete");
        Ok(())
    }

    fn row_to_record(row: &sqlx::sqlite::SqliteRow) -> Result<TurnRecord, HistoryError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| HistoryError::QueryFailed(format!("id column: {e}")))?;
        let session_id: String = row
            .try_get("session_id")
            .map_err(|e| HistoryError::QueryFailed(format!("session_id column: {e}")))?;
        let user_prompt: String = row
            .try_get("user_prompt")
            .map_err(|e| HistoryError::QueryFailed(format!("user_prompt column: {e}")))?;
        let assistant_response: String = row
            .try_get("assistant_response")
            .map_err(|e| HistoryError::QueryFailed(format!("assistant_response column: {e}")))?;
        let total_tokens: i64 = row
            .try_get("total_tokens")
            .map_err(|e| HistoryError::QueryFailed(format!("total_tokens column: {e}")))?;
        let feedback_rating: Option<bool> = row
            .try_get("feedback_rating")
            .map_err(|e| HistoryError::QueryFailed(format!("feedback_rating column: {e}")))?;

        Ok(TurnRecord {
            id,
            session_id,
            user_prompt,
            assistant_response,
            total_tokens: total_tokens as u32,
            feedback_rating,
        })
    }
}

#[async_trait]
impl HistoryStore for SqliteHistory {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn load_recent(
        &self,
        session_id: &str,
        max_results: usize,
    ) -> Result<Vec<TurnRecord>, HistoryError> {
        let rows = sqlx::query(
            "SELECT * FROM turns WHERE session_id = ?1 ORDER BY seq DESC LIMIT ?2",
        )
        .bind(session_id)
        .bind(max_results as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| HistoryError::QueryFailed(format!("Recent turns: {e}")))?;

        let mut records: Vec<TurnRecord> = rows
            .iter()
            .map(Self::row_to_record)
            .collect::<Result<_, _>>()?;
        // Scanned newest-first; callers expect chronological order.
        records.reverse();
        Ok(records)
    }

    async fn write(&self, mut record: TurnRecord) -> Result<String, HistoryError> {
        if record.id.is_empty() {
            record.id = Uuid::new_v4().to_string();
        }
        let id = record.id.clone();
        let created_at = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO turns (id, session_id, user_prompt, assistant_response, total_tokens, feedback_rating, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(id, session_id) DO UPDATE SET
                user_prompt = excluded.user_prompt,
                assistant_response = excluded.assistant_response,
                total_tokens = excluded.total_tokens,
                feedback_rating = excluded.feedback_rating
            "#,
        )
        .bind(&record.id)
        .bind(&record.session_id)
        .bind(&record.user_prompt)
        .bind(&record.assistant_response)
        .bind(record.total_tokens as i64)
        .bind(record.feedback_rating)
        .bind(&created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| HistoryError::Storage(format!("INSERT failed: {e}")))?;

        debug!("Stored turn {id}");
        Ok(id)
    }

    async fn get(
        &self,
        id: &str,
        session_id: &str,
    ) -> Result<Option<TurnRecord>, HistoryError> {
        let row = sqlx::query("SELECT * FROM turns WHERE id = ?1 AND session_id = ?2")
            .bind(id)
            .bind(session_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| HistoryError::QueryFailed(format!("GET by key: {e}")))?;

        match row {
            Some(ref r) => Ok(Some(Self::row_to_record(r)?)),
            None => Ok(None),
        }
    }

    async fn amend_feedback(
        &self,
        id: &str,
        session_id: &str,
        rating: bool,
    ) -> Result<(), HistoryError> {
        let result = sqlx::query(
            "UPDATE turns SET feedback_rating = ?3 WHERE id = ?1 AND session_id = ?2",
        )
        .bind(id)
        .bind(session_id)
        .bind(rating)
        .execute(&self.pool)
        .await
        .map_err(|e| HistoryError::Storage(format!("UPDATE failed: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(HistoryError::NotFound {
                id: id.to_string(),
                session_id: session_id.to_string(),
            });
        }
        Ok(())
    }
}
