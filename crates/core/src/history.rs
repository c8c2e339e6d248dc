//! HistoryStore trait — the session-scoped durable turn store.
//!
//! Keyed by `(id, session_id)`. Supports point read, point upsert, and a
//! "top N by recency for session" range query. A session's records live
//! together; every query is scoped by `session_id`.

use crate::error::HistoryError;
use crate::turn::TurnRecord;
use async_trait::async_trait;

/// The history store contract.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// The backend name (e.g. "sqlite", "in_memory").
    fn name(&self) -> &str;

    /// Load the last `max_results` turns for a session in chronological
    /// order (oldest first). The underlying store is queried
    /// most-recent-first and reversed before returning.
    ///
    /// `max_results` bounds record count, not token count. Returns an
    /// empty list, never an error, when no history exists.
    async fn load_recent(
        &self,
        session_id: &str,
        max_results: usize,
    ) -> std::result::Result<Vec<TurnRecord>, HistoryError>;

    /// Persist a completed turn, returning its id.
    ///
    /// When `record.id` is empty a fresh id is minted per call — never a
    /// value computed once and shared across calls.
    async fn write(&self, record: TurnRecord) -> std::result::Result<String, HistoryError>;

    /// Point read by `(id, session_id)`.
    async fn get(
        &self,
        id: &str,
        session_id: &str,
    ) -> std::result::Result<Option<TurnRecord>, HistoryError>;

    /// Set the feedback rating on an existing turn.
    ///
    /// Fails with [`HistoryError::NotFound`] when no record matches the
    /// key pair.
    async fn amend_feedback(
        &self,
        id: &str,
        session_id: &str,
        rating: bool,
    ) -> std::result::Result<(), HistoryError>;
}
