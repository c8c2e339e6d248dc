//! In-memory turn store, for tests and local runs without a database file.

use async_trait::async_trait;
use palaver_core::error::HistoryError;
use palaver_core::history::HistoryStore;
use palaver_core::turn::TurnRecord;
use tokio::sync::RwLock;
use uuid::Uuid;

/// An ephemeral history store. Insertion order is the recency axis.
#[derive(Default)]
pub struct InMemoryHistory {
    turns: RwLock<Vec<TurnRecord>>,
}

impl InMemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistory {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn load_recent(
        &self,
        session_id: &str,
        max_results: usize,
    ) -> Result<Vec<TurnRecord>, HistoryError> {
        let turns = self.turns.read().await;
        let mut recent: Vec<TurnRecord> = turns
            .iter()
            .rev()
            .filter(|t| t.session_id == session_id)
            .take(max_results)
            .cloned()
            .collect();
        recent.reverse();
        Ok(recent)
    }

    async fn write(&self, mut record: TurnRecord) -> Result<String, HistoryError> {
        if record.id.is_empty() {
            record.id = Uuid::new_v4().to_string();
        }
        let id = record.id.clone();

        let mut turns = self.turns.write().await;
        match turns
            .iter_mut()
            .find(|t| t.id == record.id && t.session_id == record.session_id)
        {
            Some(existing) => *existing = record,
            None => turns.push(record),
        }
        Ok(id)
    }

    async fn get(
        &self,
        id: &str,
        session_id: &str,
    ) -> Result<Option<TurnRecord>, HistoryError> {
        let turns = self.turns.read().await;
        Ok(turns
            .iter()
            .find(|t| t.id == id && t.session_id == session_id)
            .cloned())
    }

    async fn amend_feedback(
        &self,
        id: &str,
        session_id: &str,
        rating: bool,
    ) -> Result<(), HistoryError> {
        let mut turns = self.turns.write().await;
        match turns
            .iter_mut()
            .find(|t| t.id == id && t.session_id == session_id)
        {
            Some(record) => {
                record.feedback_rating = Some(rating);
                Ok(())
            }
            None => Err(HistoryError::NotFound {
                id: id.to_string(),
                session_id: session_id.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(session_id: &str, prompt: &str) -> TurnRecord {
        TurnRecord {
            id: String::new(),
            session_id: session_id.into(),
            user_prompt: prompt.into(),
            assistant_response: format!("re: {prompt}"),
            total_tokens: 10,
            feedback_rating: None,
        }
    }

    #[tokio::test]
    async fn recent_turns_are_chronological_and_scoped() {
        let db = InMemoryHistory::new();
        db.write(make_record("s1", "first")).await.unwrap();
        db.write(make_record("s2", "elsewhere")).await.unwrap();
        db.write(make_record("s1", "second")).await.unwrap();
        db.write(make_record("s1", "third")).await.unwrap();

        let recent = db.load_recent("s1", 2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].user_prompt, "second");
        assert_eq!(recent[1].user_prompt, "third");
    }

    #[tokio::test]
    async fn feedback_amendment() {
        let db = InMemoryHistory::new();
        let id = db.write(make_record("s1", "hi")).await.unwrap();

        db.amend_feedback(&id, "s1", true).await.unwrap();
        let record = db.get(&id, "s1").await.unwrap().unwrap();
        assert_eq!(record.feedback_rating, Some(true));

        let err = db.amend_feedback(&id, "wrong-session", true).await;
        assert!(matches!(err, Err(HistoryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn write_with_explicit_id_replaces() {
        let db = InMemoryHistory::new();
        let mut record = make_record("s1", "v1");
        record.id = "fixed".into();
        db.write(record).await.unwrap();

        let mut record = make_record("s1", "v2");
        record.id = "fixed".into();
        db.write(record).await.unwrap();

        let all = db.load_recent("s1", 10).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].user_prompt, "v2");
    }
}
