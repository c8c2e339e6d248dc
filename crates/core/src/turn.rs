//! Turn domain types.
//!
//! A turn is one complete user-prompt/assistant-response exchange,
//! persisted as a unit at the end of a successful orchestration run.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Model-generated candidate next questions, keyed by a small ordinal set
/// (e.g. "q1".."q3"). Advisory only, recomputed each turn, never persisted.
pub type FollowupSet = BTreeMap<String, String>;

/// The inputs for one orchestration run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnRequest {
    /// The session this turn belongs to
    pub session_id: String,

    /// The end-user id, passed through to the inference endpoint
    pub user_id: String,

    /// Display name; when present, the assistant instruction is
    /// personalized
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,

    /// The new user utterance
    pub user_prompt: String,
}

/// What the orchestrator returns to the caller for one completed turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnOutcome {
    /// The final answer text
    pub assistant_response: String,

    /// Id of the completion that produced the final answer
    pub response_id: String,

    /// Candidate next questions; empty when the model declined or its
    /// output was malformed
    #[serde(default)]
    pub followup_questions: FollowupSet,

    /// Token usage accumulated over every model call in the turn
    pub total_tokens: u32,

    /// Which model produced the final answer
    pub model: String,
}

/// A persisted turn. Identity is `(id, session_id)`; `id` is server-minted,
/// never user-supplied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnRecord {
    pub id: String,
    pub session_id: String,
    pub user_prompt: String,
    pub assistant_response: String,
    pub total_tokens: u32,

    /// Set later, out-of-band, by the feedback amendment operation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback_rating: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn followup_set_parses_from_model_output() {
        let json = r#"{ "q1": "What films did Kubrick direct?", "q2": "Where should I travel?" }"#;
        let set: FollowupSet = serde_json::from_str(json).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set["q1"].contains("Kubrick"));
    }

    #[test]
    fn turn_record_omits_unset_feedback() {
        let record = TurnRecord {
            id: "t1".into(),
            session_id: "s1".into(),
            user_prompt: "hi".into(),
            assistant_response: "hello".into(),
            total_tokens: 42,
            feedback_rating: None,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("feedback_rating"));
    }
}
