//! The turn state machine.
//!
//! One runner instance is shared across requests, but every run owns its
//! Transcript exclusively; there is no shared mutable state between
//! concurrent turns. All remote calls are sequential round trips. Any
//! failure aborts the turn before the history write, so no partial record
//! is ever persisted.

use crate::prompts;
use palaver_core::error::Result;
use palaver_core::history::HistoryStore;
use palaver_core::message::{Message, Transcript};
use palaver_core::model::ChatModel;
use palaver_core::tool::ToolRegistry;
use palaver_core::turn::{FollowupSet, TurnOutcome, TurnRecord, TurnRequest};
use std::sync::Arc;
use tracing::{debug, info};

/// Default number of prior turns replayed into the transcript.
const DEFAULT_REPLAY_WINDOW: usize = 10;

/// Orchestrates one complete turn against the model, the tool registry,
/// and the history store.
pub struct TurnRunner {
    model: Arc<dyn ChatModel>,
    history: Arc<dyn HistoryStore>,
    tools: Arc<ToolRegistry>,
    replay_window: usize,
}

impl TurnRunner {
    pub fn new(
        model: Arc<dyn ChatModel>,
        history: Arc<dyn HistoryStore>,
        tools: Arc<ToolRegistry>,
    ) -> Self {
        Self {
            model,
            history,
            tools,
            replay_window: DEFAULT_REPLAY_WINDOW,
        }
    }

    /// Set how many prior turns are replayed into the transcript. Bounds
    /// record count, not token count.
    pub fn with_replay_window(mut self, window: usize) -> Self {
        self.replay_window = window;
        self
    }

    /// Run one turn end to end.
    ///
    /// The persisted record's id is the response id of the completion that
    /// produced the final answer, so feedback can later be keyed to it.
    pub async fn run(&self, request: TurnRequest) -> Result<TurnOutcome> {
        let mut transcript = Transcript::new();
        transcript.set_system(prompts::assistant_instruction(request.user_name.as_deref()));

        // Replay prior turns oldest-first so the new prompt lands last.
        let history = self
            .history
            .load_recent(&request.session_id, self.replay_window)
            .await?;
        for record in &history {
            transcript.push(Message::user(record.user_prompt.clone()));
            transcript.push(Message::assistant(record.assistant_response.clone()));
        }
        transcript.push(Message::user(request.user_prompt.clone()));

        let user = Some(request.user_id.as_str());
        let tool_definitions = self.tools.definitions();

        // Tool-decision phase. The model may answer directly instead.
        let mut answer = self
            .model
            .complete_with_tools(transcript.messages(), &tool_definitions, user)
            .await?;
        let mut total_tokens = answer.usage.total_tokens;

        if !answer.tool_calls.is_empty() {
            let calls = answer.tool_calls.clone();
            transcript.push_tool_calls(calls.clone());

            for call in &calls {
                let Some(handler) = self.tools.get(&call.name) else {
                    // Only registered tools exist; anything else is
                    // skipped without a transcript entry.
                    debug!(name = %call.name, "Ignoring unrecognized tool invocation");
                    continue;
                };
                let content = handler.invoke(&call.arguments, &request.session_id).await?;
                transcript.push_tool_result(&call.id, &call.name, content);
            }

            // Grounding phase: the model now sees live tool results.
            answer = self.model.complete(transcript.messages(), user).await?;
            total_tokens += answer.usage.total_tokens;
        }

        transcript.push(Message::assistant(answer.content.clone()));

        // Follow-up phase reuses the transcript with a swapped instruction.
        transcript.set_system(prompts::followup_instruction());
        let followup = self.model.complete(transcript.messages(), user).await?;
        total_tokens += followup.usage.total_tokens;

        // Malformed follow-up output must never fail the turn.
        let followup_questions: FollowupSet =
            serde_json::from_str(&followup.content).unwrap_or_default();

        let turn_id = self
            .history
            .write(TurnRecord {
                id: answer.id.clone(),
                session_id: request.session_id.clone(),
                user_prompt: request.user_prompt,
                assistant_response: answer.content.clone(),
                total_tokens,
                feedback_rating: None,
            })
            .await?;

        info!(
            session_id = %request.session_id,
            turn_id = %turn_id,
            total_tokens,
            model = %answer.model,
            "Turn complete"
        );

        Ok(TurnOutcome {
            assistant_response: answer.content,
            response_id: answer.id,
            followup_questions,
            total_tokens,
            model: answer.model,
        })
    }
}
