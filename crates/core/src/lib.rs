//! # Palaver Core
//!
//! Domain types, traits, and error definitions for the Palaver assistant
//! backend. This crate has **zero framework dependencies** — it defines the
//! domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every remote collaborator (inference endpoint, retrieval index, history
//! store) is defined as a trait here. Implementations live in their
//! respective crates. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod history;
pub mod message;
pub mod model;
pub mod search;
pub mod tool;
pub mod turn;

// Re-export key types at crate root for ergonomics
pub use error::{Error, HistoryError, ModelError, Result, SearchError, ToolError};
pub use history::HistoryStore;
pub use message::{Message, MessageToolCall, Role, Transcript};
pub use model::{ChatModel, ChatOutcome, ToolDefinition, Usage};
pub use search::{SearchIndex, SearchRequest, SearchResult};
pub use tool::{ToolHandler, ToolRegistry};
pub use turn::{FollowupSet, TurnOutcome, TurnRecord, TurnRequest};
