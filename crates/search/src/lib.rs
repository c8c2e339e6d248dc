//! Retrieval for Palaver.
//!
//! [`HybridSearchClient`] embeds the query through the model client, then
//! issues a combined lexical + vector-similarity query against the index.
//! [`RetrievalTool`] wraps it as the single tool handler the model can
//! invoke during a turn.

pub mod client;
pub mod retrieval_tool;

pub use client::HybridSearchClient;
pub use retrieval_tool::RetrievalTool;
