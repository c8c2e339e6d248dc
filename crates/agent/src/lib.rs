//! Turn orchestration for Palaver.
//!
//! [`TurnRunner`] drives one user-prompt/assistant-response exchange:
//! assemble the transcript from history, let the model decide on tool
//! invocations, execute them, obtain the grounded answer, generate
//! follow-up questions, and persist the completed turn as a single write.

pub mod prompts;
pub mod runner;

pub use runner::TurnRunner;
