//! Durable turn history for Palaver.
//!
//! Two [`HistoryStore`](palaver_core::HistoryStore) backends:
//! - [`SqliteHistory`] — the production store, one SQLite file
//! - [`InMemoryHistory`] — ephemeral, for tests and local runs
//!
//! All queries are scoped by session id; records from different sessions
//! never mix in a result set.

pub mod in_memory;
pub mod sqlite;

pub use in_memory::InMemoryHistory;
pub use sqlite::SqliteHistory;
