//! Storage seams for job definitions and firing history.
//!
//! The scheduling core only ever talks to the [`JobStore`] and
//! [`HistoryStore`] traits; the in-memory implementations here are the
//! reference backend and the test double in one.

mod cronjob_repo;
mod history_repo;

pub use cronjob_repo::{JobStore, MemoryJobStore};
pub use history_repo::{HistoryStore, MemoryHistoryStore};
