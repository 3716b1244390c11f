//! Journal module for persisting executions so they can be rolled back later.
//!
//! A real execution keeps its rollback records only in memory. Saving them to
//! a journal lets a later process undo the execution.
//!
//! # Features
//!
//! * **Integrity**: Each journal file is wrapped in an envelope with a SHA256 checksum.
//! * **Versioning**: The format carries a version number checked on load.
//! * **One-shot rollback**: A journal records when it was rolled back and
//!   refuses a second rollback.
//!
//! # Architecture
//!
//! * [`data`]: The serializable [`Journal`] model.
//! * [`io`]: Saving, loading and verifying journal files.

pub mod data;
pub mod io;

pub use data::{Journal, JournalError, JOURNAL_VERSION};
