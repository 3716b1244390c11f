//! Data structures for execution journals.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::actions::{Action, ExecutionResult, RollbackExecutionResult, RollbackRecord};

/// Current version of the journal file format.
pub const JOURNAL_VERSION: u32 = 1;

/// Errors reading, writing or updating a journal.
#[derive(Debug, Error)]
pub enum JournalError {
    /// The journal file could not be read or written.
    #[error("Journal I/O error for {path}: {source}")]
    Io {
        /// Journal file path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The journal could not be encoded or decoded.
    #[error("Malformed journal: {0}")]
    Format(#[from] serde_json::Error),

    /// The stored checksum does not match the content.
    #[error("Journal integrity check failed: checksum mismatch. The file may have been tampered with or corrupted.")]
    ChecksumMismatch,

    /// The journal was written by an incompatible version.
    #[error("Unsupported journal version: {found}. Current version is {expected}.")]
    UnsupportedVersion {
        /// Version found in the file
        found: u32,
        /// Version this build writes
        expected: u32,
    },

    /// The journal's execution was already undone.
    #[error("Journal was already rolled back at {0}")]
    AlreadyRolledBack(DateTime<Utc>),
}

/// A persisted execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Journal {
    /// Format version.
    pub version: u32,
    /// When the journal was created.
    pub created_at: DateTime<Utc>,
    /// The action that was executed, when it was valid.
    pub action: Option<Action>,
    /// The execution outcome, including rollback records.
    pub execution: ExecutionResult,
    /// When the execution was rolled back.
    #[serde(default)]
    pub rolled_back_at: Option<DateTime<Utc>>,
    /// Outcome of the rollback.
    #[serde(default)]
    pub rollback: Option<RollbackExecutionResult>,
}

impl Journal {
    /// Create a journal for a finished execution.
    #[must_use]
    pub fn new(action: Option<Action>, execution: ExecutionResult) -> Self {
        Self {
            version: JOURNAL_VERSION,
            created_at: Utc::now(),
            action,
            execution,
            rolled_back_at: None,
            rollback: None,
        }
    }

    /// Records needed to undo the execution.
    #[must_use]
    pub fn rollback_records(&self) -> &[RollbackRecord] {
        &self.execution.rollback_records
    }

    /// Whether the execution has already been rolled back.
    #[must_use]
    pub fn is_rolled_back(&self) -> bool {
        self.rolled_back_at.is_some()
    }

    /// Fail if the journal may not be rolled back.
    ///
    /// # Errors
    ///
    /// [`JournalError::AlreadyRolledBack`] once [`Journal::mark_rolled_back`]
    /// has been called.
    pub fn ensure_rollback_allowed(&self) -> Result<(), JournalError> {
        match self.rolled_back_at {
            Some(at) => Err(JournalError::AlreadyRolledBack(at)),
            None => Ok(()),
        }
    }

    /// Stamp the journal as rolled back and keep the rollback outcome.
    ///
    /// # Errors
    ///
    /// [`JournalError::AlreadyRolledBack`] if it was stamped before.
    pub fn mark_rolled_back(&mut self, outcome: RollbackExecutionResult) -> Result<(), JournalError> {
        self.ensure_rollback_allowed()?;
        self.rolled_back_at = Some(outcome.completed_at.unwrap_or_else(Utc::now));
        self.rollback = Some(outcome);
        Ok(())
    }
}
