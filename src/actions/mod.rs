//! File actions module.
//!
//! This module provides functionality for:
//! - Moving, deleting, compressing and tagging scanned files
//! - Dry-run previews that never touch the filesystem
//! - Rollback records for every completed mutation
//! - Replaying rollback records to undo an execution
//!
//! # Execution
//!
//! ```no_run
//! use data_organizer::actions::{Action, Executor, MoveParams};
//! use data_organizer::scanner::FileRecord;
//! use std::path::PathBuf;
//!
//! let executor = Executor::new();
//! let targets = vec![FileRecord::from_path(PathBuf::from("/tmp/report.pdf"), 0)];
//! let action = Action::Move(MoveParams::new("/tmp/organized"));
//!
//! let preview = executor.execute(&action, &targets, true);
//! println!("{}", preview.summary());
//! ```
//!
//! # Rollback
//!
//! A real execution returns [`RollbackRecord`]s. Feeding them to
//! [`Executor::rollback`] moves files back and rewrites captured content of
//! deleted files.

pub mod executor;
pub mod rollback;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{ErrorKind, FailureEntry};

// Re-export commonly used types
pub use executor::{Executor, DEFAULT_CAPTURE_CEILING};
pub use rollback::rollback;

/// Archive name used when a compress request does not name one.
pub const DEFAULT_ARCHIVE_NAME: &str = "archive.zip";

/// Kind of action the executor can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Relocate files into a directory
    Move,
    /// Remove files
    Delete,
    /// Bundle files into one archive
    Compress,
    /// Attach tags without touching the filesystem
    Tag,
}

impl ActionKind {
    /// Every action kind.
    pub const ALL: [ActionKind; 4] = [Self::Move, Self::Delete, Self::Compress, Self::Tag];

    /// Stable lower-case name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Move => "move",
            Self::Delete => "delete",
            Self::Compress => "compress",
            Self::Tag => "tag",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = ExecuteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == lower)
            .ok_or_else(|| ExecuteError::unknown_action(s))
    }
}

/// Parameters of a move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveParams {
    /// Directory the files are moved into
    pub destination_dir: PathBuf,
}

impl MoveParams {
    /// Move into `destination_dir`.
    #[must_use]
    pub fn new(destination_dir: impl Into<PathBuf>) -> Self {
        Self {
            destination_dir: destination_dir.into(),
        }
    }
}

/// Parameters of a compress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressParams {
    /// File name of the archive
    pub archive_name: String,
}

impl Default for CompressParams {
    fn default() -> Self {
        Self {
            archive_name: DEFAULT_ARCHIVE_NAME.to_string(),
        }
    }
}

/// Parameters of a tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagParams {
    /// Tags to attach
    pub tags: Vec<String>,
}

/// A fully specified action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Move targets into a directory
    Move(MoveParams),
    /// Delete targets
    Delete,
    /// Compress targets into one archive
    Compress(CompressParams),
    /// Tag targets
    Tag(TagParams),
}

impl Action {
    /// The kind of this action.
    #[must_use]
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::Move(_) => ActionKind::Move,
            Self::Delete => ActionKind::Delete,
            Self::Compress(_) => ActionKind::Compress,
            Self::Tag(_) => ActionKind::Tag,
        }
    }
}

/// Optional parameters of an untyped request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestParams {
    /// Destination directory for a move
    pub destination_directory: Option<PathBuf>,
    /// Archive name for a compress
    pub archive_name: Option<String>,
    /// Tags for a tag action
    pub tags: Vec<String>,
}

/// An action as produced by an external recommender: a name plus loose
/// parameters.
///
/// ```
/// use data_organizer::actions::{Action, ActionRequest};
///
/// let request: ActionRequest =
///     serde_json::from_str(r#"{"action": "tag", "params": {"tags": ["old"]}}"#).unwrap();
/// assert!(matches!(request.to_action().unwrap(), Action::Tag(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRequest {
    /// Action name (`move`, `delete`, `compress`, `tag`)
    pub action: String,
    /// Parameters; only those relevant to the action are read
    #[serde(default)]
    pub params: RequestParams,
}

impl ActionRequest {
    /// Create a request without parameters.
    #[must_use]
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            params: RequestParams::default(),
        }
    }

    /// Convert into a typed [`Action`].
    ///
    /// # Errors
    ///
    /// [`ExecuteError::UnknownAction`] for an unrecognised name and
    /// [`ExecuteError::MissingParameter`] for a move without a destination.
    pub fn to_action(&self) -> Result<Action, ExecuteError> {
        let kind: ActionKind = self.action.parse()?;
        Ok(match kind {
            ActionKind::Move => {
                let destination = self.params.destination_directory.clone().ok_or(
                    ExecuteError::MissingParameter {
                        action: kind,
                        parameter: "destination_directory",
                    },
                )?;
                Action::Move(MoveParams::new(destination))
            }
            ActionKind::Delete => Action::Delete,
            ActionKind::Compress => Action::Compress(CompressParams {
                archive_name: self
                    .params
                    .archive_name
                    .clone()
                    .unwrap_or_else(|| DEFAULT_ARCHIVE_NAME.to_string()),
            }),
            ActionKind::Tag => Action::Tag(TagParams {
                tags: self.params.tags.clone(),
            }),
        })
    }
}

/// Errors converting a request into an action.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExecuteError {
    /// The action name is not recognised.
    #[error("Unknown action: '{name}'{}", did_you_mean(.suggestion))]
    UnknownAction {
        /// Name as given
        name: String,
        /// Closest known action name
        suggestion: Option<String>,
    },

    /// A required parameter is absent.
    #[error("Action '{action}' requires parameter '{parameter}'")]
    MissingParameter {
        /// The action being converted
        action: ActionKind,
        /// The missing parameter's name
        parameter: &'static str,
    },
}

fn did_you_mean(suggestion: &Option<String>) -> String {
    suggestion
        .as_ref()
        .map(|s| format!(". Did you mean '{s}'?"))
        .unwrap_or_default()
}

impl ExecuteError {
    /// Build an unknown-action error with a "did you mean" suggestion.
    #[must_use]
    pub fn unknown_action(name: &str) -> Self {
        let suggestion = ActionKind::ALL
            .into_iter()
            .map(|k| (k, strsim::jaro_winkler(&name.to_lowercase(), k.as_str())))
            .filter(|(_, score)| *score > 0.8)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(k, _)| k.as_str().to_string());
        Self::UnknownAction {
            name: name.to_string(),
            suggestion,
        }
    }

    /// Classification of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownAction { .. } => ErrorKind::UnknownAction,
            Self::MissingParameter { .. } => ErrorKind::InvalidInput,
        }
    }

    /// Convert into a call-level failure entry.
    #[must_use]
    pub fn to_failure(&self) -> FailureEntry {
        FailureEntry::general(self.kind(), self.to_string())
    }
}

/// Outcome of one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationStatus {
    /// Dry-run preview
    Planned,
    /// Performed
    Completed,
    /// Attempted and failed
    Failed,
    /// Accepted but deliberately not performed
    NotImplemented,
}

impl OperationStatus {
    /// Stable snake_case name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::NotImplemented => "not_implemented",
        }
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One planned or performed operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationRecord {
    /// What was done
    pub action: ActionKind,
    /// Source path(s); several only for compress
    pub sources: Vec<PathBuf>,
    /// Destination path (move)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<PathBuf>,
    /// Archive name (compress)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive_name: Option<String>,
    /// Tags (tag)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Bytes involved
    pub size: u64,
    /// Outcome
    pub status: OperationStatus,
    /// Why the operation failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl OperationRecord {
    /// Operation on a single source.
    #[must_use]
    pub fn new(action: ActionKind, source: &Path, size: u64, status: OperationStatus) -> Self {
        Self {
            action,
            sources: vec![source.to_path_buf()],
            destination: None,
            archive_name: None,
            tags: Vec::new(),
            size,
            status,
            reason: None,
        }
    }

    /// Set the destination path.
    #[must_use]
    pub fn with_destination(mut self, destination: PathBuf) -> Self {
        self.destination = Some(destination);
        self
    }

    /// Set the tag list.
    #[must_use]
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Mark as failed with a reason.
    #[must_use]
    pub fn failed(mut self, reason: impl Into<String>) -> Self {
        self.status = OperationStatus::Failed;
        self.reason = Some(reason.into());
        self
    }
}

/// Information needed to reverse one completed mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollbackRecord {
    /// What was done
    pub action: ActionKind,
    /// Where the file was before
    pub original_path: PathBuf,
    /// Where the file is now (move)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_path: Option<PathBuf>,
    /// Size in bytes at the time of the action
    pub size: u64,
    /// Original bytes of a deleted file, when captured
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "content_base64"
    )]
    pub content: Option<Vec<u8>>,
    /// Target of a deleted symbolic link
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_target: Option<PathBuf>,
}

impl RollbackRecord {
    /// Record of a move from `original` to `new_path`.
    #[must_use]
    pub fn for_move(original: &Path, new_path: &Path, size: u64) -> Self {
        Self {
            action: ActionKind::Move,
            original_path: original.to_path_buf(),
            new_path: Some(new_path.to_path_buf()),
            size,
            content: None,
            link_target: None,
        }
    }

    /// Record of a delete, with the captured bytes if any.
    #[must_use]
    pub fn for_delete(original: &Path, size: u64, content: Option<Vec<u8>>) -> Self {
        Self {
            action: ActionKind::Delete,
            original_path: original.to_path_buf(),
            new_path: None,
            size,
            content,
            link_target: None,
        }
    }

    /// Record of a deleted symbolic link pointing at `target`.
    #[must_use]
    pub fn for_deleted_link(original: &Path, size: u64, target: &Path) -> Self {
        Self {
            link_target: Some(target.to_path_buf()),
            ..Self::for_delete(original, size, None)
        }
    }

    /// Whether replaying this record can restore the file.
    #[must_use]
    pub fn is_restorable(&self) -> bool {
        match self.action {
            ActionKind::Move => self.new_path.is_some(),
            ActionKind::Delete => self.content.is_some() || self.link_target.is_some(),
            ActionKind::Compress | ActionKind::Tag => false,
        }
    }
}

/// Serde adapter storing optional bytes as a base64 string.
mod content_base64 {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(bytes) => serializer.serialize_some(&STANDARD.encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|encoded| STANDARD.decode(encoded).map_err(serde::de::Error::custom))
            .transpose()
    }
}

/// Outcome of one [`Executor::execute`] call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Whether this was a preview
    pub dry_run: bool,
    /// Action performed; absent when the request named an unknown action
    pub action: Option<ActionKind>,
    /// Operations in target order
    pub operations: Vec<OperationRecord>,
    /// Targets handled successfully
    pub successes: usize,
    /// Targets that failed
    pub failures: usize,
    /// Recovered failures
    pub errors: Vec<FailureEntry>,
    /// Records to undo completed mutations, in execution order
    pub rollback_records: Vec<RollbackRecord>,
    /// True iff at least one rollback record exists
    pub can_rollback: bool,
    /// When execution began
    pub started_at: DateTime<Utc>,
    /// When execution ended
    pub completed_at: Option<DateTime<Utc>>,
    /// Whether execution stopped early on a shutdown request
    #[serde(default)]
    pub interrupted: bool,
}

impl ExecutionResult {
    /// Start an empty result.
    #[must_use]
    pub fn new(action: Option<ActionKind>, dry_run: bool) -> Self {
        Self {
            dry_run,
            action,
            operations: Vec::new(),
            successes: 0,
            failures: 0,
            errors: Vec::new(),
            rollback_records: Vec::new(),
            can_rollback: false,
            started_at: Utc::now(),
            completed_at: None,
            interrupted: false,
        }
    }

    /// Stamp completion and derive `can_rollback`.
    pub fn finish(&mut self) {
        self.can_rollback = !self.rollback_records.is_empty();
        self.completed_at = Some(Utc::now());
    }

    fn completed(&self, kind: ActionKind) -> impl Iterator<Item = &OperationRecord> {
        self.operations
            .iter()
            .filter(move |op| op.action == kind && op.status == OperationStatus::Completed)
    }

    /// Number of files actually moved.
    #[must_use]
    pub fn files_moved(&self) -> usize {
        self.completed(ActionKind::Move).count()
    }

    /// Number of files actually deleted.
    #[must_use]
    pub fn files_deleted(&self) -> usize {
        self.completed(ActionKind::Delete).count()
    }

    /// Bytes removed by completed deletes.
    #[must_use]
    pub fn space_freed(&self) -> u64 {
        self.completed(ActionKind::Delete).map(|op| op.size).sum()
    }

    /// Number of operation records.
    #[must_use]
    pub fn total_operations(&self) -> usize {
        self.operations.len()
    }

    /// Whether any target failed or the request was rejected.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Elapsed time between start and completion.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.completed_at
            .and_then(|end| (end - self.started_at).to_std().ok())
            .unwrap_or_default()
    }

    /// Human-readable summary.
    #[must_use]
    pub fn summary(&self) -> String {
        let action = self.action.map_or("unknown", ActionKind::as_str);
        let mode = if self.dry_run { "dry run" } else { "applied" };
        let mut text = format!(
            "{action} ({mode}): {} operation(s), {} succeeded, {} failed",
            self.total_operations(),
            self.successes,
            self.failures
        );
        if self.files_moved() > 0 {
            text.push_str(&format!(", moved {} file(s)", self.files_moved()));
        }
        if self.files_deleted() > 0 {
            text.push_str(&format!(
                ", deleted {} file(s), freed {}",
                self.files_deleted(),
                crate::output::format_size(self.space_freed())
            ));
        }
        if self.interrupted {
            text.push_str(" (interrupted)");
        }
        text
    }
}

/// One replayed rollback record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollbackOperation {
    /// Kind of the action being undone
    pub action: ActionKind,
    /// Where the file was taken from (move)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<PathBuf>,
    /// Where the file was restored to
    pub to: PathBuf,
    /// Outcome
    pub status: OperationStatus,
    /// Why the record could not be replayed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Outcome of one rollback call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollbackExecutionResult {
    /// Replayed records in input order
    pub operations: Vec<RollbackOperation>,
    /// Records restored
    pub successes: usize,
    /// Records that could not be restored
    pub failures: usize,
    /// Per-record failures
    pub errors: Vec<FailureEntry>,
    /// When the rollback began
    pub started_at: DateTime<Utc>,
    /// When the rollback ended
    pub completed_at: Option<DateTime<Utc>>,
    /// Whether the rollback stopped early on a shutdown request
    #[serde(default)]
    pub interrupted: bool,
}

impl RollbackExecutionResult {
    /// Start an empty result.
    #[must_use]
    pub fn new() -> Self {
        Self {
            operations: Vec::new(),
            successes: 0,
            failures: 0,
            errors: Vec::new(),
            started_at: Utc::now(),
            completed_at: None,
            interrupted: false,
        }
    }

    /// Whether every record was restored.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failures == 0 && !self.interrupted
    }

    /// Human-readable summary.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut text = format!(
            "Rolled back {} of {} operation(s)",
            self.successes,
            self.successes + self.failures
        );
        if self.failures > 0 {
            text.push_str(&format!(", {} failed", self.failures));
        }
        if self.interrupted {
            text.push_str(" (interrupted)");
        }
        text
    }
}

impl Default for RollbackExecutionResult {
    fn default() -> Self {
        Self::new()
    }
}
