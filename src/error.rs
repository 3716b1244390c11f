//! Structured error handling and exit codes.
//!
//! Per-entry and per-target failures never abort a scan, an execution or a
//! rollback. They are collected as [`FailureEntry`] values tagged with an
//! [`ErrorKind`] so callers can explain every failure without parsing
//! message strings.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Exit codes for the data-organizer binary.
///
/// - 0: Success
/// - 1: General error (unexpected failure, invalid input)
/// - 3: Partial success (completed with some per-item failures)
/// - 130: Interrupted by user (Ctrl+C)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: the command completed without per-item failures.
    Success = 0,
    /// General error: An unexpected error occurred.
    GeneralError = 1,
    /// Partial success: completed but some entries or targets failed.
    PartialSuccess = 3,
    /// Interrupted: the command was interrupted by the user (Ctrl+C).
    Interrupted = 130,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "DO000",
            Self::GeneralError => "DO001",
            Self::PartialSuccess => "DO003",
            Self::Interrupted => "DO130",
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "DO001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
    /// Whether the operation was interrupted
    pub interrupted: bool,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: err.to_string(),
            interrupted: exit_code == ExitCode::Interrupted,
        }
    }
}

/// Classification of a recoverable or fatal failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Bad root path or parameters.
    InvalidInput,
    /// The OS refused access.
    PermissionDenied,
    /// The path does not exist (any more).
    NotFound,
    /// Any other I/O failure.
    IoFailure,
    /// A delete cannot be undone because its content was not captured.
    ContentUnavailable,
    /// The rollback record describes an action that cannot be reversed.
    UnsupportedRollback,
    /// The requested action kind is not recognised.
    UnknownAction,
    /// A move would overwrite an existing file.
    DestinationExists,
    /// The record sink rejected a discovered record.
    SinkFailure,
}

impl ErrorKind {
    /// Map an I/O error onto the taxonomy.
    #[must_use]
    pub fn from_io(error: &io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => Self::NotFound,
            io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            io::ErrorKind::AlreadyExists => Self::DestinationExists,
            _ => Self::IoFailure,
        }
    }

    /// Stable snake_case name, as used in JSON output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::PermissionDenied => "permission_denied",
            Self::NotFound => "not_found",
            Self::IoFailure => "io_failure",
            Self::ContentUnavailable => "content_unavailable",
            Self::UnsupportedRollback => "unsupported_rollback",
            Self::UnknownAction => "unknown_action",
            Self::DestinationExists => "destination_exists",
            Self::SinkFailure => "sink_failure",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recovered failure, attached to the path it concerns.
///
/// `path` is `None` only for call-level failures that have no single target,
/// such as an unknown action kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureEntry {
    /// The path that failed
    pub path: Option<PathBuf>,
    /// What kind of failure this was
    pub kind: ErrorKind,
    /// Human-readable reason
    pub message: String,
}

impl FailureEntry {
    /// Create a failure attached to a path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            kind,
            message: message.into(),
        }
    }

    /// Create a failure that concerns the whole call.
    #[must_use]
    pub fn general(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            path: None,
            kind,
            message: message.into(),
        }
    }

    /// Build a failure from an I/O error.
    #[must_use]
    pub fn from_io(path: &Path, error: &io::Error) -> Self {
        let kind = ErrorKind::from_io(error);
        let message = match kind {
            ErrorKind::PermissionDenied => "Permission denied".to_string(),
            _ => error.to_string(),
        };
        Self::new(path, kind, message)
    }
}

impl fmt::Display for FailureEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "[{}] {}: {}", self.kind, path.display(), self.message),
            None => write!(f, "[{}] {}", self.kind, self.message),
        }
    }
}
