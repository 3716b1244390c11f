//! Action executor with dry-run previews and rollback capture.
//!
//! # Overview
//!
//! The [`Executor`] applies one [`Action`] to a list of target records,
//! strictly in order, and reports the outcome of every target in an
//! [`ExecutionResult`]. A failing target never stops the batch.
//!
//! # Safety
//!
//! - Dry runs never touch the filesystem.
//! - A move never overwrites an existing destination file.
//! - A delete captures the file's bytes (below the capture ceiling), or a
//!   symbolic link's target, before removing it, so it can be restored.
//! - Rollback records are kept only for mutations that completed.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::{
    Action, ActionKind, ActionRequest, CompressParams, ExecutionResult, MoveParams,
    OperationRecord, OperationStatus, RollbackExecutionResult, RollbackRecord, TagParams,
};
use crate::error::{ErrorKind, FailureEntry};
use crate::progress::{phase, ProgressCallback};
use crate::scanner::FileRecord;

/// Delete captures content only for files strictly smaller than this (1 MiB).
pub const DEFAULT_CAPTURE_CEILING: u64 = 1024 * 1024;

/// Performs or previews actions over target files.
pub struct Executor {
    /// Deleted files below this size are captured for rollback
    capture_ceiling: u64,
    /// Optional shutdown flag for graceful termination
    shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress reporter
    progress: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor")
            .field("capture_ceiling", &self.capture_ceiling)
            .finish_non_exhaustive()
    }
}

impl Default for Executor {
    fn default() -> Self {
        Self::new()
    }
}

/// Why a single target failed.
struct TargetFailure {
    kind: ErrorKind,
    message: String,
}

impl TargetFailure {
    fn io(error: &io::Error) -> Self {
        let kind = ErrorKind::from_io(error);
        let message = match kind {
            ErrorKind::PermissionDenied => "Permission denied".to_string(),
            _ => error.to_string(),
        };
        Self { kind, message }
    }
}

impl Executor {
    /// Create an executor with the default capture ceiling.
    #[must_use]
    pub fn new() -> Self {
        Self {
            capture_ceiling: DEFAULT_CAPTURE_CEILING,
            shutdown_flag: None,
            progress: None,
        }
    }

    /// Set the delete capture ceiling.
    #[must_use]
    pub fn with_capture_ceiling(mut self, ceiling: u64) -> Self {
        self.capture_ceiling = ceiling;
        self
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Report progress per target.
    #[must_use]
    pub fn with_progress(mut self, progress: Arc<dyn ProgressCallback>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// The delete capture ceiling.
    #[must_use]
    pub fn capture_ceiling(&self) -> u64 {
        self.capture_ceiling
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Execute an untyped request.
    ///
    /// A request that cannot be converted yields a result with no
    /// operations and a single call-level error.
    pub fn execute_request(
        &self,
        request: &ActionRequest,
        targets: &[FileRecord],
        dry_run: bool,
    ) -> ExecutionResult {
        match request.to_action() {
            Ok(action) => self.execute(&action, targets, dry_run),
            Err(e) => {
                log::warn!("Rejected action request: {}", e);
                let mut result = ExecutionResult::new(None, dry_run);
                result.errors.push(e.to_failure());
                result.finish();
                result
            }
        }
    }

    /// Execute `action` over `targets`.
    pub fn execute(&self, action: &Action, targets: &[FileRecord], dry_run: bool) -> ExecutionResult {
        let kind = action.kind();
        log::info!(
            "Executing {} on {} file(s) (dry_run={})",
            kind,
            targets.len(),
            dry_run
        );

        let mut result = ExecutionResult::new(Some(kind), dry_run);
        if let Some(progress) = &self.progress {
            progress.on_phase_start(phase::EXECUTE, targets.len());
        }

        match action {
            Action::Move(params) => self.each_target(targets, &mut result, |target, result| {
                self.move_target(params, target, dry_run, result);
            }),
            Action::Delete => self.each_target(targets, &mut result, |target, result| {
                self.delete_target(target, dry_run, result);
            }),
            Action::Compress(params) => self.compress(params, targets, dry_run, &mut result),
            Action::Tag(params) => self.each_target(targets, &mut result, |target, result| {
                tag_target(params, target, dry_run, result);
            }),
        }

        if let Some(progress) = &self.progress {
            progress.on_phase_end(phase::EXECUTE);
        }

        result.finish();
        log::info!("{}", result.summary());
        result
    }

    /// Replay rollback records, reporting progress and honouring shutdown.
    pub fn rollback(&self, records: &[RollbackRecord]) -> RollbackExecutionResult {
        super::rollback::rollback_with(records, self.shutdown_flag.as_deref(), self.progress.as_deref())
    }

    fn each_target<F>(&self, targets: &[FileRecord], result: &mut ExecutionResult, mut handle: F)
    where
        F: FnMut(&FileRecord, &mut ExecutionResult),
    {
        for (index, target) in targets.iter().enumerate() {
            if self.is_shutdown_requested() {
                log::warn!("Execution interrupted after {} of {} target(s)", index, targets.len());
                result.interrupted = true;
                return;
            }
            handle(target, result);
            if let Some(progress) = &self.progress {
                progress.on_progress(index + 1, &target.path.to_string_lossy());
            }
        }
    }

    fn move_target(
        &self,
        params: &MoveParams,
        target: &FileRecord,
        dry_run: bool,
        result: &mut ExecutionResult,
    ) {
        let source = &target.path;
        let Some(file_name) = source.file_name() else {
            record_failure(
                result,
                OperationRecord::new(ActionKind::Move, source, target.size, OperationStatus::Failed),
                TargetFailure {
                    kind: ErrorKind::InvalidInput,
                    message: "Path has no file name".to_string(),
                },
            );
            return;
        };
        let destination = params.destination_dir.join(file_name);
        let op = OperationRecord::new(ActionKind::Move, source, target.size, OperationStatus::Planned)
            .with_destination(destination.clone());

        let size = match fs::symlink_metadata(source) {
            Ok(meta) => meta.len(),
            Err(e) => {
                record_failure(result, op, TargetFailure::io(&e));
                return;
            }
        };

        if dry_run {
            log::debug!("Would move {} -> {}", source.display(), destination.display());
            result.operations.push(op);
            result.successes += 1;
            return;
        }

        match move_file(source, &destination) {
            Ok(()) => {
                log::debug!("Moved {} -> {}", source.display(), destination.display());
                result
                    .rollback_records
                    .push(RollbackRecord::for_move(source, &destination, size));
                result.operations.push(OperationRecord {
                    status: OperationStatus::Completed,
                    size,
                    ..op
                });
                result.successes += 1;
            }
            Err(failure) => record_failure(result, op, failure),
        }
    }

    fn delete_target(&self, target: &FileRecord, dry_run: bool, result: &mut ExecutionResult) {
        let path = &target.path;
        let op = OperationRecord::new(ActionKind::Delete, path, target.size, OperationStatus::Planned);

        let metadata = match fs::symlink_metadata(path) {
            Ok(meta) => meta,
            Err(e) => {
                record_failure(result, op, TargetFailure::io(&e));
                return;
            }
        };

        if dry_run {
            log::debug!("Would delete {} ({} bytes)", path.display(), target.size);
            result.operations.push(op);
            result.successes += 1;
            return;
        }

        let size = metadata.len();
        let op = OperationRecord { size, ..op };

        // Snapshot stays local until the removal succeeds
        let snapshot = if metadata.file_type().is_symlink() {
            fs::read_link(path).map(|link| RollbackRecord::for_deleted_link(path, size, &link))
        } else if metadata.is_file() && size < self.capture_ceiling {
            fs::read(path).map(|bytes| RollbackRecord::for_delete(path, size, Some(bytes)))
        } else {
            log::debug!(
                "Not capturing {} ({} bytes >= ceiling {}); delete is not restorable",
                path.display(),
                size,
                self.capture_ceiling
            );
            Ok(RollbackRecord::for_delete(path, size, None))
        };
        let snapshot = match snapshot {
            Ok(record) => record,
            Err(e) => {
                record_failure(result, op, TargetFailure::io(&e));
                return;
            }
        };

        match fs::remove_file(path) {
            Ok(()) => {
                log::debug!("Deleted {} ({} bytes)", path.display(), size);
                result.rollback_records.push(snapshot);
                result.operations.push(OperationRecord {
                    status: OperationStatus::Completed,
                    ..op
                });
                result.successes += 1;
            }
            Err(e) => record_failure(result, op, TargetFailure::io(&e)),
        }
    }

    fn compress(
        &self,
        params: &CompressParams,
        targets: &[FileRecord],
        dry_run: bool,
        result: &mut ExecutionResult,
    ) {
        let op = OperationRecord {
            action: ActionKind::Compress,
            sources: targets.iter().map(|t| t.path.clone()).collect(),
            destination: None,
            archive_name: Some(params.archive_name.clone()),
            tags: Vec::new(),
            size: targets.iter().map(|t| t.size).sum(),
            status: OperationStatus::Planned,
            reason: None,
        };

        if dry_run {
            log::debug!(
                "Would compress {} file(s) into {}",
                targets.len(),
                params.archive_name
            );
            result.operations.push(op);
            result.successes += targets.len();
        } else {
            log::warn!(
                "Compression is not implemented; {} file(s) left untouched (archive {})",
                targets.len(),
                params.archive_name
            );
            result.operations.push(OperationRecord {
                status: OperationStatus::NotImplemented,
                ..op
            });
        }

        if let Some(progress) = &self.progress {
            progress.on_progress(targets.len(), &params.archive_name);
        }
    }
}

fn tag_target(params: &TagParams, target: &FileRecord, dry_run: bool, result: &mut ExecutionResult) {
    let status = if dry_run {
        OperationStatus::Planned
    } else {
        OperationStatus::Completed
    };
    log::debug!("Tagging {} with {:?}", target.path.display(), params.tags);
    result.operations.push(
        OperationRecord::new(ActionKind::Tag, &target.path, target.size, status)
            .with_tags(params.tags.clone()),
    );
    result.successes += 1;
}

fn record_failure(result: &mut ExecutionResult, op: OperationRecord, failure: TargetFailure) {
    let path: PathBuf = op.sources.first().cloned().unwrap_or_default();
    log::warn!("{} failed for {}: {}", op.action, path.display(), failure.message);
    result
        .errors
        .push(FailureEntry::new(path, failure.kind, failure.message.clone()));
    result.operations.push(op.failed(failure.message));
    result.failures += 1;
}

/// Move a file, refusing to overwrite and falling back to copy + remove
/// across filesystems.
fn move_file(source: &Path, destination: &Path) -> Result<(), TargetFailure> {
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).map_err(|e| TargetFailure::io(&e))?;
    }

    if fs::symlink_metadata(destination).is_ok() {
        return Err(TargetFailure {
            kind: ErrorKind::DestinationExists,
            message: format!("Destination already exists: {}", destination.display()),
        });
    }

    match fs::rename(source, destination) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            log::debug!(
                "Cross-device move of {}, copying instead",
                source.display()
            );
            fs::copy(source, destination).map_err(|e| TargetFailure::io(&e))?;
            if let Err(e) = fs::remove_file(source) {
                // Undo the copy so only the source remains
                let _ = fs::remove_file(destination);
                return Err(TargetFailure::io(&e));
            }
            Ok(())
        }
        Err(e) => Err(TargetFailure::io(&e)),
    }
}
