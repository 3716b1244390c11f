//! Replay of rollback records.
//!
//! Each record is handled on its own: a record that cannot be replayed is
//! reported and the next one is tried. A record whose original path is
//! occupied again fails with `DestinationExists`; rollback never replaces a
//! file. Replaying the same records twice therefore fails for every record.

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use super::{ActionKind, OperationStatus, RollbackExecutionResult, RollbackOperation, RollbackRecord};
use crate::error::{ErrorKind, FailureEntry};
use crate::progress::{phase, ProgressCallback};

/// Replay `records` in order.
///
/// Never fails as a whole; see [`RollbackExecutionResult::errors`] for
/// records that could not be restored.
#[must_use]
pub fn rollback(records: &[RollbackRecord]) -> RollbackExecutionResult {
    rollback_with(records, None, None)
}

pub(crate) fn rollback_with(
    records: &[RollbackRecord],
    shutdown: Option<&AtomicBool>,
    progress: Option<&dyn ProgressCallback>,
) -> RollbackExecutionResult {
    log::info!("Rolling back {} operation(s)", records.len());
    let mut result = RollbackExecutionResult::new();
    if let Some(progress) = progress {
        progress.on_phase_start(phase::ROLLBACK, records.len());
    }

    for (index, record) in records.iter().enumerate() {
        if shutdown.is_some_and(|f| f.load(Ordering::SeqCst)) {
            log::warn!("Rollback interrupted after {} of {} record(s)", index, records.len());
            result.interrupted = true;
            break;
        }

        let mut op = RollbackOperation {
            action: record.action,
            from: record.new_path.clone(),
            to: record.original_path.clone(),
            status: OperationStatus::Completed,
            reason: None,
        };

        match replay(record) {
            Ok(()) => {
                log::debug!("Restored {}", record.original_path.display());
                result.successes += 1;
            }
            Err(failure) => {
                log::warn!(
                    "Cannot roll back {} {}: {}",
                    record.action,
                    record.original_path.display(),
                    failure.message
                );
                op.status = OperationStatus::Failed;
                op.reason = Some(failure.message.clone());
                result.errors.push(failure);
                result.failures += 1;
            }
        }
        result.operations.push(op);

        if let Some(progress) = progress {
            progress.on_progress(index + 1, &record.original_path.to_string_lossy());
        }
    }

    if let Some(progress) = progress {
        progress.on_phase_end(phase::ROLLBACK);
    }
    result.completed_at = Some(chrono::Utc::now());
    log::info!("{}", result.summary());
    result
}

fn replay(record: &RollbackRecord) -> Result<(), FailureEntry> {
    let original = record.original_path.as_path();
    match record.action {
        ActionKind::Move => {
            let Some(new_path) = record.new_path.as_deref() else {
                return Err(FailureEntry::new(
                    original,
                    ErrorKind::InvalidInput,
                    "Move record has no new path",
                ));
            };
            if fs::symlink_metadata(new_path).is_err() {
                return Err(FailureEntry::new(
                    new_path,
                    ErrorKind::NotFound,
                    "File not found at new location",
                ));
            }
            ensure_vacant(original)?;
            ensure_parent(original)?;
            move_back(new_path, original).map_err(|e| FailureEntry::from_io(original, &e))
        }
        ActionKind::Delete => {
            if let Some(target) = &record.link_target {
                ensure_vacant(original)?;
                ensure_parent(original)?;
                return restore_link(target, original)
                    .map_err(|e| FailureEntry::from_io(original, &e));
            }
            let Some(content) = &record.content else {
                return Err(FailureEntry::new(
                    original,
                    ErrorKind::ContentUnavailable,
                    "File content not saved, cannot restore",
                ));
            };
            ensure_vacant(original)?;
            ensure_parent(original)?;
            write_new(original, content).map_err(|e| FailureEntry::from_io(original, &e))
        }
        ActionKind::Compress | ActionKind::Tag => Err(FailureEntry::new(
            original,
            ErrorKind::UnsupportedRollback,
            format!("Cannot roll back a {} operation", record.action),
        )),
    }
}

fn ensure_vacant(path: &Path) -> Result<(), FailureEntry> {
    if fs::symlink_metadata(path).is_ok() {
        return Err(FailureEntry::new(
            path,
            ErrorKind::DestinationExists,
            format!("Original path is occupied: {}", path.display()),
        ));
    }
    Ok(())
}

/// Write `content` to a path that must not exist yet.
fn write_new(path: &Path, content: &[u8]) -> io::Result<()> {
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)?;
    file.write_all(content)
}

#[cfg(unix)]
fn restore_link(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn restore_link(target: &Path, link: &Path) -> io::Result<()> {
    // Relative targets resolve against the link's directory
    let resolved = link.parent().map_or_else(|| target.to_path_buf(), |p| p.join(target));
    if resolved.is_dir() {
        std::os::windows::fs::symlink_dir(target, link)
    } else {
        std::os::windows::fs::symlink_file(target, link)
    }
}

#[cfg(not(any(unix, windows)))]
fn restore_link(_target: &Path, _link: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "symbolic links are not supported on this platform",
    ))
}

fn ensure_parent(path: &Path) -> Result<(), FailureEntry> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| FailureEntry::from_io(parent, &e))
        }
        _ => Ok(()),
    }
}

fn move_back(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            let mut reader = fs::File::open(from)?;
            let mut writer = fs::OpenOptions::new().write(true).create_new(true).open(to)?;
            io::copy(&mut reader, &mut writer)?;
            fs::remove_file(from)
        }
        other => other,
    }
}
