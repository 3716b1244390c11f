//! Recursive directory scanner with a bounded hashing pool.
//!
//! # Overview
//!
//! The [`Scanner`] walks a directory tree depth-first on the calling thread
//! using [`walkdir`], and hands the files of each directory to a fixed-size
//! rayon pool for hashing and categorization. Counters and the record list
//! are only ever touched by the traversal thread, so results are
//! deterministic for a given tree.
//!
//! # Features
//!
//! - Depth ceiling counted from the root (root = 0)
//! - Hidden-name and symlink policy checked on the entry itself
//! - Symlink cycle detection when following links
//! - Per-entry error isolation: failures are recorded, siblings continue
//! - Graceful shutdown via atomic flag
//!
//! # Example
//!
//! ```no_run
//! use data_organizer::scanner::{NullSink, ScanConfig, Scanner};
//! use std::path::Path;
//!
//! let scanner = Scanner::new(ScanConfig::default()).unwrap();
//! let result = scanner.scan(Path::new("/home/user/Downloads"), &mut NullSink).unwrap();
//! for error in &result.errors {
//!     eprintln!("Warning: {}", error);
//! }
//! ```

use std::cmp::Ordering as CmpOrdering;
use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::fs::{self, Metadata};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use walkdir::{DirEntry, WalkDir};

use super::hasher::hash_file;
use super::sink::FileSink;
use super::{FileRecord, HashError, ScanConfig, ScanError, ScanResult};
use crate::error::{ErrorKind, FailureEntry};
use crate::progress::{phase, ProgressCallback};

/// Directory scanner owning a bounded hashing pool.
///
/// The pool lives as long as the scanner. Dropping the scanner waits for
/// outstanding hash jobs and joins the worker threads.
pub struct Scanner {
    /// Scanner configuration
    config: ScanConfig,
    /// Worker pool for hashing and categorization
    pool: ThreadPool,
    /// Optional shutdown flag for graceful termination
    shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress reporter
    progress: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for Scanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scanner")
            .field("config", &self.config)
            .field("workers", &self.pool.current_num_threads())
            .finish_non_exhaustive()
    }
}

/// A non-directory entry waiting to be hashed.
struct PendingFile {
    path: PathBuf,
    metadata: Metadata,
    is_symlink: bool,
}

/// Mutable state of one scan call; single writer.
struct ScanState {
    result: ScanResult,
    /// Directory yielded by the walk whose listing has not been confirmed yet
    unopened: Option<PathBuf>,
}

impl ScanState {
    /// Count the directory yielded last unless its listing failed.
    ///
    /// walkdir reports a directory before opening it; a failed open shows up
    /// as the very next item, an error carrying the same path.
    fn settle_directory(&mut self, failed: Option<&Path>) {
        if let Some(dir) = self.unopened.take() {
            if failed != Some(dir.as_path()) {
                self.result.total_directories += 1;
            }
        }
    }
}

impl Scanner {
    /// Create a scanner and start its hashing pool.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Pool`] if the worker threads cannot be spawned.
    pub fn new(config: ScanConfig) -> Result<Self, ScanError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.worker_threads.max(1))
            .thread_name(|i| format!("scan-hash-{i}"))
            .build()?;

        Ok(Self {
            config,
            pool,
            shutdown_flag: None,
            progress: None,
        })
    }

    /// Set the shutdown flag for graceful termination.
    ///
    /// When the flag is set to `true`, the scan stops before the next entry
    /// and returns the records gathered so far with `interrupted` set.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Report progress every `batch_size` files.
    #[must_use]
    pub fn with_progress(mut self, progress: Arc<dyn ProgressCallback>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// The configuration this scanner was built with.
    #[must_use]
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Check if shutdown has been requested.
    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Scan `root`, handing every discovered file to `sink`.
    ///
    /// # Errors
    ///
    /// Fails only when `root` cannot be inspected or is not a directory.
    /// Every other failure is recorded in [`ScanResult::errors`].
    pub fn scan<S>(&self, root: &Path, sink: &mut S) -> Result<ScanResult, ScanError>
    where
        S: FileSink + ?Sized,
    {
        let root_meta = fs::metadata(root).map_err(|e| ScanError::from_root_io(root, e))?;
        if !root_meta.is_dir() {
            return Err(ScanError::NotADirectory(root.to_path_buf()));
        }

        let root = std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf());
        log::info!(
            "Scanning {} (max_depth={}, include_hidden={}, follow_symlinks={})",
            root.display(),
            self.config.max_depth,
            self.config.include_hidden,
            self.config.follow_symlinks
        );

        let mut state = ScanState {
            result: ScanResult::new(root.clone()),
            unopened: None,
        };

        if let Some(progress) = &self.progress {
            progress.on_phase_start(phase::SCAN, 0);
        }

        self.walk(&root, &mut state, sink);

        if let Some(progress) = &self.progress {
            progress.on_phase_end(phase::SCAN);
        }

        let mut result = state.result;
        result.finish();
        log::info!(
            "Scan of {} finished: {} files, {} directories, {} bytes, {} errors{}",
            result.path.display(),
            result.total_files,
            result.total_directories,
            result.total_size,
            result.errors.len(),
            if result.interrupted { " (interrupted)" } else { "" }
        );
        Ok(result)
    }

    /// Drive the traversal, batching each directory's files for the pool.
    fn walk<S>(&self, root: &Path, state: &mut ScanState, sink: &mut S)
    where
        S: FileSink + ?Sized,
    {
        let include_hidden = self.config.include_hidden;
        let follow_symlinks = self.config.follow_symlinks;
        // Entries of the deepest processed directory sit one level below it
        let walk_depth = self.config.max_depth.saturating_add(1);

        let walker = WalkDir::new(root)
            .follow_links(follow_symlinks)
            .max_depth(walk_depth)
            .sort_by(files_first)
            .into_iter()
            .filter_entry(move |entry| {
                entry.depth() == 0 || is_visible(entry, include_hidden, follow_symlinks)
            });

        let mut batch: Vec<PendingFile> = Vec::new();
        for item in walker {
            if self.is_shutdown_requested() {
                state.result.interrupted = true;
                return;
            }

            let entry = match item {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().map_or_else(|| root.to_path_buf(), Path::to_path_buf);
                    state.settle_directory(Some(&path));
                    if !include_hidden && path != root && path.file_name().is_some_and(is_hidden) {
                        log::trace!("Skipping error for hidden entry: {}", path.display());
                        continue;
                    }
                    state.result.errors.push(self.walk_error(&path, &e));
                    continue;
                }
            };
            state.settle_directory(None);

            if entry.depth() == 0 {
                continue;
            }

            if entry.file_type().is_dir() {
                self.process_files(std::mem::take(&mut batch), state, sink);
                if entry.depth() < walk_depth {
                    state.unopened = Some(entry.into_path());
                } else {
                    log::trace!(
                        "Not descending into {} (depth {} > {})",
                        entry.path().display(),
                        entry.depth(),
                        self.config.max_depth
                    );
                    state.result.total_directories += 1;
                }
                continue;
            }

            let metadata = match entry.metadata() {
                Ok(m) => m,
                Err(e) => {
                    state.result.errors.push(self.walk_error(entry.path(), &e));
                    continue;
                }
            };

            let same_parent = batch
                .last()
                .is_some_and(|pending| pending.path.parent() == entry.path().parent());
            if !same_parent {
                self.process_files(std::mem::take(&mut batch), state, sink);
            }
            batch.push(PendingFile {
                is_symlink: entry.path_is_symlink(),
                path: entry.into_path(),
                metadata,
            });
        }

        state.settle_directory(None);
        self.process_files(batch, state, sink);
    }

    /// Hash one directory's files on the pool, then emit them in order.
    fn process_files<S>(&self, files: Vec<PendingFile>, state: &mut ScanState, sink: &mut S)
    where
        S: FileSink + ?Sized,
    {
        if files.is_empty() {
            return;
        }

        let ceiling = self.config.hash_size_ceiling;
        let built: Vec<Result<FileRecord, HashError>> = self.pool.install(|| {
            files
                .into_par_iter()
                .map(|pending| build_record(pending, ceiling))
                .collect()
        });

        for outcome in built {
            match outcome {
                Ok(record) => self.emit(record, state, sink),
                Err(e) => {
                    log::warn!("{}", e);
                    state.result.errors.push(e.to_failure());
                }
            }
        }
    }

    /// Append a finished record and pass it to the sink.
    fn emit<S>(&self, record: FileRecord, state: &mut ScanState, sink: &mut S)
    where
        S: FileSink + ?Sized,
    {
        state.result.push_file(record);
        let Some(record) = state.result.files.last() else {
            return;
        };

        let path = record.path.clone();
        if let Err(e) = sink.accept(record) {
            log::warn!("Record sink failed for {}: {}", path.display(), e);
            state
                .result
                .errors
                .push(FailureEntry::new(&path, ErrorKind::SinkFailure, e.to_string()));
        }

        let batch = self.config.batch_size.max(1);
        if state.result.total_files % batch == 0 {
            if let Some(progress) = &self.progress {
                progress.on_progress(state.result.total_files, &path.to_string_lossy());
            }
        }
    }

    /// Turn a traversal error into a recorded failure.
    fn walk_error(&self, path: &Path, error: &walkdir::Error) -> FailureEntry {
        if error.loop_ancestor().is_some() {
            log::warn!("Symlink cycle detected at {}", path.display());
            return FailureEntry::new(path, ErrorKind::IoFailure, "Symlink cycle detected");
        }
        match error.io_error() {
            Some(io_error) => self.handle_io_error(path, io_error),
            None => {
                log::warn!("Traversal error at {}: {}", path.display(), error);
                FailureEntry::new(path, ErrorKind::IoFailure, error.to_string())
            }
        }
    }

    /// Handle I/O errors during entry access.
    fn handle_io_error(&self, path: &Path, error: &std::io::Error) -> FailureEntry {
        match error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                log::warn!("Permission denied: {}", path.display());
            }
            std::io::ErrorKind::NotFound => {
                log::debug!("Entry vanished or dangling link: {}", path.display());
            }
            _ => {
                log::warn!("I/O error for {}: {}", path.display(), error);
            }
        }
        FailureEntry::from_io(path, error)
    }
}

pub(crate) fn is_hidden(name: &OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

/// Visibility policy applied to every entry before it is looked at.
fn is_visible(entry: &DirEntry, include_hidden: bool, follow_symlinks: bool) -> bool {
    if !include_hidden && is_hidden(entry.file_name()) {
        log::trace!("Skipping hidden entry: {}", entry.path().display());
        return false;
    }
    if entry.path_is_symlink() && !follow_symlinks {
        log::trace!("Skipping symlink: {}", entry.path().display());
        return false;
    }
    true
}

/// Sibling order: files before directories, each by name.
///
/// Keeps a directory's files contiguous so they form one hashing batch.
fn files_first(a: &DirEntry, b: &DirEntry) -> CmpOrdering {
    (leads_to_dir(a), a.file_name()).cmp(&(leads_to_dir(b), b.file_name()))
}

fn leads_to_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir() || (entry.path_is_symlink() && entry.path().is_dir())
}

/// Build a fully populated record; runs on a pool worker.
fn build_record(pending: PendingFile, ceiling: u64) -> Result<FileRecord, HashError> {
    let PendingFile {
        path,
        metadata,
        is_symlink,
    } = pending;

    let size = metadata.len();
    // Only regular files are read; opening a FIFO would block.
    let hash = if metadata.is_file() && size <= ceiling {
        hash_file(&path, ceiling)?
    } else {
        None
    };

    let mut record = FileRecord::from_path(path, size);
    record.is_symlink = is_symlink;
    record.hash = hash;
    record.created_at = metadata.created().ok().map(DateTime::<Utc>::from);
    record.modified_at = metadata.modified().ok().map(DateTime::<Utc>::from);
    record.accessed_at = metadata.accessed().ok().map(DateTime::<Utc>::from);
    record.metadata = os_attributes(&metadata);
    Ok(record)
}

#[cfg(unix)]
fn os_attributes(metadata: &Metadata) -> BTreeMap<String, u64> {
    use std::os::unix::fs::MetadataExt;
    BTreeMap::from([
        ("mode".to_string(), u64::from(metadata.mode())),
        ("inode".to_string(), metadata.ino()),
        ("device".to_string(), metadata.dev()),
        ("nlink".to_string(), metadata.nlink()),
        ("uid".to_string(), u64::from(metadata.uid())),
        ("gid".to_string(), u64::from(metadata.gid())),
    ])
}

#[cfg(not(unix))]
fn os_attributes(metadata: &Metadata) -> BTreeMap<String, u64> {
    BTreeMap::from([(
        "readonly".to_string(),
        u64::from(metadata.permissions().readonly()),
    )])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::sink::{NullSink, SinkError};
    use crate::scanner::Category;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::TempDir;

    /// Create a test directory with some files.
    ///
    /// ```text
    /// file1.txt
    /// file2.txt
    /// subdir/nested.txt
    /// ```
    fn create_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();

        let mut f = File::create(dir.path().join("file1.txt")).unwrap();
        writeln!(f, "Hello, world!").unwrap();

        let mut f = File::create(dir.path().join("file2.txt")).unwrap();
        writeln!(f, "Another file").unwrap();

        let subdir = dir.path().join("subdir");
        fs::create_dir(&subdir).unwrap();
        let mut f = File::create(subdir.join("nested.txt")).unwrap();
        writeln!(f, "Nested file content").unwrap();

        dir
    }

    fn scanner(config: ScanConfig) -> Scanner {
        Scanner::new(config).unwrap()
    }

    #[test]
    fn test_scanner_finds_files() {
        let dir = create_test_dir();
        let result = scanner(ScanConfig::default())
            .scan(dir.path(), &mut NullSink)
            .unwrap();

        assert_eq!(result.total_files, 3);
        assert_eq!(result.total_directories, 1);
        assert_eq!(result.total_files, result.files.len());
        let sum: u64 = result.files.iter().map(|f| f.size).sum();
        assert_eq!(result.total_size, sum);
        assert!(result.errors.is_empty());
        assert!(result.completed_at.is_some());

        for file in &result.files {
            assert!(file.path.is_absolute());
            assert!(file.hash.is_some());
            assert_eq!(file.category, Category::Document);
            assert_eq!(file.extension.as_deref(), Some(".txt"));
            assert!(file.modified_at.is_some());
        }
    }

    #[test]
    fn test_scanner_sink_sees_every_record_once() {
        let dir = create_test_dir();
        let mut seen = Vec::new();
        let mut sink = |r: &FileRecord| -> Result<(), SinkError> {
            assert!(r.hash.is_some(), "record must be complete before the sink");
            seen.push(r.path.clone());
            Ok(())
        };

        let result = scanner(ScanConfig::default())
            .scan(dir.path(), &mut sink)
            .unwrap();

        assert_eq!(seen.len(), result.files.len());
        let recorded: Vec<_> = result.files.iter().map(|f| f.path.clone()).collect();
        assert_eq!(seen, recorded);
    }

    #[test]
    fn test_scanner_sink_failure_is_recorded() {
        let dir = create_test_dir();
        let mut sink = |r: &FileRecord| -> Result<(), SinkError> {
            if r.name == "file2.txt" {
                Err(SinkError::Rejected("database unavailable".to_string()))
            } else {
                Ok(())
            }
        };

        let result = scanner(ScanConfig::default())
            .scan(dir.path(), &mut sink)
            .unwrap();

        assert_eq!(result.total_files, 3);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].kind, ErrorKind::SinkFailure);
        assert!(result.errors[0]
            .path
            .as_ref()
            .unwrap()
            .ends_with("file2.txt"));
    }

    #[test]
    fn test_scanner_skips_hidden_by_default() {
        let dir = create_test_dir();
        fs::write(dir.path().join(".hidden"), b"secret").unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        fs::write(dir.path().join(".git").join("HEAD"), b"ref").unwrap();

        let result = scanner(ScanConfig::default())
            .scan(dir.path(), &mut NullSink)
            .unwrap();
        assert_eq!(result.total_files, 3);
        assert_eq!(result.total_directories, 1);

        let result = scanner(ScanConfig::default().with_include_hidden(true))
            .scan(dir.path(), &mut NullSink)
            .unwrap();
        assert_eq!(result.total_files, 5);
        assert_eq!(result.total_directories, 2);
    }

    #[test]
    fn test_scanner_depth_limit() {
        let dir = TempDir::new().unwrap();
        // root/a/b/c/deep.txt
        let deep = dir.path().join("a").join("b").join("c");
        fs::create_dir_all(&deep).unwrap();
        fs::write(dir.path().join("top.txt"), b"0").unwrap();
        fs::write(dir.path().join("a").join("one.txt"), b"1").unwrap();
        fs::write(dir.path().join("a").join("b").join("two.txt"), b"2").unwrap();
        fs::write(deep.join("deep.txt"), b"3").unwrap();

        // depth 0: only root entries; "a" is counted but not entered
        let result = scanner(ScanConfig::default().with_max_depth(0))
            .scan(dir.path(), &mut NullSink)
            .unwrap();
        assert_eq!(result.total_files, 1);
        assert_eq!(result.total_directories, 1);

        let result = scanner(ScanConfig::default().with_max_depth(1))
            .scan(dir.path(), &mut NullSink)
            .unwrap();
        assert_eq!(result.total_files, 2);
        assert_eq!(result.total_directories, 2);

        let result = scanner(ScanConfig::default())
            .scan(dir.path(), &mut NullSink)
            .unwrap();
        assert_eq!(result.total_files, 4);
        assert_eq!(result.total_directories, 3);
    }

    #[test]
    fn test_scanner_hash_ceiling() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("small.bin"), vec![1u8; 10]).unwrap();
        fs::write(dir.path().join("large.bin"), vec![1u8; 100]).unwrap();

        let result = scanner(ScanConfig::default().with_hash_size_ceiling(50))
            .scan(dir.path(), &mut NullSink)
            .unwrap();

        for file in &result.files {
            if file.size > 50 {
                assert!(file.hash.is_none(), "{} should not be hashed", file.name);
            } else {
                assert!(file.hash.is_some(), "{} should be hashed", file.name);
            }
        }
        assert_eq!(result.total_size, 110);
    }

    #[test]
    fn test_scanner_deterministic_digests() {
        let dir = create_test_dir();
        let s = scanner(ScanConfig::default());

        let first = s.scan(dir.path(), &mut NullSink).unwrap();
        let second = s.scan(dir.path(), &mut NullSink).unwrap();

        let a: Vec<_> = first.files.iter().map(|f| (f.path.clone(), f.hash)).collect();
        let b: Vec<_> = second.files.iter().map(|f| (f.path.clone(), f.hash)).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_scanner_rejects_missing_root() {
        let result = scanner(ScanConfig::default())
            .scan(Path::new("/nonexistent/path/12345"), &mut NullSink);
        assert!(matches!(result, Err(ScanError::NotFound(_))));
    }

    #[test]
    #[cfg(unix)]
    fn test_scanner_unreadable_root_is_not_missing() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let locked = dir.path().join("locked");
        fs::create_dir_all(locked.join("inner")).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Permission bits do not apply to root
        if fs::metadata(locked.join("inner")).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let result = scanner(ScanConfig::default()).scan(&locked.join("inner"), &mut NullSink);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        let err = result.unwrap_err();
        assert!(matches!(err, ScanError::Inaccessible { .. }));
        assert_eq!(err.kind(), ErrorKind::PermissionDenied);
    }

    #[test]
    fn test_scanner_rejects_file_root() {
        let dir = create_test_dir();
        let result = scanner(ScanConfig::default())
            .scan(&dir.path().join("file1.txt"), &mut NullSink);
        assert!(matches!(result, Err(ScanError::NotADirectory(_))));
    }

    #[test]
    fn test_scanner_empty_directory() {
        let dir = TempDir::new().unwrap();
        let result = scanner(ScanConfig::default())
            .scan(dir.path(), &mut NullSink)
            .unwrap();

        assert_eq!(result.total_files, 0);
        assert_eq!(result.total_directories, 0);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_scanner_shutdown_flag() {
        let dir = create_test_dir();
        let shutdown = Arc::new(AtomicBool::new(true));

        let result = scanner(ScanConfig::default())
            .with_shutdown_flag(Arc::clone(&shutdown))
            .scan(dir.path(), &mut NullSink)
            .unwrap();

        assert!(result.interrupted);
        assert_eq!(result.total_files, 0);
        assert_eq!(result.total_files, result.files.len());
    }

    #[test]
    #[cfg(unix)]
    fn test_scanner_symlink_policy() {
        use std::os::unix::fs::symlink;

        let dir = create_test_dir();
        symlink(dir.path().join("file1.txt"), dir.path().join("link.txt")).unwrap();

        let result = scanner(ScanConfig::default())
            .scan(dir.path(), &mut NullSink)
            .unwrap();
        assert_eq!(result.total_files, 3);
        assert!(result.files.iter().all(|f| !f.is_symlink));

        let result = scanner(ScanConfig::default().with_follow_symlinks(true))
            .scan(dir.path(), &mut NullSink)
            .unwrap();
        assert_eq!(result.total_files, 4);
        let link = result.files.iter().find(|f| f.name == "link.txt").unwrap();
        assert!(link.is_symlink);
        let target = result.files.iter().find(|f| f.name == "file1.txt").unwrap();
        assert_eq!(link.hash, target.hash);
    }

    #[test]
    #[cfg(unix)]
    fn test_scanner_symlink_cycle_is_reported() {
        use std::os::unix::fs::symlink;

        let dir = create_test_dir();
        symlink(dir.path(), dir.path().join("subdir").join("loop")).unwrap();

        let result = scanner(ScanConfig::default().with_follow_symlinks(true))
            .scan(dir.path(), &mut NullSink)
            .unwrap();

        assert_eq!(result.total_files, 3);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].message.contains("cycle"));
    }

    #[test]
    #[cfg(unix)]
    fn test_scanner_dangling_symlink_is_error() {
        use std::os::unix::fs::symlink;

        let dir = create_test_dir();
        symlink(dir.path().join("missing"), dir.path().join("dangling")).unwrap();

        let result = scanner(ScanConfig::default().with_follow_symlinks(true))
            .scan(dir.path(), &mut NullSink)
            .unwrap();

        assert_eq!(result.total_files, 3);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].kind, ErrorKind::NotFound);
    }

    #[test]
    #[cfg(unix)]
    fn test_scanner_os_attributes() {
        let dir = create_test_dir();
        let result = scanner(ScanConfig::default())
            .scan(dir.path(), &mut NullSink)
            .unwrap();

        let file = &result.files[0];
        for key in ["mode", "inode", "device", "nlink", "uid", "gid"] {
            assert!(file.metadata.contains_key(key), "missing {key}");
        }
    }
}
