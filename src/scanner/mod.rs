//! Scanner module for directory traversal and per-file metadata extraction.
//!
//! This module provides functionality for:
//! - Depth-limited recursive directory walking with hidden/symlink policy
//! - Content hashing with XXH64, bounded by a size ceiling
//! - MIME guessing and semantic categorization
//! - A lightweight directory tree view
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: The [`Scanner`] and its bounded hashing pool
//! - [`hasher`]: Streaming XXH64 file digests
//! - [`categorizer`]: Extension/MIME/name classification
//! - [`sink`]: Destinations for discovered records
//! - [`tree`]: Nested directory listing without hashing
//!
//! # Example
//!
//! ```no_run
//! use data_organizer::scanner::{FileRecord, ScanConfig, Scanner, SinkError};
//! use std::path::Path;
//!
//! let scanner = Scanner::new(ScanConfig {
//!     max_depth: 3,
//!     ..Default::default()
//! })
//! .expect("worker pool");
//!
//! let mut print = |record: &FileRecord| -> Result<(), SinkError> {
//!     println!("{} ({})", record.path.display(), record.category);
//!     Ok(())
//! };
//! let result = scanner.scan(Path::new("."), &mut print).expect("scan");
//! println!("{} files, {} bytes", result.total_files, result.total_size);
//! ```

pub mod categorizer;
pub mod hasher;
pub mod sink;
pub mod tree;
pub mod walker;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::FailureEntry;

// Re-export main types
pub use categorizer::{categorize, guess_mime, Category};
pub use hasher::{hash_file, Digest, HASH_CHUNK_SIZE};
pub use sink::{ChannelSink, FileSink, NullSink, SinkError};
pub use tree::{directory_tree, TreeNode};
pub use walker::Scanner;

/// Default traversal depth ceiling.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Default size above which digests are omitted (100 MiB).
pub const DEFAULT_HASH_SIZE_CEILING: u64 = 100 * 1024 * 1024;

/// Default number of hashing worker threads.
pub const DEFAULT_WORKER_THREADS: usize = 4;

/// Default number of files between progress reports.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Metadata for one discovered filesystem entry.
///
/// Records are built once by the [`Scanner`] and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Absolute path to the entry
    pub path: PathBuf,
    /// Final path component
    pub name: String,
    /// Lower-cased extension including the leading dot (e.g. `.py`)
    pub extension: Option<String>,
    /// Size in bytes
    pub size: u64,
    /// Whether the entry is a directory
    pub is_directory: bool,
    /// Whether the entry itself is a symbolic link
    pub is_symlink: bool,
    /// Creation time, when the platform reports one
    pub created_at: Option<DateTime<Utc>>,
    /// Last modification time
    pub modified_at: Option<DateTime<Utc>>,
    /// Last access time
    pub accessed_at: Option<DateTime<Utc>>,
    /// Content digest, absent for directories and files above the ceiling
    pub hash: Option<Digest>,
    /// Guessed MIME type
    pub mime_type: Option<String>,
    /// Semantic category
    pub category: Category,
    /// OS-level attributes (mode, inode, device, nlink, uid, gid)
    pub metadata: BTreeMap<String, u64>,
}

impl FileRecord {
    /// Create a record with only the path-derived fields filled in.
    ///
    /// Size, timestamps, digest and OS attributes are left empty; the scanner
    /// fills them from the entry's metadata.
    #[must_use]
    pub fn from_path(path: PathBuf, size: u64) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = extension_of(&path);
        let mime_type = guess_mime(&name).map(str::to_string);
        let category = categorize(extension.as_deref(), mime_type.as_deref(), &name);

        Self {
            path,
            name,
            extension,
            size,
            is_directory: false,
            is_symlink: false,
            created_at: None,
            modified_at: None,
            accessed_at: None,
            hash: None,
            mime_type,
            category,
            metadata: BTreeMap::new(),
        }
    }
}

/// Lower-cased extension of a path with the leading dot kept.
///
/// Dot-files such as `.bashrc` have no extension.
#[must_use]
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
}

/// Configuration for directory scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Deepest directory level whose entries are processed (root = 0).
    pub max_depth: usize,
    /// Include names starting with `.`.
    pub include_hidden: bool,
    /// Follow symbolic links instead of skipping them.
    pub follow_symlinks: bool,
    /// Files larger than this are not hashed.
    pub hash_size_ceiling: u64,
    /// Number of hashing worker threads.
    pub worker_threads: usize,
    /// Files between progress reports.
    pub batch_size: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            include_hidden: false,
            follow_symlinks: false,
            hash_size_ceiling: DEFAULT_HASH_SIZE_CEILING,
            worker_threads: DEFAULT_WORKER_THREADS,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl ScanConfig {
    /// Set the depth ceiling.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Include or skip hidden entries.
    #[must_use]
    pub fn with_include_hidden(mut self, include_hidden: bool) -> Self {
        self.include_hidden = include_hidden;
        self
    }

    /// Follow or skip symbolic links.
    #[must_use]
    pub fn with_follow_symlinks(mut self, follow_symlinks: bool) -> Self {
        self.follow_symlinks = follow_symlinks;
        self
    }

    /// Set the hash size ceiling.
    #[must_use]
    pub fn with_hash_size_ceiling(mut self, ceiling: u64) -> Self {
        self.hash_size_ceiling = ceiling;
        self
    }

    /// Set the number of hashing workers.
    #[must_use]
    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = threads;
        self
    }

    /// Set the progress reporting interval.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }
}

/// Aggregate output of one traversal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    /// Root that was scanned
    pub path: PathBuf,
    /// Number of file records
    pub total_files: usize,
    /// Number of directories encountered
    pub total_directories: usize,
    /// Sum of file sizes in bytes
    pub total_size: u64,
    /// Discovered files, in emission order
    pub files: Vec<FileRecord>,
    /// Recovered per-entry failures
    pub errors: Vec<FailureEntry>,
    /// When the scan began
    pub started_at: DateTime<Utc>,
    /// When the scan finished or was aborted
    pub completed_at: Option<DateTime<Utc>>,
    /// Whether the scan stopped early on a shutdown request
    pub interrupted: bool,
}

impl ScanResult {
    /// Start an empty result for `root`.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self {
            path: root,
            total_files: 0,
            total_directories: 0,
            total_size: 0,
            files: Vec::new(),
            errors: Vec::new(),
            started_at: Utc::now(),
            completed_at: None,
            interrupted: false,
        }
    }

    /// Append a file record, keeping the counters consistent with it.
    pub fn push_file(&mut self, record: FileRecord) {
        self.total_files += 1;
        if !record.is_directory {
            self.total_size += record.size;
        }
        self.files.push(record);
    }

    /// Stamp the completion time.
    pub fn finish(&mut self) {
        self.completed_at = Some(Utc::now());
    }

    /// Elapsed time between start and completion.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.completed_at
            .and_then(|end| (end - self.started_at).to_std().ok())
            .unwrap_or_default()
    }

    /// Whether any entry failed.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Errors that abort a whole scan call.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// The specified path was not found.
    #[error("Path does not exist: {0}")]
    NotFound(PathBuf),

    /// The specified path is not a directory.
    #[error("Path is not a directory: {0}")]
    NotADirectory(PathBuf),

    /// The root exists but could not be inspected.
    #[error("Cannot access {path}: {source}")]
    Inaccessible {
        /// Root that was requested
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The hashing worker pool could not be started.
    #[error("Failed to start hashing pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

impl ScanError {
    /// Classify a failure to stat the scan root.
    #[must_use]
    pub fn from_root_io(path: &Path, error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            std::io::ErrorKind::NotADirectory => Self::NotADirectory(path.to_path_buf()),
            _ => Self::Inaccessible {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }

    /// Error kind for structured reporting.
    #[must_use]
    pub fn kind(&self) -> crate::error::ErrorKind {
        use crate::error::ErrorKind;
        match self {
            Self::NotFound(_) | Self::NotADirectory(_) => ErrorKind::InvalidInput,
            Self::Inaccessible { source, .. } => ErrorKind::from_io(source),
            Self::Pool(_) => ErrorKind::IoFailure,
        }
    }
}

/// Errors that can occur during file hashing.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl HashError {
    /// Wrap an I/O error for `path`.
    #[must_use]
    pub fn from_io(path: &Path, error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }

    /// Convert into a per-entry failure for the scan result.
    #[must_use]
    pub fn to_failure(&self) -> FailureEntry {
        use crate::error::ErrorKind;
        match self {
            Self::NotFound(p) => FailureEntry::new(p, ErrorKind::NotFound, "File not found"),
            Self::PermissionDenied(p) => {
                FailureEntry::new(p, ErrorKind::PermissionDenied, "Permission denied")
            }
            Self::Io { path, source } => {
                FailureEntry::new(path, ErrorKind::IoFailure, source.to_string())
            }
        }
    }
}
