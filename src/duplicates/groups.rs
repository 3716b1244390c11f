//! Duplicate groups and grouping statistics.
//!
//! # Example
//!
//! ```
//! use data_organizer::duplicates::DuplicateGroup;
//! use data_organizer::scanner::{Digest, FileRecord};
//! use std::path::PathBuf;
//!
//! let mut group = DuplicateGroup::new(Digest(7));
//! group.push(FileRecord::from_path(PathBuf::from("/a.txt"), 100));
//! group.push(FileRecord::from_path(PathBuf::from("/b.txt"), 100));
//!
//! assert_eq!(group.duplicate_count(), 1);
//! assert_eq!(group.wasted_space(), 100);
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::scanner::{Digest, FileRecord};

/// Files sharing one content digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// Shared XXH64 digest
    pub hash: Digest,
    /// Size of the first member in bytes
    pub size: u64,
    /// Members in the order they were first seen
    pub files: Vec<FileRecord>,
}

impl DuplicateGroup {
    /// Create an empty group for `hash`.
    #[must_use]
    pub fn new(hash: Digest) -> Self {
        Self {
            hash,
            size: 0,
            files: Vec::new(),
        }
    }

    /// Append a member.
    pub fn push(&mut self, record: FileRecord) {
        if self.files.is_empty() {
            self.size = record.size;
        }
        self.files.push(record);
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Total size of all files in this group.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }

    /// Total wasted space (all copies minus one).
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        match self.files.first() {
            Some(first) => self.total_size().saturating_sub(first.size),
            None => 0,
        }
    }

    /// Number of duplicate copies (total - 1 original).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.files.len().saturating_sub(1)
    }

    /// Get just the paths of files in this group.
    #[must_use]
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.iter().map(|f| f.path.clone()).collect()
    }
}

/// Statistics from one grouping pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DuplicateStats {
    /// Records examined
    pub total_files: usize,
    /// Records skipped because they carry no digest
    pub unhashed_files: usize,
    /// Distinct digests seen
    pub unique_hashes: usize,
    /// Groups with two or more members
    pub duplicate_groups: usize,
    /// Files that are copies of an earlier member
    pub duplicate_files: usize,
    /// Bytes reclaimable by keeping one copy per group
    pub wasted_space: u64,
}
