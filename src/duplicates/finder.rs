//! Digest-based duplicate grouping.
//!
//! Only records that carry a digest take part. Files above the hash ceiling
//! and directories are never reported as duplicates.

use std::collections::HashMap;

use super::groups::{DuplicateGroup, DuplicateStats};
use crate::scanner::{Digest, FileRecord};

/// Group records by digest, keeping only groups of two or more.
///
/// Groups are ordered by the position of their first member in `records`;
/// members keep their input order.
///
/// # Example
///
/// ```
/// use data_organizer::duplicates::find_duplicates;
/// use data_organizer::scanner::{Digest, FileRecord};
/// use std::path::PathBuf;
///
/// let mut a = FileRecord::from_path(PathBuf::from("/a"), 3);
/// let mut b = FileRecord::from_path(PathBuf::from("/b"), 3);
/// let c = FileRecord::from_path(PathBuf::from("/c"), 3);
/// a.hash = Some(Digest(1));
/// b.hash = Some(Digest(1));
///
/// let groups = find_duplicates(&[a, b, c]);
/// assert_eq!(groups.len(), 1);
/// assert_eq!(groups[0].len(), 2);
/// ```
#[must_use]
pub fn find_duplicates(records: &[FileRecord]) -> Vec<DuplicateGroup> {
    find_duplicates_with_stats(records).0
}

/// Like [`find_duplicates`], also returning grouping statistics.
#[must_use]
pub fn find_duplicates_with_stats(records: &[FileRecord]) -> (Vec<DuplicateGroup>, DuplicateStats) {
    let mut stats = DuplicateStats {
        total_files: records.len(),
        ..DuplicateStats::default()
    };
    let mut index: HashMap<Digest, usize> = HashMap::new();
    let mut groups: Vec<DuplicateGroup> = Vec::new();

    for record in records {
        let Some(hash) = record.hash else {
            stats.unhashed_files += 1;
            continue;
        };
        let slot = *index.entry(hash).or_insert_with(|| {
            groups.push(DuplicateGroup::new(hash));
            groups.len() - 1
        });
        groups[slot].push(record.clone());
    }

    stats.unique_hashes = groups.len();
    groups.retain(|g| g.len() > 1);

    stats.duplicate_groups = groups.len();
    stats.duplicate_files = groups.iter().map(DuplicateGroup::duplicate_count).sum();
    stats.wasted_space = groups.iter().map(DuplicateGroup::wasted_space).sum();

    log::info!(
        "Duplicate grouping: {} files → {} groups, {} duplicates ({} unhashed)",
        stats.total_files,
        stats.duplicate_groups,
        stats.duplicate_files,
        stats.unhashed_files
    );

    (groups, stats)
}
