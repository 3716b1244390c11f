//! JSON output formatter.
//!
//! Scan, execution and rollback results serialize directly. Duplicate
//! groups are flattened into a [`DuplicatesReport`]:
//!
//! ```json
//! {
//!   "duplicates": [
//!     { "hash": "ef46db3751d8e999", "size": 1024, "files": ["/a.txt", "/b.txt"] }
//!   ],
//!   "summary": {
//!     "total_files": 100,
//!     "unhashed_files": 2,
//!     "unique_hashes": 90,
//!     "duplicate_groups": 5,
//!     "duplicate_files": 8,
//!     "wasted_space": 51200
//!   }
//! }
//! ```

use std::io::Write;

use serde::Serialize;

use crate::duplicates::{DuplicateGroup, DuplicateStats};

/// A single duplicate group in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDuplicateGroup {
    /// XXH64 digest as 16 hex characters
    pub hash: String,
    /// File size in bytes
    pub size: u64,
    /// Paths of all members
    pub files: Vec<String>,
}

impl JsonDuplicateGroup {
    /// Create a JSON duplicate group from a [`DuplicateGroup`].
    #[must_use]
    pub fn from_duplicate_group(group: &DuplicateGroup) -> Self {
        Self {
            hash: group.hash.to_hex(),
            size: group.size,
            files: group
                .files
                .iter()
                .map(|f| f.path.to_string_lossy().into_owned())
                .collect(),
        }
    }
}

/// Duplicate groups with their statistics.
#[derive(Debug, Clone, Serialize)]
pub struct DuplicatesReport {
    /// Groups in first-seen order
    pub duplicates: Vec<JsonDuplicateGroup>,
    /// Grouping statistics
    pub summary: DuplicateStats,
}

impl DuplicatesReport {
    /// Build a report.
    #[must_use]
    pub fn new(groups: &[DuplicateGroup], stats: &DuplicateStats) -> Self {
        Self {
            duplicates: groups
                .iter()
                .map(JsonDuplicateGroup::from_duplicate_group)
                .collect(),
            summary: stats.clone(),
        }
    }
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}

/// Write any serializable value as JSON followed by a newline.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json<W, T>(writer: &mut W, value: &T, pretty: bool) -> Result<(), JsonOutputError>
where
    W: Write + ?Sized,
    T: Serialize + ?Sized,
{
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    writer.write_all(json.as_bytes())?;
    writer.write_all(b"\n")?;
    Ok(())
}
