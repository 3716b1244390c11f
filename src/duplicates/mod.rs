//! Duplicate detection module.
//!
//! Duplicates are grouped by the XXH64 digests the scanner already computed;
//! no file is read again.

pub mod finder;
pub mod groups;

pub use finder::{find_duplicates, find_duplicates_with_stats};
pub use groups::{DuplicateGroup, DuplicateStats};
