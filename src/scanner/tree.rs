//! Lightweight nested directory listing.
//!
//! Unlike [`super::Scanner`], building a tree reads no file content and
//! collects no metadata beyond names and kinds.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use super::walker::is_hidden;
use super::ScanError;

/// One node of a directory tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    /// Final path component (the full path for a root without one)
    pub name: String,
    /// Path of the entry
    pub path: PathBuf,
    /// Whether the entry is a directory
    pub is_directory: bool,
    /// Child entries, sorted by name; empty for files
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
    /// Why the directory could not be listed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TreeNode {
    fn leaf(path: PathBuf, is_directory: bool) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            name,
            path,
            is_directory,
            children: Vec::new(),
            error: None,
        }
    }

    /// Total number of nodes below this one.
    #[must_use]
    pub fn descendant_count(&self) -> usize {
        self.children
            .iter()
            .map(|c| 1 + c.descendant_count())
            .sum()
    }
}

/// Build a tree of `root` down to `max_depth` levels.
///
/// With `max_depth == 0` only the root node is returned. A directory that
/// cannot be listed gets its [`TreeNode::error`] set; building continues
/// with its siblings. Symbolic links are listed but not followed.
///
/// # Errors
///
/// Returns [`ScanError::NotFound`] if `root` does not exist.
pub fn directory_tree(
    root: &Path,
    max_depth: usize,
    include_hidden: bool,
) -> Result<TreeNode, ScanError> {
    fs::symlink_metadata(root).map_err(|e| ScanError::from_root_io(root, e))?;

    let walker = WalkDir::new(root)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(move |entry| {
            entry.depth() == 0 || include_hidden || !is_hidden(entry.file_name())
        });

    // Open nodes from the root down to the parent of the next entry
    let mut open: Vec<TreeNode> = Vec::new();
    for item in walker {
        match item {
            Ok(entry) => {
                close_until(&mut open, entry.depth());
                let is_directory = entry.file_type().is_dir();
                open.push(TreeNode::leaf(entry.into_path(), is_directory));
            }
            Err(e) => {
                let message = match e.io_error().map(std::io::Error::kind) {
                    Some(std::io::ErrorKind::PermissionDenied) => "Permission denied".to_string(),
                    _ => e.to_string(),
                };
                let node = e
                    .path()
                    .and_then(|path| open.iter_mut().rev().find(|node| node.path == path));
                match node {
                    Some(node) => {
                        log::warn!("Cannot list {}: {}", node.path.display(), message);
                        node.error = Some(message);
                    }
                    None => log::warn!("Skipping unreadable entry under {}: {}", root.display(), e),
                }
            }
        }
    }

    close_until(&mut open, 1);
    open.pop()
        .ok_or_else(|| ScanError::NotFound(root.to_path_buf()))
}

/// Fold open nodes into their parents until `depth` nodes remain.
fn close_until(open: &mut Vec<TreeNode>, depth: usize) {
    while open.len() > depth.max(1) {
        if let Some(node) = open.pop() {
            if let Some(parent) = open.last_mut() {
                parent.children.push(node);
            }
        }
    }
}
