//! Human-readable terminal output, coloured with `yansi`.
//!
//! Colouring is global; call [`yansi::disable`] (the CLI does this for
//! `--no-color`) to get plain text.

use std::fmt::Write as _;

use yansi::Paint;

use super::format_size;
use crate::actions::{ExecutionResult, OperationStatus, RollbackExecutionResult};
use crate::duplicates::{DuplicateGroup, DuplicateStats};
use crate::scanner::{Category, ScanResult, TreeNode};

/// Render a scan: per-category totals followed by recorded errors.
#[must_use]
pub fn render_scan(result: &ScanResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "Scan summary".bold());
    let _ = writeln!(out, "  Root:        {}", result.path.display());
    let _ = writeln!(out, "  Files:       {}", result.total_files);
    let _ = writeln!(out, "  Directories: {}", result.total_directories);
    let _ = writeln!(out, "  Total size:  {}", format_size(result.total_size));
    let _ = writeln!(out, "  Duration:    {:.2?}", result.duration());

    let mut by_category: Vec<(Category, usize, u64)> = Category::ALL
        .into_iter()
        .map(|category| {
            let (count, bytes) = result
                .files
                .iter()
                .filter(|f| f.category == category)
                .fold((0, 0), |(c, b), f| (c + 1, b + f.size));
            (category, count, bytes)
        })
        .filter(|(_, count, _)| *count > 0)
        .collect();
    by_category.sort_by(|a, b| b.2.cmp(&a.2));

    if !by_category.is_empty() {
        let _ = writeln!(out, "\n{}", "By category".bold());
        for (category, count, bytes) in by_category {
            let _ = writeln!(
                out,
                "  {:<15} {:>7} file(s)  {:>10}",
                category.cyan(),
                count,
                format_size(bytes)
            );
        }
    }

    if result.interrupted {
        let _ = writeln!(out, "\n{}", "Scan interrupted; results are partial".yellow());
    }
    render_errors(&mut out, result.errors.iter().map(ToString::to_string));
    out
}

/// Render duplicate groups in first-seen order.
#[must_use]
pub fn render_duplicates(groups: &[DuplicateGroup], stats: &DuplicateStats) -> String {
    let mut out = String::new();
    if groups.is_empty() {
        let _ = writeln!(out, "{}", "No duplicates found".green());
        return out;
    }

    for (idx, group) in groups.iter().enumerate() {
        let _ = writeln!(
            out,
            "{} {} ({} x {})",
            format!("Group {}", idx + 1).bold(),
            group.hash.to_hex().dim(),
            group.len(),
            format_size(group.size)
        );
        for (i, file) in group.files.iter().enumerate() {
            let marker = if i == 0 { "keep" } else { "dupe" };
            let _ = writeln!(out, "  [{}] {}", marker, file.path.display());
        }
    }

    let _ = writeln!(
        out,
        "\n{} group(s), {} duplicate file(s), {} reclaimable",
        stats.duplicate_groups,
        stats.duplicate_files,
        format_size(stats.wasted_space).yellow()
    );
    out
}

/// Render a directory tree with box-drawing guides.
#[must_use]
pub fn render_tree(root: &TreeNode) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", root.path.display().bold());
    render_children(&mut out, root, "");
    out
}

fn render_children(out: &mut String, node: &TreeNode, prefix: &str) {
    if let Some(error) = &node.error {
        let _ = writeln!(out, "{prefix}└── {}", format!("<{error}>").red());
        return;
    }
    let last = node.children.len().saturating_sub(1);
    for (i, child) in node.children.iter().enumerate() {
        let (branch, indent) = if i == last {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };
        if child.is_directory {
            let _ = writeln!(out, "{prefix}{branch}{}/", child.name.blue().bold());
            render_children(out, child, &format!("{prefix}{indent}"));
        } else {
            let _ = writeln!(out, "{prefix}{branch}{}", child.name);
        }
    }
}

/// Render an execution result, one line per operation.
#[must_use]
pub fn render_execution(result: &ExecutionResult) -> String {
    let mut out = String::new();
    if result.dry_run {
        let _ = writeln!(out, "{}", "Dry run: nothing was changed".yellow().bold());
    }

    for op in &result.operations {
        let status = match op.status {
            OperationStatus::Planned => op.status.as_str().cyan().to_string(),
            OperationStatus::Completed => op.status.as_str().green().to_string(),
            OperationStatus::Failed => op.status.as_str().red().to_string(),
            OperationStatus::NotImplemented => op.status.as_str().yellow().to_string(),
        };
        let sources = op
            .sources
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let _ = write!(out, "  [{status}] {} {sources}", op.action);
        if let Some(dest) = &op.destination {
            let _ = write!(out, " -> {}", dest.display());
        }
        if let Some(archive) = &op.archive_name {
            let _ = write!(out, " -> {archive}");
        }
        if !op.tags.is_empty() {
            let _ = write!(out, " [{}]", op.tags.join(", "));
        }
        if let Some(reason) = &op.reason {
            let _ = write!(out, ": {}", reason.red());
        }
        out.push('\n');
    }

    render_errors(
        &mut out,
        result
            .errors
            .iter()
            .filter(|e| e.path.is_none())
            .map(ToString::to_string),
    );
    let _ = writeln!(out, "\n{}", result.summary().bold());
    out
}

/// Render a rollback result.
#[must_use]
pub fn render_rollback(result: &RollbackExecutionResult) -> String {
    let mut out = String::new();
    for op in &result.operations {
        let status = if op.status == OperationStatus::Completed {
            "restored".green().to_string()
        } else {
            "failed".red().to_string()
        };
        let _ = write!(out, "  [{status}] {} {}", op.action, op.to.display());
        if let Some(reason) = &op.reason {
            let _ = write!(out, ": {reason}");
        }
        out.push('\n');
    }
    let _ = writeln!(out, "\n{}", result.summary().bold());
    out
}

fn render_errors(out: &mut String, errors: impl Iterator<Item = String>) {
    let errors: Vec<String> = errors.collect();
    if errors.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n{} ({})", "Errors".red().bold(), errors.len());
    for error in errors {
        let _ = writeln!(out, "  {error}");
    }
}
