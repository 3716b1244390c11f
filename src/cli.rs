//! Command-line interface definitions for data-organizer.
//!
//! Global options (verbosity, colour, config file, error format) apply to
//! every subcommand.
//!
//! # Example
//!
//! ```bash
//! # Summarise a directory
//! data-organizer scan ~/Downloads
//!
//! # Machine-readable duplicate report
//! data-organizer duplicates ~/Downloads --output json
//!
//! # Preview, then apply a move and keep a journal for rollback
//! data-organizer execute --action move --dest ~/Archive old1.log old2.log
//! data-organizer execute --action move --dest ~/Archive --apply --journal run.json old1.log old2.log
//! data-organizer rollback run.json
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::ConfigOverrides;

/// Filesystem scanner and reversible bulk file operations.
///
/// Scans directory trees into categorized, hashed file records, finds
/// duplicates, and moves, deletes or tags files with dry-run previews and
/// journaled rollback.
#[derive(Debug, Parser)]
#[command(name = "data-organizer")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Configuration file (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "PATH", env = "DATA_ORGANIZER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Report fatal errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan a directory and summarise its files
    Scan(ScanArgs),
    /// Scan a directory and report files with identical content
    Duplicates(ScanArgs),
    /// Print a directory tree without hashing
    Tree(TreeArgs),
    /// Move, delete, compress or tag files (dry run unless --apply)
    Execute(ExecuteArgs),
    /// Undo an execution recorded in a journal
    Rollback(RollbackArgs),
}

/// Arguments shared by `scan` and `duplicates`.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Directory to scan
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Deepest directory level to descend into (root = 0)
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,

    /// Include files and directories starting with '.'
    #[arg(long)]
    pub include_hidden: bool,

    /// Follow symbolic links
    ///
    /// Directory cycles are detected and reported, not followed.
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Do not hash files larger than this (e.g., 10MB, 1GiB)
    ///
    /// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub hash_ceiling: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

impl ScanArgs {
    /// Configuration values set by these flags.
    #[must_use]
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            max_depth: self.max_depth,
            include_hidden: self.include_hidden.then_some(true),
            follow_symlinks: self.follow_symlinks.then_some(true),
            hash_size_ceiling: self.hash_ceiling,
            dry_run: None,
        }
    }
}

/// Arguments for the tree subcommand.
#[derive(Debug, Args)]
pub struct TreeArgs {
    /// Directory to list
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Deepest level to list
    #[arg(long, value_name = "N")]
    pub depth: Option<usize>,

    /// Include entries starting with '.'
    #[arg(long)]
    pub include_hidden: bool,

    /// Output format (csv is not supported for trees)
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Arguments for the execute subcommand.
#[derive(Debug, Args)]
pub struct ExecuteArgs {
    /// Action to run: move, delete, compress or tag
    #[arg(short, long, value_name = "KIND")]
    pub action: String,

    /// Destination directory for move
    #[arg(long = "dest", value_name = "DIR")]
    pub destination: Option<PathBuf>,

    /// Archive name for compress
    #[arg(long = "archive", value_name = "NAME")]
    pub archive_name: Option<String>,

    /// Tag to attach (can be specified multiple times)
    #[arg(long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,

    /// Apply the action instead of previewing it
    #[arg(long, conflicts_with = "dry_run")]
    pub apply: bool,

    /// Preview only, even if the configuration disables dry runs
    #[arg(long)]
    pub dry_run: bool,

    /// Save the execution (with rollback data) to this journal file
    #[arg(long, value_name = "FILE")]
    pub journal: Option<PathBuf>,

    /// Output format (csv is not supported for executions)
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Files to act on
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,
}

impl ExecuteArgs {
    /// Explicit dry-run choice, if either flag was given.
    #[must_use]
    pub fn dry_run_override(&self) -> Option<bool> {
        if self.apply {
            Some(false)
        } else if self.dry_run {
            Some(true)
        } else {
            None
        }
    }
}

/// Arguments for the rollback subcommand.
#[derive(Debug, Args)]
pub struct RollbackArgs {
    /// Journal written by `execute --journal`
    #[arg(value_name = "JOURNAL")]
    pub journal: PathBuf,

    /// Output format (csv is not supported for rollbacks)
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Coloured human-readable text
    Text,
    /// JSON for scripting
    Json,
    /// CSV for spreadsheets
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Parse a human-readable size string into bytes.
///
/// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB
/// Case-insensitive. Numbers without suffix are treated as bytes.
///
/// # Examples
///
/// ```
/// use data_organizer::cli::parse_size;
///
/// assert_eq!(parse_size("1024").unwrap(), 1024);
/// assert_eq!(parse_size("1KB").unwrap(), 1000);
/// assert_eq!(parse_size("1KiB").unwrap(), 1024);
/// assert_eq!(parse_size("100MiB").unwrap(), 104_857_600);
/// ```
/// # Errors
///
/// Returns an error if the string is empty, contains an invalid number,
/// a negative number, or an unknown size suffix.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Size cannot be empty".to_string());
    }
    if s.starts_with('-') {
        return Err("Size cannot be negative".to_string());
    }

    let (num_str, suffix) = match s.find(|c: char| !c.is_ascii_digit() && c != '.') {
        Some(idx) => (&s[..idx], s[idx..].trim().to_uppercase()),
        None => (s, String::new()),
    };

    let num: f64 = num_str
        .parse()
        .map_err(|_| format!("Invalid number: '{num_str}'"))?;

    let multiplier: u64 = match suffix.as_str() {
        "" | "B" => 1,
        "KB" | "K" => 1_000,
        "KIB" => 1_024,
        "MB" | "M" => 1_000_000,
        "MIB" => 1_048_576,
        "GB" | "G" => 1_000_000_000,
        "GIB" => 1_073_741_824,
        "TB" | "T" => 1_000_000_000_000,
        "TIB" => 1_099_511_627_776,
        _ => return Err(format!("Unknown size suffix: '{suffix}'")),
    };

    Ok((num * multiplier as f64) as u64)
}
