//! Output formatters for scan, duplicate and execution results.
//!
//! This module provides different output formats:
//! - JSON for automation and scripting
//! - CSV for spreadsheet import
//! - Coloured text for terminals
//!
//! # Example
//!
//! ```no_run
//! use data_organizer::output::json::write_json;
//! use data_organizer::scanner::{NullSink, ScanConfig, Scanner};
//! use std::path::Path;
//!
//! let scanner = Scanner::new(ScanConfig::default()).unwrap();
//! let result = scanner.scan(Path::new("."), &mut NullSink).unwrap();
//! write_json(&mut std::io::stdout(), &result, true).unwrap();
//! ```

pub mod csv;
pub mod json;
pub mod text;

use bytesize::ByteSize;

// Re-export main types
pub use self::csv::{CsvOutput, CsvOutputError, DuplicateCsvOutput};
pub use self::json::{write_json, DuplicatesReport, JsonOutputError};

/// Format a byte count for humans, using binary (1024-based) units.
///
/// ```
/// use data_organizer::output::format_size;
///
/// assert_eq!(format_size(0), "0 B");
/// assert_eq!(format_size(512), "512 B");
/// ```
#[must_use]
pub fn format_size(bytes: u64) -> String {
    ByteSize::b(bytes).to_string()
}
