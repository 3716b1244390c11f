//! CSV output formatter.
//!
//! # File columns
//!
//! `path, name, extension, size, category, mime_type, hash, modified`
//!
//! # Duplicate columns
//!
//! `group_id, hash, path, size`

use std::io;

use serde::Serialize;
use thiserror::Error;

use crate::duplicates::DuplicateGroup;
use crate::scanner::FileRecord;

/// Errors that can occur during CSV output generation.
#[derive(Debug, Error)]
pub enum CsvOutputError {
    /// I/O error during writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error during CSV serialization.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// A single file row.
#[derive(Debug, Serialize)]
struct FileRow<'a> {
    path: String,
    name: &'a str,
    extension: &'a str,
    size: u64,
    category: &'static str,
    mime_type: &'a str,
    hash: String,
    /// RFC 3339, empty when unknown
    modified: String,
}

/// CSV output of scanned files.
pub struct CsvOutput<'a> {
    files: &'a [FileRecord],
}

impl<'a> CsvOutput<'a> {
    /// Create a new CSV output formatter.
    #[must_use]
    pub fn new(files: &'a [FileRecord]) -> Self {
        Self { files }
    }

    /// Write the CSV output to the given writer.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if writing or serialization fails.
    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<(), CsvOutputError> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        for file in self.files {
            csv_writer.serialize(FileRow {
                path: file.path.to_string_lossy().into_owned(),
                name: &file.name,
                extension: file.extension.as_deref().unwrap_or(""),
                size: file.size,
                category: file.category.as_str(),
                mime_type: file.mime_type.as_deref().unwrap_or(""),
                hash: file.hash.map(|h| h.to_hex()).unwrap_or_default(),
                modified: file.modified_at.map(|m| m.to_rfc3339()).unwrap_or_default(),
            })?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Generate CSV output as a string.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if serialization fails.
    pub fn to_string(&self) -> Result<String, CsvOutputError> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).to_string())
    }
}

/// A single duplicate row.
#[derive(Debug, Serialize)]
struct DuplicateRow {
    group_id: usize,
    hash: String,
    path: String,
    size: u64,
}

/// CSV output of duplicate groups, one row per member.
pub struct DuplicateCsvOutput<'a> {
    groups: &'a [DuplicateGroup],
}

impl<'a> DuplicateCsvOutput<'a> {
    /// Create a new CSV output formatter.
    #[must_use]
    pub fn new(groups: &'a [DuplicateGroup]) -> Self {
        Self { groups }
    }

    /// Write the CSV output to the given writer.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if writing or serialization fails.
    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<(), CsvOutputError> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        for (idx, group) in self.groups.iter().enumerate() {
            let hash = group.hash.to_hex();
            for file in &group.files {
                csv_writer.serialize(DuplicateRow {
                    group_id: idx + 1,
                    hash: hash.clone(),
                    path: file.path.to_string_lossy().into_owned(),
                    size: file.size,
                })?;
            }
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Generate CSV output as a string.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if serialization fails.
    pub fn to_string(&self) -> Result<String, CsvOutputError> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).to_string())
    }
}
