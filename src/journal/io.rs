//! I/O operations for execution journals.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::data::{Journal, JournalError, JOURNAL_VERSION};

/// Envelope for journal files to include integrity checks.
#[derive(Debug, Serialize, Deserialize)]
struct JournalEnvelope {
    /// SHA256 checksum of the compact serialized journal.
    checksum: String,
    /// The journal itself.
    journal: Journal,
}

/// Sibling file a journal is staged in before it replaces `path`.
fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn checksum_of(journal: &Journal) -> Result<String, JournalError> {
    // Always hashed over the compact form, whatever the file layout
    let compact = serde_json::to_string(journal)?;
    let mut hasher = Sha256::new();
    hasher.update(compact.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

impl Journal {
    /// Serializes the journal to a JSON string with an integrity checksum.
    ///
    /// # Errors
    ///
    /// [`JournalError::Format`] if serialization fails.
    pub fn to_json(&self) -> Result<String, JournalError> {
        let envelope = JournalEnvelope {
            checksum: checksum_of(self)?,
            journal: self.clone(),
        };
        Ok(serde_json::to_string_pretty(&envelope)?)
    }

    /// Parses and verifies a journal from JSON.
    ///
    /// # Errors
    ///
    /// [`JournalError::Format`], [`JournalError::ChecksumMismatch`] or
    /// [`JournalError::UnsupportedVersion`].
    pub fn from_json(content: &str) -> Result<Self, JournalError> {
        let envelope: JournalEnvelope = serde_json::from_str(content)?;

        if checksum_of(&envelope.journal)? != envelope.checksum {
            return Err(JournalError::ChecksumMismatch);
        }

        let journal = envelope.journal;
        if journal.version != JOURNAL_VERSION {
            return Err(JournalError::UnsupportedVersion {
                found: journal.version,
                expected: JOURNAL_VERSION,
            });
        }
        Ok(journal)
    }

    /// Saves the journal to a file with an integrity checksum.
    ///
    /// The journal is written to a sibling `.tmp` file and renamed into
    /// place, so an existing journal is never left half-written.
    ///
    /// # Errors
    ///
    /// [`JournalError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), JournalError> {
        let json = self.to_json()?;
        let io_err = |source| JournalError::Io {
            path: path.to_path_buf(),
            source,
        };

        let staging = staging_path(path);
        let written = File::create(&staging).and_then(|mut file| {
            file.write_all(json.as_bytes())?;
            file.sync_all()
        });
        if let Err(e) = written.and_then(|()| fs::rename(&staging, path)) {
            if let Err(cleanup) = fs::remove_file(&staging) {
                log::debug!("Cannot remove {}: {}", staging.display(), cleanup);
            }
            return Err(io_err(e));
        }

        log::debug!("Journal written to {}", path.display());
        Ok(())
    }

    /// Checks that a journal can later be saved at `path`.
    ///
    /// Creates and removes the staging file; an existing journal at `path`
    /// is left alone.
    ///
    /// # Errors
    ///
    /// [`JournalError::Io`] if `path` is a directory or its directory does
    /// not accept new files.
    pub fn ensure_writable(path: &Path) -> Result<(), JournalError> {
        let io_err = |source| JournalError::Io {
            path: path.to_path_buf(),
            source,
        };
        if path.is_dir() {
            return Err(io_err(io::Error::new(
                io::ErrorKind::IsADirectory,
                "journal path is a directory",
            )));
        }

        let staging = staging_path(path);
        File::create(&staging).map_err(io_err)?;
        if let Err(e) = fs::remove_file(&staging) {
            log::debug!("Cannot remove {}: {}", staging.display(), e);
        }
        Ok(())
    }

    /// Loads a journal from a file and verifies its integrity.
    ///
    /// # Errors
    ///
    /// [`JournalError::Io`] if the file cannot be read, otherwise as
    /// [`Journal::from_json`].
    pub fn load(path: &Path) -> Result<Self, JournalError> {
        let content = std::fs::read_to_string(path).map_err(|source| JournalError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let journal = Self::from_json(&content)?;

        for record in journal.rollback_records() {
            if let Some(new_path) = &record.new_path {
                if !new_path.exists() {
                    log::warn!(
                        "File referenced in journal no longer exists: {}",
                        new_path.display()
                    );
                }
            }
        }

        Ok(journal)
    }
}
