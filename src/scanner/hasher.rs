//! XXH64 file hasher with streaming support.
//!
//! # Overview
//!
//! Digests are content fingerprints for deduplication, not a security
//! guarantee. Files are streamed in [`HASH_CHUNK_SIZE`] chunks so memory use
//! stays flat regardless of file size, and files above the caller's ceiling
//! are not read at all.
//!
//! # Example
//!
//! ```no_run
//! use data_organizer::scanner::hasher::hash_file;
//! use std::path::Path;
//!
//! match hash_file(Path::new("notes.txt"), 100 * 1024 * 1024) {
//!     Ok(Some(digest)) => println!("{}", digest),
//!     Ok(None) => println!("too large to hash"),
//!     Err(e) => eprintln!("{}", e),
//! }
//! ```

use std::fmt;
use std::fs::File;
use std::hash::Hasher as _;
use std::io::{ErrorKind, Read};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use twox_hash::XxHash64;

use super::HashError;

/// Read buffer size used while streaming file content.
pub const HASH_CHUNK_SIZE: usize = 8192;

/// A 64-bit XXH64 content digest.
///
/// Rendered and serialized as 16 lower-case hex characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest(pub u64);

impl Digest {
    /// Digest an in-memory buffer the same way [`hash_file`] digests a file.
    #[must_use]
    pub fn of_bytes(data: &[u8]) -> Self {
        let mut hasher = XxHash64::with_seed(0);
        hasher.write(data);
        Self(hasher.finish())
    }

    /// Hex representation.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("{:016x}", self.0)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl FromStr for Digest {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        u64::from_str_radix(s, 16).map(Self)
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        hex.parse().map_err(serde::de::Error::custom)
    }
}

/// Compute the digest of a file, or `None` if it is larger than `byte_limit`.
///
/// # Errors
///
/// Returns a [`HashError`] if the file cannot be opened or read. The scanner
/// folds this into its per-entry error list.
pub fn hash_file(path: &Path, byte_limit: u64) -> Result<Option<Digest>, HashError> {
    let mut file = File::open(path).map_err(|e| HashError::from_io(path, e))?;

    let size = file
        .metadata()
        .map_err(|e| HashError::from_io(path, e))?
        .len();
    if size > byte_limit {
        log::trace!(
            "Not hashing {} ({} bytes > ceiling {})",
            path.display(),
            size,
            byte_limit
        );
        return Ok(None);
    }

    let mut hasher = XxHash64::with_seed(0);
    let mut buffer = [0u8; HASH_CHUNK_SIZE];
    loop {
        let read = match file.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(HashError::from_io(path, e)),
        };
        hasher.write(&buffer[..read]);
    }

    Ok(Some(Digest(hasher.finish())))
}
