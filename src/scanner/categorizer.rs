//! File categorization by extension, MIME type and name.
//!
//! [`categorize`] is total: every input maps to exactly one [`Category`].
//! Rules are checked in a fixed order so overlapping matches are resolved
//! the same way every time:
//!
//! 1. extension sets for code, document, archive, data and build artifacts
//! 2. MIME prefixes `image/`, `video/`, `audio/`
//! 3. temporary-file heuristics (trailing `~`, known temp extensions)
//! 4. [`Category::Other`]

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Semantic category of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Source code
    Code,
    /// Documents and plain text
    Document,
    /// Images
    Image,
    /// Video
    Video,
    /// Audio
    Audio,
    /// Compressed archives
    Archive,
    /// Structured data files and databases
    Data,
    /// Compiler and build outputs
    BuildArtifact,
    /// Editor backups, swap files and other temporaries
    Temporary,
    /// Anything else
    #[default]
    Other,
}

impl Category {
    /// All categories, in rule precedence order.
    pub const ALL: [Category; 10] = [
        Category::Code,
        Category::Document,
        Category::Archive,
        Category::Data,
        Category::BuildArtifact,
        Category::Image,
        Category::Video,
        Category::Audio,
        Category::Temporary,
        Category::Other,
    ];

    /// Stable snake_case name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::Document => "document",
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Archive => "archive",
            Self::Data => "data",
            Self::BuildArtifact => "build_artifact",
            Self::Temporary => "temporary",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("Unknown category: '{s}'"))
    }
}

const CODE_EXTENSIONS: &[&str] = &[
    ".py", ".js", ".ts", ".java", ".cpp", ".c", ".h", ".go", ".rs", ".rb", ".php",
];
const DOCUMENT_EXTENSIONS: &[&str] = &[".pdf", ".doc", ".docx", ".txt", ".md", ".odt", ".rtf"];
const ARCHIVE_EXTENSIONS: &[&str] = &[".zip", ".tar", ".gz", ".bz2", ".7z", ".rar", ".xz"];
const DATA_EXTENSIONS: &[&str] = &[
    ".json", ".xml", ".yaml", ".yml", ".csv", ".sql", ".db", ".sqlite",
];
const BUILD_EXTENSIONS: &[&str] = &[".o", ".pyc", ".class", ".obj", ".exe", ".dll", ".so"];
const TEMP_EXTENSIONS: &[&str] = &[".tmp", ".temp", ".bak", ".swp", ".swo"];

/// Classify a file.
///
/// `extension` is expected lower-cased with its leading dot (as produced by
/// [`super::extension_of`]); a bare extension without the dot is accepted
/// too.
///
/// # Example
///
/// ```
/// use data_organizer::scanner::categorizer::{categorize, Category};
///
/// assert_eq!(categorize(Some(".py"), Some("text/x-python"), "x.py"), Category::Code);
/// assert_eq!(categorize(Some(".jpg"), Some("image/jpeg"), "x.jpg"), Category::Image);
/// assert_eq!(categorize(Some(".tmp"), None, "x.tmp"), Category::Temporary);
/// ```
#[must_use]
pub fn categorize(extension: Option<&str>, mime_type: Option<&str>, name: &str) -> Category {
    let ext = extension.map(normalize_extension).unwrap_or_default();
    let ext = ext.as_str();

    if CODE_EXTENSIONS.contains(&ext) {
        return Category::Code;
    }
    if DOCUMENT_EXTENSIONS.contains(&ext) {
        return Category::Document;
    }
    if ARCHIVE_EXTENSIONS.contains(&ext) {
        return Category::Archive;
    }
    if DATA_EXTENSIONS.contains(&ext) {
        return Category::Data;
    }
    if BUILD_EXTENSIONS.contains(&ext) {
        return Category::BuildArtifact;
    }

    if let Some(mime) = mime_type {
        if mime.starts_with("image/") {
            return Category::Image;
        }
        if mime.starts_with("video/") {
            return Category::Video;
        }
        if mime.starts_with("audio/") {
            return Category::Audio;
        }
    }

    if name.ends_with('~') || TEMP_EXTENSIONS.contains(&ext) {
        return Category::Temporary;
    }

    Category::Other
}

fn normalize_extension(ext: &str) -> String {
    let lower = ext.to_lowercase();
    if lower.is_empty() || lower.starts_with('.') {
        lower
    } else {
        format!(".{lower}")
    }
}

/// Known extension → MIME type pairs.
const MIME_TABLE: &[(&str, &str)] = &[
    // text and code
    ("txt", "text/plain"),
    ("md", "text/markdown"),
    ("html", "text/html"),
    ("htm", "text/html"),
    ("css", "text/css"),
    ("csv", "text/csv"),
    ("py", "text/x-python"),
    ("c", "text/x-c"),
    ("h", "text/x-c"),
    ("cpp", "text/x-c++src"),
    ("java", "text/x-java"),
    ("rs", "text/x-rust"),
    ("go", "text/x-go"),
    ("rb", "text/x-ruby"),
    ("php", "application/x-httpd-php"),
    ("js", "text/javascript"),
    ("ts", "application/typescript"),
    ("json", "application/json"),
    ("xml", "application/xml"),
    ("yaml", "application/yaml"),
    ("yml", "application/yaml"),
    ("sql", "application/sql"),
    // documents
    ("pdf", "application/pdf"),
    ("doc", "application/msword"),
    (
        "docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
    ("odt", "application/vnd.oasis.opendocument.text"),
    ("rtf", "application/rtf"),
    // images
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("bmp", "image/bmp"),
    ("webp", "image/webp"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
    ("svg", "image/svg+xml"),
    ("ico", "image/vnd.microsoft.icon"),
    ("heic", "image/heic"),
    // video
    ("mp4", "video/mp4"),
    ("m4v", "video/mp4"),
    ("mkv", "video/x-matroska"),
    ("mov", "video/quicktime"),
    ("avi", "video/x-msvideo"),
    ("webm", "video/webm"),
    ("wmv", "video/x-ms-wmv"),
    ("mpeg", "video/mpeg"),
    ("mpg", "video/mpeg"),
    // audio
    ("mp3", "audio/mpeg"),
    ("wav", "audio/x-wav"),
    ("flac", "audio/flac"),
    ("ogg", "audio/ogg"),
    ("m4a", "audio/mp4"),
    ("aac", "audio/aac"),
    ("opus", "audio/opus"),
    // archives
    ("zip", "application/zip"),
    ("tar", "application/x-tar"),
    ("gz", "application/gzip"),
    ("bz2", "application/x-bzip2"),
    ("xz", "application/x-xz"),
    ("7z", "application/x-7z-compressed"),
    ("rar", "application/vnd.rar"),
    // binaries
    ("exe", "application/x-msdownload"),
    ("dll", "application/x-msdownload"),
    ("so", "application/octet-stream"),
    ("o", "application/octet-stream"),
    ("class", "application/java-vm"),
    ("sqlite", "application/vnd.sqlite3"),
    ("db", "application/octet-stream"),
];

/// Guess a MIME type from a file name's extension.
///
/// Returns `None` for unknown or missing extensions.
#[must_use]
pub fn guess_mime(name: &str) -> Option<&'static str> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() {
        // dot-file such as ".bashrc"
        return None;
    }
    let ext = ext.to_lowercase();
    MIME_TABLE
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, mime)| *mime)
}
