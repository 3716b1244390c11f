//! Layered application configuration.
//!
//! Values are merged in increasing precedence:
//! built-in defaults < TOML file < `DATA_ORGANIZER_*` environment < CLI flags.
//!
//! The TOML file lives in the platform config directory
//! (`config.toml` under [`ProjectDirs`]) unless `--config` names another one.
//! A missing file is not an error.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::actions::executor::DEFAULT_CAPTURE_CEILING;
use crate::scanner::{
    ScanConfig, DEFAULT_BATCH_SIZE, DEFAULT_HASH_SIZE_CEILING, DEFAULT_MAX_DEPTH,
    DEFAULT_WORKER_THREADS,
};

/// Prefix for configuration environment variables.
pub const ENV_PREFIX: &str = "DATA_ORGANIZER_";

/// Name of the configuration file inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Keys recognised in the configuration file.
pub const KNOWN_KEYS: [&str; 8] = [
    "max_depth",
    "include_hidden",
    "follow_symlinks",
    "hash_size_ceiling",
    "delete_capture_ceiling",
    "dry_run",
    "batch_size",
    "worker_threads",
];

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A provider failed or a value had the wrong type.
    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    /// A value parsed but is not acceptable.
    #[error("Invalid configuration value for '{key}': {reason}")]
    Invalid {
        /// Offending key
        key: &'static str,
        /// Why it was rejected
        reason: String,
    },
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Deepest directory level the scanner descends into.
    pub max_depth: usize,
    /// Include dot-files and dot-directories.
    pub include_hidden: bool,
    /// Follow symbolic links while scanning.
    pub follow_symlinks: bool,
    /// Files larger than this are not hashed.
    pub hash_size_ceiling: u64,
    /// Files larger than this are deleted without capturing their content.
    pub delete_capture_ceiling: u64,
    /// Plan actions instead of applying them.
    pub dry_run: bool,
    /// Files between progress reports.
    pub batch_size: usize,
    /// Hashing worker threads.
    pub worker_threads: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            include_hidden: false,
            follow_symlinks: false,
            hash_size_ceiling: DEFAULT_HASH_SIZE_CEILING,
            delete_capture_ceiling: DEFAULT_CAPTURE_CEILING,
            dry_run: true,
            batch_size: DEFAULT_BATCH_SIZE,
            worker_threads: DEFAULT_WORKER_THREADS,
        }
    }
}

/// Values set on the command line; `None` leaves the lower layers in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_hidden: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_symlinks: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash_size_ceiling: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dry_run: Option<bool>,
}

impl Config {
    /// Default configuration file path for this platform, if one exists.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "data-organizer", "data-organizer")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Defaults merged with the TOML file at `path`, without environment.
    #[must_use]
    pub fn file_figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Config::default())).merge(Toml::file(path))
    }

    /// Load every layer: defaults, file, environment and `overrides`.
    ///
    /// `path` replaces the platform default file when given.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a layer cannot be parsed or a value is
    /// out of range.
    pub fn load(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        let path = path.map(Path::to_path_buf).or_else(Self::default_path);

        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = &path {
            warn_unknown_keys(path);
            log::debug!("Reading configuration from {}", path.display());
            figment = figment.merge(Toml::file(path));
        }
        let figment = figment
            .merge(Env::prefixed(ENV_PREFIX).only(&KNOWN_KEYS))
            .merge(Serialized::defaults(overrides));

        let config: Config = figment.extract().map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    /// Load defaults and the TOML file at `path` only.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be parsed or a value is
    /// out of range.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        warn_unknown_keys(path);
        let config: Config = Self::file_figment(path).extract().map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the scanner cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let must_be_positive = [
            ("max_depth", self.max_depth),
            ("batch_size", self.batch_size),
            ("worker_threads", self.worker_threads),
        ];
        for (key, value) in must_be_positive {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    key,
                    reason: "must be at least 1".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Scanner settings derived from this configuration.
    #[must_use]
    pub fn to_scan_config(&self) -> ScanConfig {
        ScanConfig::default()
            .with_max_depth(self.max_depth)
            .with_include_hidden(self.include_hidden)
            .with_follow_symlinks(self.follow_symlinks)
            .with_hash_size_ceiling(self.hash_size_ceiling)
            .with_worker_threads(self.worker_threads)
            .with_batch_size(self.batch_size)
    }
}

/// Top-level keys in `content` that are not configuration keys, each with
/// the closest known key when one is similar enough.
#[must_use]
pub fn unknown_keys(content: &str) -> Vec<(String, Option<&'static str>)> {
    let Ok(table) = content.parse::<toml::Table>() else {
        return Vec::new();
    };
    table
        .keys()
        .filter(|key| !KNOWN_KEYS.contains(&key.as_str()))
        .map(|key| (key.clone(), closest_key(key)))
        .collect()
}

fn closest_key(key: &str) -> Option<&'static str> {
    KNOWN_KEYS
        .iter()
        .map(|known| (*known, strsim::jaro_winkler(key, known)))
        .filter(|(_, score)| *score > 0.8)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(known, _)| known)
}

fn warn_unknown_keys(path: &Path) {
    let Ok(content) = fs::read_to_string(path) else {
        return;
    };
    for (key, suggestion) in unknown_keys(&content) {
        match suggestion {
            Some(known) => log::warn!(
                "Unknown configuration key '{}' in {} (did you mean '{}'?)",
                key,
                path.display(),
                known
            ),
            None => log::warn!("Unknown configuration key '{}' in {}", key, path.display()),
        }
    }
}
