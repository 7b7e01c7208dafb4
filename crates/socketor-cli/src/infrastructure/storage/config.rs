//! TOML persistence for Socketor settings and saved connection profiles.
//!
//! The default location is the platform config directory:
//! - Windows:  `%APPDATA%\Socketor\config.toml`
//! - Linux:    `$XDG_CONFIG_HOME/socketor/config.toml` (or `~/.config/socketor`)
//! - macOS:    `~/Library/Application Support/Socketor/config.toml`
//!
//! The binary accepts `--config <PATH>` (or `SOCKETOR_CONFIG`) to point at
//! any other file, which is also how tests use a temporary directory.
//!
//! # File layout
//!
//! ```toml
//! [general]
//! log_level = "info"
//! locale = "en-US"
//!
//! [[profiles]]
//! name = "local echo"
//!
//! [profiles.connection]
//! connection_type = "TcpClientConfig"
//! host = "127.0.0.1"
//! port = 8081
//! ```
//!
//! Every field has a serde default, so a first run (no file) and an older
//! file missing newer fields both load cleanly.  A profile whose
//! `connection_type` is missing or unknown does not: the load fails with
//! [`StorageError::Connection`] naming the profile, rather than the profile
//! being replaced with some other kind.  Fields that belong to another kind,
//! or misspelled keys, fail the load too.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use socketor_core::{ConfigError, ConnectionConfig, ConnectionKind, Locale};

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A saved profile has a missing or unknown `connection_type`.
    #[error("profile `{profile}`: {source}")]
    Connection {
        profile: String,
        #[source]
        source: ConfigError,
    },

    /// Two saved profiles share a name.
    #[error("profile `{0}` appears more than once")]
    DuplicateProfile(String),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level settings file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub profiles: Vec<ProfileEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralConfig {
    /// `tracing` filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Locale for message timestamps.
    #[serde(default)]
    pub locale: Locale,
}

/// A named, saved connection profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileEntry {
    pub name: String,
    pub connection: ConnectionConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            locale: Locale::default(),
        }
    }
}

impl AppConfig {
    pub fn profile(&self, name: &str) -> Option<&ProfileEntry> {
        self.profiles.iter().find(|p| p.name == name)
    }

    /// Inserts a profile, replacing any existing one with the same name.
    /// Returns the replaced profile.
    pub fn upsert_profile(&mut self, entry: ProfileEntry) -> Option<ProfileEntry> {
        match self.profiles.iter_mut().find(|p| p.name == entry.name) {
            Some(existing) => Some(std::mem::replace(existing, entry)),
            None => {
                self.profiles.push(entry);
                None
            }
        }
    }

    /// Removes the named profile, returning it if it existed.
    pub fn remove_profile(&mut self, name: &str) -> Option<ProfileEntry> {
        let index = self.profiles.iter().position(|p| p.name == name)?;
        Some(self.profiles.remove(index))
    }

    fn check_unique_names(&self) -> Result<(), StorageError> {
        for (i, entry) in self.profiles.iter().enumerate() {
            if self.profiles[..i].iter().any(|p| p.name == entry.name) {
                return Err(StorageError::DuplicateProfile(entry.name.clone()));
            }
        }
        Ok(())
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Resolves the default config file path.
///
/// # Errors
///
/// Returns [`StorageError::NoPlatformConfigDir`] if the base directory cannot
/// be determined.
pub fn config_file_path() -> Result<PathBuf, StorageError> {
    Ok(platform_config_dir()
        .ok_or(StorageError::NoPlatformConfigDir)?
        .join("config.toml"))
}

/// Loads `AppConfig` from `path`, returning `AppConfig::default()` if the
/// file does not yet exist.
///
/// # Errors
///
/// Returns [`StorageError::Io`] for file-system errors other than "not
/// found", [`StorageError::Connection`] if a profile's `connection_type` is
/// missing or unknown, [`StorageError::Parse`] if the TOML is malformed or a
/// profile's fields do not fit its kind, and [`StorageError::DuplicateProfile`]
/// if two profiles share a name.
pub fn load_config_from(path: &Path) -> Result<AppConfig, StorageError> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let table: toml::Table = toml::from_str(&content)?;
            check_connection_tags(&table)?;
            let cfg: AppConfig = toml::from_str(&content)?;
            cfg.check_unique_names()?;
            Ok(cfg)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(e) => Err(StorageError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Checks every `profiles[*].connection.connection_type` before the typed
/// decode, so tag problems keep their own [`ConfigError`] kind.
fn check_connection_tags(table: &toml::Table) -> Result<(), StorageError> {
    let Some(profiles) = table.get("profiles").and_then(toml::Value::as_array) else {
        return Ok(());
    };

    for (index, profile) in profiles.iter().enumerate() {
        let tag = profile
            .get("connection")
            .and_then(|connection| connection.get("connection_type"));
        let checked = match tag {
            None => Err(ConfigError::MissingConnectionType),
            Some(toml::Value::String(tag)) => ConnectionKind::from_tag(tag).map(|_| ()),
            Some(other) => Err(ConfigError::InvalidConnectionVariant(other.to_string())),
        };
        checked.map_err(|source| StorageError::Connection {
            profile: profile
                .get("name")
                .and_then(toml::Value::as_str)
                .map_or_else(|| format!("#{}", index + 1), str::to_string),
            source,
        })?;
    }
    Ok(())
}

/// Persists `config` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`StorageError::Io`] for file-system failures or
/// [`StorageError::Serialize`] if serialization fails.
pub fn save_config_to(path: &Path, config: &AppConfig) -> Result<(), StorageError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|source| StorageError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolves the platform config directory, including the `Socketor`
/// subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("Socketor"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("socketor"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("Socketor")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
