//! Explicit store configuration and storage path resolution.
//!
//! # Responsibility
//! - Carry the extension root and seed defaults into the link store.
//! - Resolve `<extension-root>/<data>/<db-file>` without touching disk.
//!
//! # Invariants
//! - `extension_root` is absolute.
//! - `data_dir_name` and `db_file_name` are single path components.

use crate::model::link::{LinkDatabase, DEFAULT_LINK_TARGET, DEFAULT_SCHEMA_ID};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Directory created under the extension root.
pub const DEFAULT_DATA_DIR_NAME: &str = "data";
/// Database file created inside the data directory.
pub const DEFAULT_DB_FILE_NAME: &str = "links_tray_db.json";

/// Configuration handed to `LinkStore` at construction.
///
/// Deserializable so a host can pass it as JSON; every field except
/// `extension_root` falls back to its default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinkStoreConfig {
    pub extension_root: PathBuf,
    #[serde(default = "default_data_dir_name")]
    pub data_dir_name: String,
    #[serde(default = "default_db_file_name")]
    pub db_file_name: String,
    #[serde(default = "default_schema_id")]
    pub default_schema_id: i64,
    #[serde(default = "default_link")]
    pub default_link: String,
}

impl LinkStoreConfig {
    pub fn new(extension_root: impl Into<PathBuf>) -> Self {
        Self {
            extension_root: extension_root.into(),
            data_dir_name: default_data_dir_name(),
            db_file_name: default_db_file_name(),
            default_schema_id: default_schema_id(),
            default_link: default_link(),
        }
    }

    /// Checks root and file name invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.extension_root.as_os_str().is_empty() {
            return Err(ConfigError::EmptyRoot);
        }
        if !self.extension_root.is_absolute() {
            return Err(ConfigError::RelativeRoot(self.extension_root.clone()));
        }
        validate_component("data_dir_name", &self.data_dir_name)?;
        validate_component("db_file_name", &self.db_file_name)?;
        Ok(())
    }

    /// Database written when no file exists yet.
    pub fn seed_database(&self) -> LinkDatabase {
        LinkDatabase::seed(self.default_schema_id, self.default_link.clone())
    }
}

fn default_data_dir_name() -> String {
    DEFAULT_DATA_DIR_NAME.to_string()
}

fn default_db_file_name() -> String {
    DEFAULT_DB_FILE_NAME.to_string()
}

fn default_schema_id() -> i64 {
    DEFAULT_SCHEMA_ID
}

fn default_link() -> String {
    DEFAULT_LINK_TARGET.to_string()
}

fn validate_component(field: &'static str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed == "." || trimmed == ".." {
        return Err(ConfigError::InvalidName {
            field,
            value: value.to_string(),
        });
    }
    if trimmed.contains('/') || trimmed.contains(std::path::MAIN_SEPARATOR) {
        return Err(ConfigError::InvalidName {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyRoot,
    RelativeRoot(PathBuf),
    InvalidName { field: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyRoot => write!(f, "extension root cannot be empty"),
            Self::RelativeRoot(path) => {
                write!(f, "extension root must be absolute, got `{}`", path.display())
            }
            Self::InvalidName { field, value } => {
                write!(f, "{field} must be a single path component, got `{value}`")
            }
        }
    }
}

impl Error for ConfigError {}

/// Resolved storage locations for one extension root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePaths {
    pub data_dir: PathBuf,
    pub db_file: PathBuf,
}

impl StoragePaths {
    /// Pure path join; performs no I/O.
    pub fn resolve(config: &LinkStoreConfig) -> Self {
        let data_dir = config.extension_root.join(&config.data_dir_name);
        let db_file = data_dir.join(&config.db_file_name);
        Self { data_dir, db_file }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn db_file(&self) -> &Path {
        &self.db_file
    }
}
