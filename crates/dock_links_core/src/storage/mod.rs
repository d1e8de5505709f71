//! File-backed persistence for the links tray database.
//!
//! # Responsibility
//! - Create the storage directory and seed file on first use.
//! - Load, validate and save the JSON link database.
//! - Quarantine unreadable databases instead of overwriting them.
//!
//! # Invariants
//! - No file operation runs before the storage directory is known to exist.
//! - A corrupt database file is renamed aside before anything else may take
//!   its name; the store never deletes quarantined files.
//! - Saves replace the database through a temp file and rename.

use crate::config::ConfigError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::PathBuf;

pub mod fs;
mod link_store;

pub use link_store::{LinkStore, StoreState};

pub type StoreResult<T> = Result<T, StoreError>;

/// Link store failures.
#[derive(Debug)]
pub enum StoreError {
    /// Store configuration failed validation.
    Config(ConfigError),
    /// Storage directory could not be inspected or created.
    Directory { path: PathBuf, source: io::Error },
    /// Read or write against the database file failed.
    Io { path: PathBuf, source: io::Error },
    /// Database content was unreadable; the original bytes now live at
    /// `quarantined_to`.
    CorruptDatabase {
        quarantined_to: PathBuf,
        reason: String,
    },
    /// An operation ran before its required predecessor.
    NotReady {
        operation: &'static str,
        state: StoreState,
    },
    /// In-memory database could not be encoded.
    Serialize(serde_json::Error),
}

impl StoreError {
    /// Stable code used in log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "invalid_config",
            Self::Directory { .. } => "directory_error",
            Self::Io { .. } => "io_error",
            Self::CorruptDatabase { .. } => "corrupt_database",
            Self::NotReady { .. } => "not_ready",
            Self::Serialize(_) => "serialize_failed",
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "invalid link store config: {err}"),
            Self::Directory { path, source } => {
                write!(f, "storage directory `{}` unavailable: {source}", path.display())
            }
            Self::Io { path, source } => {
                write!(f, "database file `{}` I/O failed: {source}", path.display())
            }
            Self::CorruptDatabase {
                quarantined_to,
                reason,
            } => write!(
                f,
                "database is not a meaningful JSON link database ({reason}); moved to `{}`",
                quarantined_to.display()
            ),
            Self::NotReady { operation, state } => {
                write!(f, "`{operation}` called before storage is ready (state: {state})")
            }
            Self::Serialize(err) => write!(f, "failed to encode link database: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Directory { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            Self::Serialize(err) => Some(err),
            Self::CorruptDatabase { .. } | Self::NotReady { .. } => None,
        }
    }
}

impl From<ConfigError> for StoreError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}
