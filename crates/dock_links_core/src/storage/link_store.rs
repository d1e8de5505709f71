//! JSON link database store.

use super::fs::{LocalFs, StorageFs};
use super::{StoreError, StoreResult};
use crate::config::{LinkStoreConfig, StoragePaths};
use crate::logging::single_line;
use crate::model::link::LinkDatabase;
use log::{debug, error, info, warn};
use std::fmt::{Display, Formatter};
use std::io;
use std::path::PathBuf;
use std::time::Instant;
use uuid::Uuid;

/// Quarantine tags are drawn from `0..QUARANTINE_TAG_RANGE`.
const QUARANTINE_TAG_RANGE: u128 = 10_000;
const QUARANTINE_MAX_ATTEMPTS: usize = 16;
const MAX_REASON_CHARS: usize = 160;

/// Lifecycle of one store instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    Uninitialized,
    DirectoryReady,
    /// An existing database file was parsed.
    Loaded,
    /// The seed database was written.
    Created,
}

impl StoreState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::DirectoryReady => "directory_ready",
            Self::Loaded => "loaded",
            Self::Created => "created",
        }
    }

    fn has_directory(self) -> bool {
        !matches!(self, Self::Uninitialized)
    }

    fn has_database(self) -> bool {
        matches!(self, Self::Loaded | Self::Created)
    }
}

impl Display for StoreState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Owner of `<extension-root>/data/links_tray_db.json`.
///
/// Call order is `ensure_storage_ready`, then `open_or_create`, then any
/// number of `save`s; out-of-order calls fail with `StoreError::NotReady`.
/// Nothing is persisted implicitly: mutations reach disk only through `save`.
#[derive(Debug)]
pub struct LinkStore<F = LocalFs> {
    config: LinkStoreConfig,
    paths: StoragePaths,
    fs: F,
    state: StoreState,
}

impl LinkStore<LocalFs> {
    /// Creates a store over the local filesystem. Performs no I/O.
    pub fn new(config: LinkStoreConfig) -> StoreResult<Self> {
        Self::with_fs(config, LocalFs)
    }
}

impl<F: StorageFs> LinkStore<F> {
    /// Creates a store over a caller-supplied filesystem. Performs no I/O.
    pub fn with_fs(config: LinkStoreConfig, fs: F) -> StoreResult<Self> {
        config.validate()?;
        let paths = StoragePaths::resolve(&config);
        Ok(Self {
            config,
            paths,
            fs,
            state: StoreState::Uninitialized,
        })
    }

    pub fn state(&self) -> StoreState {
        self.state
    }

    pub fn paths(&self) -> &StoragePaths {
        &self.paths
    }

    pub fn config(&self) -> &LinkStoreConfig {
        &self.config
    }

    /// Makes sure the storage directory exists, creating it when missing.
    ///
    /// Idempotent: once the directory exists repeated calls only re-check it.
    pub fn ensure_storage_ready(&mut self) -> StoreResult<()> {
        let dir = &self.paths.data_dir;
        let exists = self
            .fs
            .dir_exists(dir)
            .map_err(|source| directory_error(dir, source))?;

        if !exists {
            self.fs
                .create_dir(dir)
                .map_err(|source| directory_error(dir, source))?;
            info!(
                "event=storage_ready module=storage status=ok created=true dir={}",
                dir.display()
            );
        } else {
            debug!(
                "event=storage_ready module=storage status=ok created=false dir={}",
                dir.display()
            );
        }

        if self.state == StoreState::Uninitialized {
            self.state = StoreState::DirectoryReady;
        }
        Ok(())
    }

    /// Loads the database, seeding a default one when no file exists.
    ///
    /// # Errors
    /// - `NotReady` before `ensure_storage_ready` succeeded.
    /// - `CorruptDatabase` when the file does not parse as a link database;
    ///   the file has been renamed aside and its name is free again, so a
    ///   second call seeds a fresh database.
    /// - `Io` for read/write failures unrelated to content.
    pub fn open_or_create(&mut self) -> StoreResult<LinkDatabase> {
        self.require_state("open_or_create", self.state.has_directory())?;
        let started_at = Instant::now();
        let path = &self.paths.db_file;

        let exists = self
            .fs
            .file_exists(path)
            .map_err(|source| io_error(path, source))?;

        if !exists {
            let seed = self.config.seed_database();
            let bytes = serde_json::to_vec(&seed).map_err(StoreError::Serialize)?;
            if let Err(source) = self.fs.create_file(path, &bytes) {
                error!(
                    "event=db_open module=storage status=error outcome=created duration_ms={} error_code=io_error error={}",
                    started_at.elapsed().as_millis(),
                    source
                );
                return Err(io_error(path, source));
            }
            self.state = StoreState::Created;
            info!(
                "event=db_open module=storage status=ok outcome=created links={} duration_ms={}",
                seed.len(),
                started_at.elapsed().as_millis()
            );
            return Ok(seed);
        }

        let bytes = self
            .fs
            .read_all(path)
            .map_err(|source| io_error(path, source))?;

        match serde_json::from_slice::<LinkDatabase>(&bytes) {
            Ok(database) => {
                self.state = StoreState::Loaded;
                info!(
                    "event=db_open module=storage status=ok outcome=loaded links={} duration_ms={}",
                    database.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(database)
            }
            Err(err) => {
                let reason = single_line(&err.to_string(), MAX_REASON_CHARS);
                let quarantined_to = self.quarantine()?;
                warn!(
                    "event=db_open module=storage status=error outcome=quarantined error_code=corrupt_database quarantined_to={} duration_ms={}",
                    quarantined_to.display(),
                    started_at.elapsed().as_millis()
                );
                Err(StoreError::CorruptDatabase {
                    quarantined_to,
                    reason,
                })
            }
        }
    }

    /// Replaces the on-disk database with `database`.
    ///
    /// Requires a successful `open_or_create`, so whatever file held the
    /// database name was either parsed or quarantined before it is replaced.
    ///
    /// The write goes through a temp file in the data directory that is
    /// renamed over the database, so a failed save leaves either the old
    /// document or the new one, never a truncated mix.
    pub fn save(&self, database: &LinkDatabase) -> StoreResult<()> {
        self.require_state("save", self.state.has_database())?;
        let started_at = Instant::now();
        let path = &self.paths.db_file;

        let bytes = serde_json::to_vec(database).map_err(StoreError::Serialize)?;
        if let Err(source) = self.fs.write_all(path, &bytes) {
            error!(
                "event=db_save module=storage status=error duration_ms={} error_code=io_error error={}",
                started_at.elapsed().as_millis(),
                source
            );
            return Err(io_error(path, source));
        }

        info!(
            "event=db_save module=storage status=ok links={} bytes={} duration_ms={}",
            database.len(),
            bytes.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }

    fn require_state(&self, operation: &'static str, satisfied: bool) -> StoreResult<()> {
        if satisfied {
            return Ok(());
        }
        error!(
            "event=store_guard module=storage status=error operation={} state={} error_code=not_ready",
            operation, self.state
        );
        Err(StoreError::NotReady {
            operation,
            state: self.state,
        })
    }

    /// Renames the database file to `<name>.<tag>` in the same directory.
    fn quarantine(&self) -> StoreResult<PathBuf> {
        let from = &self.paths.db_file;
        for _ in 0..QUARANTINE_MAX_ATTEMPTS {
            let tag = Uuid::new_v4().as_u128() % QUARANTINE_TAG_RANGE;
            let to = self
                .paths
                .data_dir
                .join(format!("{}.{tag}", self.config.db_file_name));
            let taken = self
                .fs
                .file_exists(&to)
                .map_err(|source| io_error(&to, source))?;
            if taken {
                continue;
            }
            self.fs
                .rename(from, &to)
                .map_err(|source| io_error(from, source))?;
            info!(
                "event=db_quarantine module=storage status=ok from={} to={}",
                from.display(),
                to.display()
            );
            return Ok(to);
        }

        error!(
            "event=db_quarantine module=storage status=error error_code=no_free_name from={}",
            from.display()
        );
        Err(io_error(
            from,
            io::Error::new(
                io::ErrorKind::AlreadyExists,
                "no free quarantine name for corrupt database",
            ),
        ))
    }
}

fn directory_error(path: &std::path::Path, source: io::Error) -> StoreError {
    error!(
        "event=storage_ready module=storage status=error dir={} error_code=directory_error error={}",
        path.display(),
        source
    );
    StoreError::Directory {
        path: path.to_path_buf(),
        source,
    }
}

fn io_error(path: &std::path::Path, source: io::Error) -> StoreError {
    StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}
