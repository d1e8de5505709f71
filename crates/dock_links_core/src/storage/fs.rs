//! Filesystem capability used by the link store.

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Minimal filesystem surface the link store depends on.
pub trait StorageFs {
    fn dir_exists(&self, path: &Path) -> io::Result<bool>;
    fn file_exists(&self, path: &Path) -> io::Result<bool>;
    fn create_dir(&self, path: &Path) -> io::Result<()>;
    /// Creates `path` with `bytes`; fails if it already exists.
    fn create_file(&self, path: &Path, bytes: &[u8]) -> io::Result<()>;
    fn read_all(&self, path: &Path) -> io::Result<Vec<u8>>;
    /// Replaces the contents of `path` with `bytes`.
    fn write_all(&self, path: &Path, bytes: &[u8]) -> io::Result<()>;
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;
}

/// `std::fs` backed implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl StorageFs for LocalFs {
    fn dir_exists(&self, path: &Path) -> io::Result<bool> {
        match fs::metadata(path) {
            Ok(meta) if meta.is_dir() => Ok(true),
            Ok(_) => Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                "path exists but is not a directory",
            )),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err),
        }
    }

    fn file_exists(&self, path: &Path) -> io::Result<bool> {
        path.try_exists()
    }

    fn create_dir(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn create_file(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        create_file_with(path, |temp| temp.write_all(bytes))
    }

    fn read_all(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn write_all(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        let temp = stage(path, |temp| temp.write_all(bytes))?;
        temp.persist(path).map_err(|err| err.error)?;
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }
}

/// Creates `path` from a fully written temp file; never replaces an
/// existing file and never leaves a partial one under `path`.
fn create_file_with(
    path: &Path,
    fill: impl FnOnce(&mut NamedTempFile) -> io::Result<()>,
) -> io::Result<()> {
    let temp = stage(path, fill)?;
    temp.persist_noclobber(path).map_err(|err| err.error)?;
    Ok(())
}

/// Writes and syncs a temp file next to `path`.
///
/// Dropping the returned file on any early return removes it.
fn stage(
    path: &Path,
    fill: impl FnOnce(&mut NamedTempFile) -> io::Result<()>,
) -> io::Result<NamedTempFile> {
    let dir = path.parent().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "database path has no parent")
    })?;
    let mut temp = NamedTempFile::new_in(dir)?;
    fill(&mut temp)?;
    temp.as_file().sync_all()?;
    Ok(temp)
}
