//! File-based storage backend for persistent storage.

use crate::backend::StorageBackend;
use crate::error::{StorageError, StorageResult};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// A file-based storage backend.
///
/// The whole database is one file. Every `replace` writes the new contents
/// to a sibling temporary file (`<name>.tmp`) and renames it over the
/// target, so readers of the path observe either the old or the new
/// contents, never a torn write.
///
/// # Durability
///
/// - With `sync_on_write` (the default) the temporary file is `fsync`ed
///   before the rename
/// - Without it, data reaches the OS page cache only
///
/// # Example
///
/// ```no_run
/// use jsondb_storage::{StorageBackend, FileBackend};
/// use std::path::Path;
///
/// let mut backend = FileBackend::open(Path::new("data.json")).unwrap();
/// backend.replace(b"{}").unwrap();
/// ```
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    temp_path: PathBuf,
    sync_on_write: bool,
}

impl FileBackend {
    /// Opens a file backend at the given path.
    ///
    /// The file itself is not created until the first `replace`.
    ///
    /// # Errors
    ///
    /// Returns an error if the path has no file name or names a directory.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let file_name = path.file_name().ok_or_else(|| StorageError::InvalidPath {
            path: path.to_path_buf(),
            reason: "path has no file name".into(),
        })?;

        if path.is_dir() {
            return Err(StorageError::InvalidPath {
                path: path.to_path_buf(),
                reason: "path is a directory".into(),
            });
        }

        let mut temp_name = OsString::from(file_name);
        temp_name.push(".tmp");

        Ok(Self {
            path: path.to_path_buf(),
            temp_path: path.with_file_name(temp_name),
            sync_on_write: true,
        })
    }

    /// Opens a file backend, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directories cannot be created or the path is invalid.
    pub fn open_with_create_dirs(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Self::open(path)
    }

    /// Sets whether to `fsync` the file before it replaces the old contents.
    #[must_use]
    pub fn sync_on_write(mut self, value: bool) -> Self {
        self.sync_on_write = value;
        self
    }

    /// Returns the path to the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_temp(&self, data: &[u8]) -> io::Result<()> {
        let mut file = File::create(&self.temp_path)?;
        file.write_all(data)?;
        file.flush()?;
        if self.sync_on_write {
            file.sync_all()?;
        }
        Ok(())
    }
}

impl StorageBackend for FileBackend {
    fn load(&self) -> StorageResult<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn replace(&mut self, data: &[u8]) -> StorageResult<()> {
        if let Err(e) = self.write_temp(data) {
            let _ = fs::remove_file(&self.temp_path);
            return Err(e.into());
        }

        if let Err(source) = fs::rename(&self.temp_path, &self.path) {
            let _ = fs::remove_file(&self.temp_path);
            return Err(StorageError::ReplaceFailed {
                path: self.path.clone(),
                source,
            });
        }

        Ok(())
    }

    fn exists(&self) -> StorageResult<bool> {
        Ok(self.path.try_exists()?)
    }

    fn size(&self) -> StorageResult<u64> {
        match fs::metadata(&self.path) {
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e.into()),
        }
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn open_does_not_create_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.json");

        let backend = FileBackend::open(&path).unwrap();
        assert!(!backend.exists().unwrap());
        assert_eq!(backend.load().unwrap(), None);
        assert_eq!(backend.size().unwrap(), 0);
        assert!(!path.exists());
    }

    #[test]
    fn replace_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.json");

        let mut backend = FileBackend::open(&path).unwrap();
        backend.replace(b"{\"a\":[]}").unwrap();

        assert!(backend.exists().unwrap());
        assert_eq!(backend.size().unwrap(), 8);
        assert_eq!(backend.load().unwrap().unwrap(), b"{\"a\":[]}");
    }

    #[test]
    fn replace_overwrites_previous_contents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.json");

        let mut backend = FileBackend::open(&path).unwrap();
        backend.replace(b"a much longer first version").unwrap();
        backend.replace(b"short").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"short");
    }

    #[test]
    fn replace_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.json");

        let mut backend = FileBackend::open(&path).unwrap();
        backend.replace(b"{}").unwrap();

        assert!(!dir.path().join("db.json.tmp").exists());
    }

    #[test]
    fn persistence_across_handles() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.json");

        {
            let mut backend = FileBackend::open(&path).unwrap().sync_on_write(false);
            backend.replace(b"persistent data").unwrap();
        }

        let backend = FileBackend::open(&path).unwrap();
        assert_eq!(backend.load().unwrap().unwrap(), b"persistent data");
    }

    #[test]
    fn create_with_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("path").join("db.json");

        let mut backend = FileBackend::open_with_create_dirs(&path).unwrap();
        backend.replace(b"{}").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn directory_path_rejected() {
        let dir = tempdir().unwrap();
        let result = FileBackend::open(dir.path());
        assert!(matches!(result, Err(StorageError::InvalidPath { .. })));
    }

    #[test]
    fn describe_is_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.json");

        let backend = FileBackend::open(&path).unwrap();
        assert_eq!(backend.path(), path);
        assert_eq!(backend.describe(), path.display().to_string());
    }
}
