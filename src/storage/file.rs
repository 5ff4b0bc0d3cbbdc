//! Directory-backed store.
//!
//! Each key lives in its own `<key>.kv` file under the root directory.
//! Writes go to a temp file first and are renamed into place, so a crash
//! mid-write leaves either the old value or the new one.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process;

use tracing::debug;

use crate::error::StoreError;
use crate::storage::PersistentStore;

const EXTENSION: &str = "kv";

/// Persistent store rooted at a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    // == Constructor ==
    /// Opens (creating if needed) the store directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| StoreError::Unavailable {
            path: root.clone(),
            source,
        })?;
        if !root.is_dir() {
            return Err(StoreError::Unavailable {
                source: std::io::Error::new(ErrorKind::Other, "not a directory"),
                path: root,
            });
        }
        debug!(root = %root.display(), "opened file store");
        Ok(Self { root })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(format!("{}.{}", key, EXTENSION)))
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl PersistentStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(io_error(&path)(err)),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        let temp_path = path.with_extension(format!("{}.{}.tmp", EXTENSION, process::id()));

        {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .map_err(io_error(&temp_path))?;
            file.write_all(value.as_bytes())
                .map_err(io_error(&temp_path))?;
            file.sync_all().map_err(io_error(&temp_path))?;
        }

        fs::rename(&temp_path, &path).map_err(|err| {
            let _ = fs::remove_file(&temp_path);
            io_error(&path)(err)
        })
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(io_error(&path)(err)),
        }
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        let entries = fs::read_dir(&self.root).map_err(io_error(&self.root))?;
        let mut removed = 0usize;
        for entry in entries {
            let path = entry.map_err(io_error(&self.root))?.path();
            // Leave foreign files alone
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            match fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(err) if err.kind() == ErrorKind::NotFound => {}
                Err(err) => return Err(io_error(&path)(err)),
            }
        }
        debug!(root = %self.root.display(), removed, "cleared file store");
        Ok(())
    }
}
