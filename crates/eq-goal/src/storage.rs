// storage.rs — Durable key-value storage behind the goal store.
//
// The store persists exactly two entries (the goal array and the score), so
// the seam is a plain string key-value API. `FileStorage` keeps one file per
// key; `MemoryStorage` keeps everything in a map.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::GoalError;

/// A synchronous string key-value store.
pub trait KeyValueStorage {
    /// Read a value. `Ok(None)` means the key has never been written.
    fn get(&self, key: &str) -> Result<Option<String>, GoalError>;

    /// Write a value, replacing any previous one.
    fn set(&mut self, key: &str, value: &str) -> Result<(), GoalError>;

    /// Delete a key. Deleting a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), GoalError>;

    /// Write several entries as one unit.
    ///
    /// If any write fails, the entries already written are put back to their
    /// previous values (or removed if they didn't exist) and the first error
    /// is returned.
    fn set_all(&mut self, entries: &[(&str, &str)]) -> Result<(), GoalError> {
        let mut previous = Vec::with_capacity(entries.len());
        for (key, _) in entries {
            previous.push(self.get(key)?);
        }

        for (i, (key, value)) in entries.iter().enumerate() {
            if let Err(e) = self.set(key, value) {
                for ((key, _), prev) in entries[..i].iter().zip(&previous).rev() {
                    let restored = match prev {
                        Some(v) => self.set(key, v),
                        None => self.remove(key),
                    };
                    if let Err(re) = restored {
                        tracing::warn!(key = *key, "could not roll back storage entry: {}", re);
                    }
                }
                return Err(e);
            }
        }
        Ok(())
    }
}

/// Key-value storage backed by a directory: `<dir>/<key>`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Create storage rooted at `dir`, creating the directory if needed.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, GoalError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|source| GoalError::IoError {
            path: dir.display().to_string(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_file(&self, key: &str) -> Result<PathBuf, GoalError> {
        if key.is_empty() || key.contains(|c: char| c == '/' || c == '\\') || key.starts_with('.') {
            return Err(GoalError::Config(format!("invalid storage key '{}'", key)));
        }
        Ok(self.dir.join(key))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, GoalError> {
        let path = self.key_file(key)?;
        if !path.exists() {
            return Ok(None);
        }
        let value = fs::read_to_string(&path).map_err(|source| GoalError::IoError {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Some(value))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), GoalError> {
        let path = self.key_file(key)?;
        // Write to a sibling temp file, then rename over the key file.
        let tmp = self.dir.join(format!(".{}.tmp", key));
        fs::write(&tmp, value).map_err(|source| GoalError::IoError {
            path: tmp.display().to_string(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| GoalError::IoError {
            path: path.display().to_string(),
            source,
        })?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), GoalError> {
        let path = self.key_file(key)?;
        if !path.exists() {
            return Ok(());
        }
        fs::remove_file(&path).map_err(|source| GoalError::IoError {
            path: path.display().to_string(),
            source,
        })
    }
}

/// In-process key-value storage. Nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, GoalError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), GoalError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), GoalError> {
        self.entries.remove(key);
        Ok(())
    }
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, GoalError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), GoalError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), GoalError> {
        (**self).remove(key)
    }

    fn set_all(&mut self, entries: &[(&str, &str)]) -> Result<(), GoalError> {
        (**self).set_all(entries)
    }
}
