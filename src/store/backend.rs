use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::io::atomic_write_string;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage IO error: {0}")]
    Io(#[from] io::Error),
    #[error("storage serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to save data to storage")]
    WriteFailed,
    #[error("failed to load data from storage")]
    ReadFailed,
}

/// One logical persistence boundary: named string slots, read and written
/// wholesale. Mirrors the browser local-storage surface the app grew up on.
pub trait KeyValueStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-memory backend for tests and ephemeral sessions.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryStorage {
    slots: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.slots.remove(key);
        Ok(())
    }
}

/// File-per-slot backend under a data directory, written atomically so a
/// crash never truncates the envelope.
#[derive(Clone, Debug, PartialEq)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Creation is best-effort like every other storage operation: a failed
    /// mkdir is logged here and resurfaces as an IO error on first write.
    pub fn new(dir: PathBuf) -> Self {
        if let Err(err) = fs::create_dir_all(&dir) {
            log::error!("could not create storage directory {}: {err}", dir.display());
        }
        Self { dir }
    }

    /// Platform data directory for the app, falling back to a dot-directory
    /// in the working directory when the platform gives us nothing.
    pub fn for_app() -> Self {
        let dir = directories_next::ProjectDirs::from("", "", "jsoncel")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".jsoncel"));
        Self::new(dir)
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.slot_path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        atomic_write_string(&self.slot_path(key), value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.slot_path(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
