use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::TimeClockError;

pub const RECORDS_KEY: &str = "timeClockRecords";
pub const EMPLOYEE_NAME_KEY: &str = "employeeName";
pub const EMPLOYEE_ID_KEY: &str = "employeeId";

/// String key-value persistence, the same shape as browser local storage.
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Option<String>;
    /// Writes several entries at once; all or nothing.
    fn set_many(&mut self, entries: &[(&str, String)]) -> Result<(), TimeClockError>;
    fn remove(&mut self, key: &str) -> Result<(), TimeClockError>;
}

/// Keeps every entry in one JSON object on disk.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Opens the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, TimeClockError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| {
                TimeClockError::Storage(format!("{} is not a valid store: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(TimeClockError::Storage(format!(
                    "cannot read {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        tracing::debug!(path = %path.display(), keys = entries.len(), "Store opened");
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<(), TimeClockError> {
        let storage_err =
            |e: std::io::Error| TimeClockError::Storage(format!("{}: {}", self.path.display(), e));

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(storage_err)?;
        }

        let body = serde_json::to_string_pretty(entries)
            .map_err(|e| TimeClockError::Storage(e.to_string()))?;

        // contents must be on disk before the rename makes them the store
        let tmp = self.path.with_extension("json.tmp");
        let mut file = File::create(&tmp).map_err(storage_err)?;
        file.write_all(body.as_bytes()).map_err(storage_err)?;
        file.sync_all().map_err(storage_err)?;
        drop(file);
        fs::rename(&tmp, &self.path).map_err(storage_err)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set_many(&mut self, entries: &[(&str, String)]) -> Result<(), TimeClockError> {
        let mut next = self.entries.clone();
        for (key, value) in entries {
            next.insert((*key).to_string(), value.clone());
        }
        self.flush(&next)?;
        self.entries = next;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), TimeClockError> {
        if !self.entries.contains_key(key) {
            return Ok(());
        }
        let mut next = self.entries.clone();
        next.remove(key);
        self.flush(&next)?;
        self.entries = next;
        Ok(())
    }
}
