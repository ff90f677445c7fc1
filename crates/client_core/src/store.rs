//! Persistent name/value strings with optional expiry, in the spirit of
//! browser cookies.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::StoreError;

pub trait KeyValueStore {
    fn get(&self, name: &str) -> Option<String>;
    /// `ttl = None` keeps the value for the life of the store.
    fn set(&mut self, name: &str, value: &str, ttl: Option<Duration>) -> Result<(), StoreError>;
    fn remove(&mut self, name: &str) -> Result<(), StoreError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, name: &str) -> Option<String> {
        (**self).get(name)
    }

    fn set(&mut self, name: &str, value: &str, ttl: Option<Duration>) -> Result<(), StoreError> {
        (**self).set(name, value, ttl)
    }

    fn remove(&mut self, name: &str) -> Result<(), StoreError> {
        (**self).remove(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredValue {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl StoredValue {
    fn new(value: &str, ttl: Option<Duration>, now: DateTime<Utc>) -> Self {
        Self {
            value: value.to_string(),
            expires_at: ttl.map(|ttl| now + ttl),
        }
    }

    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map_or(true, |expires_at| expires_at > now)
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, StoredValue>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads `name=value` pairs from a `Cookie`-style header. Pairs without
    /// `=` are skipped and the first occurrence of a repeated name wins.
    pub fn from_cookie_header(header: &str) -> Self {
        let mut entries = BTreeMap::new();
        for (name, value) in header
            .split(';')
            .filter_map(|pair| pair.trim_start().split_once('='))
        {
            entries
                .entry(name.to_string())
                .or_insert_with(|| StoredValue {
                    value: value.to_string(),
                    expires_at: None,
                });
        }
        Self { entries }
    }

    pub fn get_at(&self, name: &str, now: DateTime<Utc>) -> Option<String> {
        self.entries
            .get(name)
            .filter(|entry| entry.is_live_at(now))
            .map(|entry| entry.value.clone())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, name: &str) -> Option<String> {
        self.get_at(name, Utc::now())
    }

    fn set(&mut self, name: &str, value: &str, ttl: Option<Duration>) -> Result<(), StoreError> {
        self.entries
            .insert(name.to_string(), StoredValue::new(value, ttl, Utc::now()));
        Ok(())
    }

    fn remove(&mut self, name: &str) -> Result<(), StoreError> {
        self.entries.remove(name);
        Ok(())
    }
}

/// A store that rewrites a JSON file on every change.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, StoredValue>,
}

impl FileStore {
    /// Opens `path`, starting empty if the file does not exist yet. Expired
    /// entries are dropped on load.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let mut entries: BTreeMap<String, StoredValue> = match fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(io_error(&path, source)),
        };
        let now = Utc::now();
        entries.retain(|_, entry| entry.is_live_at(now));
        debug!(path = %path.display(), entries = entries.len(), "opened state file");
        Ok(Self { path, entries })
    }

    fn flush(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| io_error(parent, source))?;
        }
        let raw = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, raw).map_err(|source| io_error(&self.path, source))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, name: &str) -> Option<String> {
        self.entries
            .get(name)
            .filter(|entry| entry.is_live_at(Utc::now()))
            .map(|entry| entry.value.clone())
    }

    fn set(&mut self, name: &str, value: &str, ttl: Option<Duration>) -> Result<(), StoreError> {
        self.entries
            .insert(name.to_string(), StoredValue::new(value, ttl, Utc::now()));
        self.flush()
    }

    fn remove(&mut self, name: &str) -> Result<(), StoreError> {
        if self.entries.remove(name).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.display().to_string(),
        source,
    }
}
