//! JSON-file backing store.
//!
//! One file per preference domain, e.g. `~/.config/prefkit/com.example.app.json`.
//! The whole domain is held in memory and rewritten atomically (temp file,
//! fsync, rename) on every write when `autosave` is on.
//!
//! File layout:
//! ```json
//! { "version": 1, "values": { "feature.enabled": { "bool": true } } }
//! ```

use log::{debug, warn};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use prefkit_core::{GetterProvider, SetterProvider, Value};

use crate::config::StoreConfig;
use crate::error::StoreError;

/// Current on-disk format version.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Deserialize)]
struct StoreFile {
    version: u32,
    #[serde(default)]
    values: BTreeMap<String, Value>,
}

#[derive(Serialize)]
struct StoreFileRef<'a> {
    version: u32,
    values: &'a BTreeMap<String, Value>,
}

/// Persistent key-value store backed by a single JSON file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    autosave: bool,
    values: RwLock<BTreeMap<String, Value>>,
    dirty: AtomicBool,
}

impl FileStore {
    /// Open the store at `path`, failing if the file exists but cannot be
    /// read or parsed. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let values = read_values(&path)?;
        debug!("opened preferences {} ({} keys)", path.display(), values.len());
        Ok(Self::with_values(path, true, values))
    }

    /// Open the store at `path`, treating an unreadable or corrupt file as
    /// empty. The bad file is left in place until the next write replaces it.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        Self::load_with(path.into(), true)
    }

    /// Lenient load of the store described by `config`.
    pub fn from_config(config: &StoreConfig) -> Self {
        Self::load_with(config.path(), config.autosave)
    }

    /// Strict open of the store described by `config`.
    pub fn open_config(config: &StoreConfig) -> Result<Self, StoreError> {
        config.validate()?;
        let path = config.path();
        let values = read_values(&path)?;
        Ok(Self::with_values(path, config.autosave, values))
    }

    fn load_with(path: PathBuf, autosave: bool) -> Self {
        let values = match read_values(&path) {
            Ok(values) => values,
            Err(e) => {
                warn!("ignoring preferences {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };
        Self::with_values(path, autosave, values)
    }

    fn with_values(path: PathBuf, autosave: bool, values: BTreeMap<String, Value>) -> Self {
        Self {
            path,
            autosave,
            values: RwLock::new(values),
            dirty: AtomicBool::new(false),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn autosave(&self) -> bool {
        self.autosave
    }

    /// Stored keys in sorted order.
    pub fn keys(&self) -> Vec<String> {
        self.values.read().keys().cloned().collect()
    }

    /// Snapshot of every entry in key order.
    pub fn entries(&self) -> Vec<(String, Value)> {
        self.values
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }

    /// True when there are writes not yet persisted (only with autosave off,
    /// or after a failed autosave).
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    /// Write the current contents to disk. Holds the write lock so saves
    /// never share the temp file.
    pub fn flush(&self) -> Result<(), StoreError> {
        let values = self.values.write();
        write_values(&self.path, &values)?;
        self.dirty.store(false, Ordering::Release);
        debug!("flushed preferences {} ({} keys)", self.path.display(), values.len());
        Ok(())
    }

    /// Replace the in-memory contents with what is on disk, discarding
    /// unsaved writes.
    pub fn reload(&self) -> Result<(), StoreError> {
        let fresh = read_values(&self.path)?;
        *self.values.write() = fresh;
        self.dirty.store(false, Ordering::Release);
        Ok(())
    }

    /// Persist after a mutation. Called with the write lock held so file
    /// contents follow the same order as in-memory writes.
    fn persist(&self, values: &BTreeMap<String, Value>) {
        if !self.autosave {
            self.dirty.store(true, Ordering::Release);
            return;
        }
        match write_values(&self.path, values) {
            Ok(()) => self.dirty.store(false, Ordering::Release),
            Err(e) => {
                self.dirty.store(true, Ordering::Release);
                warn!("could not save preferences {}: {}", self.path.display(), e);
            }
        }
    }
}

impl GetterProvider for FileStore {
    fn value(&self, key: &str) -> Option<Value> {
        self.values.read().get(key).cloned()
    }
}

impl SetterProvider for FileStore {
    fn set(&self, value: Option<Value>, key: &str) {
        let mut values = self.values.write();
        let changed = match value {
            Some(value) => {
                values.insert(key.to_string(), value);
                true
            }
            None => values.remove(key).is_some(),
        };
        if changed {
            self.persist(&values);
        }
    }
}

impl Drop for FileStore {
    fn drop(&mut self) {
        // Best-effort save of writes made with autosave off
        if self.is_dirty() {
            if let Err(e) = self.flush() {
                warn!("could not save preferences {}: {}", self.path.display(), e);
            }
        }
    }
}

/// The process-wide store for the default domain, created on first use from
/// [`StoreConfig::default`].
pub fn standard() -> Arc<FileStore> {
    static STANDARD: OnceLock<Arc<FileStore>> = OnceLock::new();
    STANDARD
        .get_or_init(|| Arc::new(FileStore::from_config(&StoreConfig::default())))
        .clone()
}

fn read_values(path: &Path) -> Result<BTreeMap<String, Value>, StoreError> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let contents = fs::read_to_string(path).map_err(|e| StoreError::Io(e.to_string()))?;
    if contents.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    let file: StoreFile =
        serde_json::from_str(&contents).map_err(|e| StoreError::Parse(e.to_string()))?;
    if file.version > FORMAT_VERSION {
        return Err(StoreError::Parse(format!(
            "unsupported format version {} (expected at most {})",
            file.version, FORMAT_VERSION
        )));
    }
    Ok(file.values)
}

fn write_values(path: &Path, values: &BTreeMap<String, Value>) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| StoreError::Io(e.to_string()))?;
    }

    let json = serde_json::to_string_pretty(&StoreFileRef {
        version: FORMAT_VERSION,
        values,
    })
    .map_err(|e| StoreError::Encode(e.to_string()))?;

    let temp_path = temp_path(path);
    {
        let mut file = fs::File::create(&temp_path).map_err(|e| StoreError::Io(e.to_string()))?;
        file.write_all(json.as_bytes())
            .map_err(|e| StoreError::Io(e.to_string()))?;
        file.sync_all().map_err(|e| StoreError::Io(e.to_string()))?;
    }

    fs::rename(&temp_path, path).map_err(|e| StoreError::Io(e.to_string()))
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}
