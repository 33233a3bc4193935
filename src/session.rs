//! Viewer location session
//!
//! Holds the active location and remembers the last valid ZIP through a
//! [`LocationStore`], so the next run starts from it.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

use crate::error::{LocationError, StoreError};
use crate::location::LocationKey;

/// Single-slot persistence for the last ZIP code
pub trait LocationStore {
    fn load(&self) -> Result<Option<String>, StoreError>;
    fn save(&self, zip: &str) -> Result<(), StoreError>;
}

/// On-disk layout of the state file
#[derive(Debug, Default, Serialize, Deserialize)]
struct SavedLocation {
    #[serde(rename = "zipCode", default)]
    zip_code: Option<String>,
}

/// JSON file store (`{"zipCode": "90210"}`)
#[derive(Debug, Clone)]
pub struct FileLocationStore {
    path: PathBuf,
}

impl FileLocationStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LocationStore for FileLocationStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let saved: SavedLocation = serde_json::from_str(&raw)?;
        Ok(saved.zip_code)
    }

    fn save(&self, zip: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let body = serde_json::to_string_pretty(&SavedLocation {
            zip_code: Some(zip.to_string()),
        })?;
        fs::write(&self.path, body)?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryLocationStore {
    slot: Mutex<Option<String>>,
}

impl MemoryLocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_zip(zip: &str) -> Self {
        Self {
            slot: Mutex::new(Some(zip.to_string())),
        }
    }
}

impl LocationStore for MemoryLocationStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        Ok(self.slot.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn save(&self, zip: &str) -> Result<(), StoreError> {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = Some(zip.to_string());
        Ok(())
    }
}

pub struct LocationSession<S: LocationStore> {
    store: S,
    current: Option<LocationKey>,
}

impl<S: LocationStore> LocationSession<S> {
    /// Restore the last saved ZIP. Unreadable or invalid state starts empty.
    pub fn load(store: S) -> Self {
        let current = match store.load() {
            Ok(Some(raw)) => match LocationKey::parse_zip(&raw) {
                Ok(key) => Some(key),
                Err(e) => {
                    warn!("ignoring saved location: {}", e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!("failed to load saved location: {}", e);
                None
            }
        };
        debug!(location = ?current, "location session loaded");
        Self { store, current }
    }

    pub fn current(&self) -> Option<&LocationKey> {
        self.current.as_ref()
    }

    /// Validate and switch to a new ZIP. Invalid input leaves both the
    /// session and the store untouched. Saving is best-effort.
    pub fn update(&mut self, candidate: &str) -> Result<&LocationKey, LocationError> {
        let key = LocationKey::from_input(Some(candidate))?;
        if let Err(e) = self.store.save(key.as_str()) {
            warn!("failed to save location {}: {}", key, e);
        }
        Ok(&*self.current.insert(key))
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
