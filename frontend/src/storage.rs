//! Client-side persistence.
//!
//! [`KeyValueStore`] abstracts `window.localStorage`; [`preferences`] builds the
//! local and remote snapshot backends on top of it and [`migration`] moves
//! local data to the backend once.

pub mod api;
pub mod migration;
pub mod preferences;

use crate::error::StoreError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use web_sys::window;

pub const CHANNEL_CATEGORIES_KEY: &str = "youtubeShortChannelCategories";
pub const SEARCH_PREFS_KEY: &str = "youtubeShortSearchPrefs";
pub const SEARCH_HISTORY_KEY: &str = "youtubeShortSearchHistory";
pub const THEME_JSON_KEY: &str = "app.theme.json";
pub const THEME_MODE_KEY: &str = "app.theme.mode";
pub const MIGRATION_DONE_KEY: &str = "youtubeShortMigrationCompleted";

pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove_item(&self, key: &str);
}

/// `window.localStorage`.
#[derive(Clone)]
pub struct BrowserStorage {
    storage: web_sys::Storage,
}

impl BrowserStorage {
    pub fn open() -> Option<Self> {
        let storage = window()?.local_storage().ok()??;
        Some(Self { storage })
    }
}

impl KeyValueStore for BrowserStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage
            .set_item(key, value)
            .map_err(|_| StoreError::Unavailable(format!("failed to write '{key}'")))
    }

    fn remove_item(&self, key: &str) {
        if self.storage.remove_item(key).is_err() {
            log::warn!("Failed to remove '{}' from local storage", key);
        }
    }
}

/// Volatile store used when `localStorage` is blocked.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    items: Rc<RefCell<HashMap<String, String>>>,
}

impl KeyValueStore for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) {
        self.items.borrow_mut().remove(key);
    }
}

/// Either backing store, chosen once at startup.
#[derive(Clone)]
pub enum DeviceStorage {
    Browser(BrowserStorage),
    Memory(MemoryStorage),
}

impl DeviceStorage {
    pub fn detect() -> Self {
        match BrowserStorage::open() {
            Some(storage) => DeviceStorage::Browser(storage),
            None => {
                log::warn!("localStorage is unavailable, settings will not survive a reload");
                DeviceStorage::Memory(MemoryStorage::default())
            }
        }
    }
}

impl KeyValueStore for DeviceStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        match self {
            DeviceStorage::Browser(s) => s.get_item(key),
            DeviceStorage::Memory(s) => s.get_item(key),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        match self {
            DeviceStorage::Browser(s) => s.set_item(key, value),
            DeviceStorage::Memory(s) => s.set_item(key, value),
        }
    }

    fn remove_item(&self, key: &str) {
        match self {
            DeviceStorage::Browser(s) => s.remove_item(key),
            DeviceStorage::Memory(s) => s.remove_item(key),
        }
    }
}

/// Reads a JSON value; a corrupt entry is logged, discarded and reported as absent.
pub fn read_json<T, S>(store: &S, key: &str) -> Option<T>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let raw = store.get_item(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            log::error!("Discarding corrupt '{}' entry: {}", key, e);
            store.remove_item(key);
            None
        }
    }
}

pub fn write_json<T, S>(store: &S, key: &str, value: &T) -> Result<(), StoreError>
where
    T: Serialize,
    S: KeyValueStore + ?Sized,
{
    let raw = serde_json::to_string(value).map_err(|e| StoreError::Serialize {
        key: key.to_string(),
        reason: e.to_string(),
    })?;
    store.set_item(key, &raw)
}
