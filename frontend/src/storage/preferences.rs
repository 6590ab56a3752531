//! Where the search form and the search history live between visits.
//!
//! Both deployment strategies implement [`SnapshotBackend`]: [`LocalSnapshots`]
//! keeps everything in a [`KeyValueStore`], [`RemoteSnapshots`] goes through
//! `/api/search/*`. The rest of the app only sees `Rc<dyn SnapshotBackend>`.

use crate::config::{PersistenceMode, MAX_HISTORY_ENTRIES};
use crate::dialogs::Confirm;
use crate::error::StoreError;
use crate::search::form::SearchForm;
use crate::search::history::{SearchHistory, SearchHistoryEntry};
use crate::storage::{
    api, read_json, write_json, DeviceStorage, KeyValueStore, SEARCH_HISTORY_KEY,
    SEARCH_PREFS_KEY,
};
use async_trait::async_trait;
use std::rc::Rc;

#[async_trait(?Send)]
pub trait SnapshotBackend {
    async fn load_preferences(&self) -> Result<Option<SearchForm>, StoreError>;
    async fn save_preferences(&self, form: &SearchForm) -> Result<(), StoreError>;
    async fn load_history(&self) -> Result<Vec<SearchHistoryEntry>, StoreError>;
    async fn append_history(&self, entry: &SearchHistoryEntry) -> Result<(), StoreError>;
    async fn clear_history(&self) -> Result<(), StoreError>;
}

pub struct LocalSnapshots<S> {
    store: S,
}

impl<S: KeyValueStore> LocalSnapshots<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

#[async_trait(?Send)]
impl<S: KeyValueStore> SnapshotBackend for LocalSnapshots<S> {
    async fn load_preferences(&self) -> Result<Option<SearchForm>, StoreError> {
        Ok(read_json(&self.store, SEARCH_PREFS_KEY))
    }

    async fn save_preferences(&self, form: &SearchForm) -> Result<(), StoreError> {
        write_json(&self.store, SEARCH_PREFS_KEY, form)
    }

    async fn load_history(&self) -> Result<Vec<SearchHistoryEntry>, StoreError> {
        Ok(read_json(&self.store, SEARCH_HISTORY_KEY).unwrap_or_default())
    }

    async fn append_history(&self, entry: &SearchHistoryEntry) -> Result<(), StoreError> {
        let stored = read_json(&self.store, SEARCH_HISTORY_KEY).unwrap_or_default();
        let mut history = SearchHistory::from_entries(stored, MAX_HISTORY_ENTRIES);
        history.insert(entry.clone());
        write_json(&self.store, SEARCH_HISTORY_KEY, &history.entries())
    }

    async fn clear_history(&self) -> Result<(), StoreError> {
        self.store.remove_item(SEARCH_HISTORY_KEY);
        Ok(())
    }
}

/// Server-side snapshots.
pub struct RemoteSnapshots;

#[async_trait(?Send)]
impl SnapshotBackend for RemoteSnapshots {
    async fn load_preferences(&self) -> Result<Option<SearchForm>, StoreError> {
        Ok(api::fetch_preferences().await?)
    }

    async fn save_preferences(&self, form: &SearchForm) -> Result<(), StoreError> {
        Ok(api::save_preferences(form).await?)
    }

    async fn load_history(&self) -> Result<Vec<SearchHistoryEntry>, StoreError> {
        Ok(api::fetch_history().await?)
    }

    async fn append_history(&self, entry: &SearchHistoryEntry) -> Result<(), StoreError> {
        Ok(api::append_history(entry).await?)
    }

    async fn clear_history(&self) -> Result<(), StoreError> {
        Ok(api::clear_history().await?)
    }
}

pub fn snapshot_backend(mode: PersistenceMode, storage: DeviceStorage) -> Rc<dyn SnapshotBackend> {
    match mode {
        PersistenceMode::Local => Rc::new(LocalSnapshots::new(storage)),
        PersistenceMode::Remote => Rc::new(RemoteSnapshots),
    }
}

/// Saved search form values.
#[derive(Clone)]
pub struct PreferenceStore {
    backend: Rc<dyn SnapshotBackend>,
}

impl PartialEq for PreferenceStore {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.backend, &other.backend)
    }
}

impl PreferenceStore {
    pub fn new(backend: Rc<dyn SnapshotBackend>) -> Self {
        Self { backend }
    }

    /// Saved form values, or the defaults when nothing usable is stored.
    pub async fn load_form(&self) -> SearchForm {
        match self.backend.load_preferences().await {
            Ok(Some(form)) => {
                log::info!("Restored saved search settings");
                form
            }
            Ok(None) => SearchForm::default(),
            Err(e) => {
                log::warn!("Could not load search settings: {}", e);
                SearchForm::default()
            }
        }
    }

    pub async fn save_form(&self, form: &SearchForm) -> Result<(), StoreError> {
        self.backend.save_preferences(form).await?;
        log::debug!("Search settings saved");
        Ok(())
    }

    /// Overwrites the saved settings with the defaults if the user agrees.
    pub async fn reset(&self, confirm: &dyn Confirm) -> Result<Option<SearchForm>, StoreError> {
        if !confirm.confirm("Reset all saved search settings?") {
            return Ok(None);
        }
        let defaults = SearchForm::default();
        self.backend.save_preferences(&defaults).await?;
        Ok(Some(defaults))
    }
}
