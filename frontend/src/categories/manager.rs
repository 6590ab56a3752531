use crate::categories::api;
use crate::categories::book::{parse_import, AddChannelsReport, CategoryBook, MergeReport};
use crate::config::PersistenceMode;
use crate::dialogs::Confirm;
use crate::error::StoreError;
use crate::models::{Category, SelectedChannel};
use crate::storage::{read_json, write_json, DeviceStorage, KeyValueStore, CHANNEL_CATEGORIES_KEY};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::rc::Rc;

#[async_trait(?Send)]
pub trait CategoryBackend {
    async fn list(&self) -> Result<Vec<Category>, StoreError>;
    async fn create(&self, name: &str, description: Option<&str>) -> Result<Category, StoreError>;
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
    async fn add_channels(&self, id: &str, channels: &[SelectedChannel]) -> Result<(), StoreError>;
    async fn remove_channel(&self, id: &str, channel_id: &str) -> Result<(), StoreError>;
    async fn import(&self, categories: &[Category]) -> Result<(), StoreError>;
    async fn merge(&self, categories: &[Category]) -> Result<MergeReport, StoreError>;
}

/// Categories kept in a [`KeyValueStore`] under one JSON list.
pub struct LocalCategories<S> {
    store: S,
}

impl<S: KeyValueStore> LocalCategories<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn book(&self) -> CategoryBook {
        CategoryBook::new(read_json(&self.store, CHANNEL_CATEGORIES_KEY).unwrap_or_default())
    }

    fn save(&self, book: &CategoryBook) -> Result<(), StoreError> {
        write_json(&self.store, CHANNEL_CATEGORIES_KEY, &book.categories())
    }
}

#[async_trait(?Send)]
impl<S: KeyValueStore> CategoryBackend for LocalCategories<S> {
    async fn list(&self) -> Result<Vec<Category>, StoreError> {
        Ok(self.book().into_categories())
    }

    async fn create(&self, name: &str, description: Option<&str>) -> Result<Category, StoreError> {
        let mut book = self.book();
        let category = book.create(name, description.map(str::to_string), Utc::now())?;
        self.save(&book)?;
        Ok(category)
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut book = self.book();
        if book.delete(id).is_some() {
            self.save(&book)?;
        }
        Ok(())
    }

    async fn add_channels(&self, id: &str, channels: &[SelectedChannel]) -> Result<(), StoreError> {
        let mut book = self.book();
        if book.add_channels(id, channels).is_some() {
            self.save(&book)?;
        }
        Ok(())
    }

    async fn remove_channel(&self, id: &str, channel_id: &str) -> Result<(), StoreError> {
        let mut book = self.book();
        if book.remove_channel(id, channel_id) {
            self.save(&book)?;
        }
        Ok(())
    }

    async fn import(&self, categories: &[Category]) -> Result<(), StoreError> {
        self.save(&CategoryBook::checked(categories.to_vec())?)
    }

    async fn merge(&self, categories: &[Category]) -> Result<MergeReport, StoreError> {
        let mut book = self.book();
        let report = book.merge(categories.to_vec());
        self.save(&book)?;
        Ok(report)
    }
}

/// `/api/categories` endpoints.
pub struct RemoteCategories;

#[async_trait(?Send)]
impl CategoryBackend for RemoteCategories {
    async fn list(&self) -> Result<Vec<Category>, StoreError> {
        Ok(api::list_categories().await?)
    }

    async fn create(&self, name: &str, description: Option<&str>) -> Result<Category, StoreError> {
        Ok(api::create_category(name, description).await?)
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        Ok(api::delete_category(id).await?)
    }

    async fn add_channels(&self, id: &str, channels: &[SelectedChannel]) -> Result<(), StoreError> {
        Ok(api::add_channels(id, channels).await?)
    }

    async fn remove_channel(&self, id: &str, channel_id: &str) -> Result<(), StoreError> {
        Ok(api::remove_channel(id, channel_id).await?)
    }

    async fn import(&self, categories: &[Category]) -> Result<(), StoreError> {
        Ok(api::import_categories(categories).await?)
    }

    async fn merge(&self, categories: &[Category]) -> Result<MergeReport, StoreError> {
        Ok(api::merge_categories(categories).await?)
    }
}

pub fn category_backend(mode: PersistenceMode, storage: DeviceStorage) -> Rc<dyn CategoryBackend> {
    match mode {
        PersistenceMode::Local => Rc::new(LocalCategories::new(storage)),
        PersistenceMode::Remote => Rc::new(RemoteCategories),
    }
}

/// Validates category edits, asks for confirmation where needed and keeps an
/// in-memory copy in step with the backend.
#[derive(Clone)]
pub struct CategoryManager {
    book: CategoryBook,
    backend: Rc<dyn CategoryBackend>,
}

impl PartialEq for CategoryManager {
    fn eq(&self, other: &Self) -> bool {
        self.book == other.book && Rc::ptr_eq(&self.backend, &other.backend)
    }
}

impl CategoryManager {
    pub fn new(backend: Rc<dyn CategoryBackend>) -> Self {
        Self {
            book: CategoryBook::default(),
            backend,
        }
    }

    pub fn categories(&self) -> &[Category] {
        self.book.categories()
    }

    pub fn find(&self, id: &str) -> Option<&Category> {
        self.book.find(id)
    }

    pub async fn load(&mut self) -> Result<(), StoreError> {
        let categories = self.backend.list().await?;
        log::debug!("Loaded {} categories", categories.len());
        self.book.replace_all(categories);
        Ok(())
    }

    /// Blank and duplicate names are rejected before the backend is called.
    pub async fn create(&mut self, name: &str, description: &str) -> Result<Category, StoreError> {
        let name = self.book.check_new_name(name)?;
        let description = Some(description.trim()).filter(|d| !d.is_empty());
        let category = self.backend.create(&name, description).await?;
        self.book.push(category.clone());
        Ok(category)
    }

    /// Returns the removed category, or `None` if it is unknown or the user backed out.
    pub async fn delete(
        &mut self,
        id: &str,
        confirm: &dyn Confirm,
    ) -> Result<Option<Category>, StoreError> {
        let Some(category) = self.book.find(id) else {
            return Ok(None);
        };
        let prompt = format!(
            "Delete category '{}'? All of its channels will be removed.",
            category.name
        );
        if !confirm.confirm(&prompt) {
            return Ok(None);
        }
        self.backend.delete(id).await?;
        Ok(self.book.delete(id))
    }

    /// Only channels the category lacks are sent; nothing is sent if there are none.
    pub async fn add_channels(
        &mut self,
        id: &str,
        channels: &[SelectedChannel],
    ) -> Result<Option<AddChannelsReport>, StoreError> {
        let Some((fresh, report)) = self.book.missing_channels(id, channels) else {
            return Ok(None);
        };
        if !fresh.is_empty() {
            self.backend.add_channels(id, &fresh).await?;
            self.book.add_channels(id, &fresh);
        }
        Ok(Some(report))
    }

    pub async fn remove_channel(
        &mut self,
        id: &str,
        channel_id: &str,
        confirm: &dyn Confirm,
    ) -> Result<bool, StoreError> {
        let Some(category) = self.book.find(id) else {
            return Ok(false);
        };
        let Some(channel) = category.channels.iter().find(|c| c.id == channel_id) else {
            return Ok(false);
        };
        let prompt = format!("Remove '{}' from '{}'?", channel.title, category.name);
        if !confirm.confirm(&prompt) {
            return Ok(false);
        }
        self.backend.remove_channel(id, channel_id).await?;
        Ok(self.book.remove_channel(id, channel_id))
    }

    /// Replaces every category with the contents of an export file.
    /// Returns the number imported, or `None` if the user backed out.
    pub async fn import(
        &mut self,
        raw: &str,
        confirm: &dyn Confirm,
    ) -> Result<Option<usize>, StoreError> {
        let categories = parse_import(raw)?;
        if !confirm.confirm("Replace all existing categories? This cannot be undone.") {
            return Ok(None);
        }
        self.backend.import(&categories).await?;
        self.load().await?;
        Ok(Some(categories.len()))
    }

    pub async fn merge(&mut self, raw: &str) -> Result<MergeReport, StoreError> {
        let categories = parse_import(raw)?;
        let report = self.backend.merge(&categories).await?;
        self.load().await?;
        Ok(report)
    }

    /// Pretty-printed export document.
    pub fn export(&self, now: DateTime<Utc>) -> Result<(String, String), StoreError> {
        let export = self.book.export(now);
        let json = serde_json::to_string_pretty(&export).map_err(|e| StoreError::Serialize {
            key: CHANNEL_CATEGORIES_KEY.to_string(),
            reason: e.to_string(),
        })?;
        Ok((export.file_name(), json))
    }
}
