use crate::error::ValidationError;
use crate::models::{Category, SelectedChannel};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

pub const EXPORT_APP_VERSION: &str = "1.0.0";

/// Outcome of adding channels to a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AddChannelsReport {
    pub added: usize,
    pub already_present: usize,
}

impl AddChannelsReport {
    pub fn message(&self) -> String {
        match (self.added, self.already_present) {
            (0, _) => "All selected channels are already in this category".to_string(),
            (added, 0) => format!("Added {} channels", added),
            (added, present) => format!("Added {} channels ({} already present)", added, present),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct MergeReport {
    #[serde(rename = "newCategoriesCount", default)]
    pub new_categories: usize,
    #[serde(rename = "updatedCategoriesCount", default)]
    pub updated_categories: usize,
}

impl MergeReport {
    pub fn message(&self) -> String {
        format!(
            "Merged: {} new categories, {} categories updated",
            self.new_categories, self.updated_categories
        )
    }
}

/// File format of an exported category list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryExport {
    #[serde(rename = "channelCategories")]
    pub channel_categories: Vec<Category>,
    #[serde(rename = "exportDate")]
    pub export_date: DateTime<Utc>,
    #[serde(rename = "appVersion")]
    pub app_version: String,
}

impl CategoryExport {
    pub fn file_name(&self) -> String {
        format!(
            "youtube-shorts-channels-{}.json",
            self.export_date.format("%Y-%m-%d")
        )
    }
}

/// Reads the `channelCategories` array out of an export file.
pub fn parse_import(raw: &str) -> Result<Vec<Category>, ValidationError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| ValidationError::InvalidImport(e.to_string()))?;
    let list = value
        .get("channelCategories")
        .filter(|v| v.is_array())
        .cloned()
        .ok_or_else(|| {
            ValidationError::InvalidImport("missing channelCategories list".to_string())
        })?;
    let categories: Vec<Category> =
        serde_json::from_value(list).map_err(|e| ValidationError::InvalidImport(e.to_string()))?;
    CategoryBook::checked(categories).map(CategoryBook::into_categories)
}

/// Category list with the invariants the UI relies on: unique names and
/// unique channel ids within a category.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CategoryBook {
    categories: Vec<Category>,
}

impl CategoryBook {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    /// Builds a book from untrusted input. Names must be unique ignoring
    /// case; repeated channel ids keep their first occurrence.
    pub fn checked(categories: Vec<Category>) -> Result<Self, ValidationError> {
        let mut book = Self::default();
        for mut category in categories {
            category.name = book.check_new_name(&category.name)?;
            let mut seen = HashSet::new();
            category.channels.retain(|c| seen.insert(c.id.clone()));
            book.categories.push(category);
        }
        Ok(book)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn into_categories(self) -> Vec<Category> {
        self.categories
    }

    pub fn find(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Trimmed name, or why it cannot be used.
    pub fn check_new_name(&self, name: &str) -> Result<String, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::Required {
                field: "Category name",
            });
        }
        if self.name_taken(name) {
            return Err(ValidationError::DuplicateName(name.to_string()));
        }
        Ok(name.to_string())
    }

    fn name_taken(&self, name: &str) -> bool {
        self.categories
            .iter()
            .any(|c| c.name.trim().eq_ignore_ascii_case(name))
    }

    pub fn create(
        &mut self,
        name: &str,
        description: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Category, ValidationError> {
        let name = self.check_new_name(name)?;
        let category = Category {
            id: self.next_id(now),
            name,
            description: description.filter(|d| !d.trim().is_empty()),
            created_at: now,
            channels: Vec::new(),
        };
        self.categories.push(category.clone());
        Ok(category)
    }

    fn next_id(&self, now: DateTime<Utc>) -> String {
        let mut millis = now.timestamp_millis();
        loop {
            let id = format!("cat_{}", millis);
            if self.find(&id).is_none() {
                return id;
            }
            millis += 1;
        }
    }

    /// Adds a category received from the backend.
    pub fn push(&mut self, category: Category) {
        self.categories.push(category);
    }

    pub fn delete(&mut self, id: &str) -> Option<Category> {
        let index = self.categories.iter().position(|c| c.id == id)?;
        Some(self.categories.remove(index))
    }

    /// Channels from `channels` the category does not contain yet, deduplicated.
    pub fn missing_channels(
        &self,
        id: &str,
        channels: &[SelectedChannel],
    ) -> Option<(Vec<SelectedChannel>, AddChannelsReport)> {
        let category = self.find(id)?;
        let mut seen: HashSet<&str> = category.channels.iter().map(|c| c.id.as_str()).collect();
        let mut fresh = Vec::new();
        let mut report = AddChannelsReport::default();
        for channel in channels {
            if seen.insert(channel.id.as_str()) {
                fresh.push(channel.clone());
                report.added += 1;
            } else {
                report.already_present += 1;
            }
        }
        Some((fresh, report))
    }

    pub fn add_channels(
        &mut self,
        id: &str,
        channels: &[SelectedChannel],
    ) -> Option<AddChannelsReport> {
        let (fresh, report) = self.missing_channels(id, channels)?;
        let category = self.categories.iter_mut().find(|c| c.id == id)?;
        category.channels.extend(fresh);
        Some(report)
    }

    pub fn remove_channel(&mut self, id: &str, channel_id: &str) -> bool {
        match self.categories.iter_mut().find(|c| c.id == id) {
            Some(category) if category.has_channel(channel_id) => {
                category.channels.retain(|c| c.id != channel_id);
                true
            }
            _ => false,
        }
    }

    pub fn replace_all(&mut self, categories: Vec<Category>) {
        self.categories = categories;
    }

    /// Appends unknown categories and unions the channel lists of known ones.
    /// A category is known when its id or its name matches.
    pub fn merge(&mut self, incoming: Vec<Category>) -> MergeReport {
        let mut report = MergeReport::default();
        for category in incoming {
            let existing = self.categories.iter().position(|c| {
                c.id == category.id || c.name.trim().eq_ignore_ascii_case(category.name.trim())
            });
            match existing {
                Some(index) => {
                    let id = self.categories[index].id.clone();
                    let added = self
                        .add_channels(&id, &category.channels)
                        .map(|r| r.added)
                        .unwrap_or(0);
                    if added > 0 {
                        report.updated_categories += 1;
                    }
                }
                None => {
                    let mut category = category;
                    let mut seen = HashSet::new();
                    category.channels.retain(|c| seen.insert(c.id.clone()));
                    self.categories.push(category);
                    report.new_categories += 1;
                }
            }
        }
        report
    }

    pub fn export(&self, now: DateTime<Utc>) -> CategoryExport {
        CategoryExport {
            channel_categories: self.categories.clone(),
            export_date: now,
            app_version: EXPORT_APP_VERSION.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::channel;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
    }

    fn category(id: &str, name: &str, channels: &[&str]) -> Category {
        Category {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            created_at: now(),
            channels: channels.iter().map(|c| channel(c)).collect(),
        }
    }

    #[test]
    fn test_create_rejects_blank_and_duplicate_names() {
        let mut book = CategoryBook::default();
        assert_eq!(
            book.create("   ", None, now()),
            Err(ValidationError::Required {
                field: "Category name"
            })
        );

        let created = book.create(" Cooking ", Some(String::new()), now()).unwrap();
        assert_eq!(created.name, "Cooking");
        assert_eq!(created.description, None);

        assert_eq!(
            book.create("cooking", None, now()),
            Err(ValidationError::DuplicateName("cooking".to_string()))
        );
        assert_eq!(book.categories().len(), 1);
    }

    #[test]
    fn test_created_ids_are_unique() {
        let mut book = CategoryBook::default();
        let a = book.create("A", None, now()).unwrap();
        let b = book.create("B", None, now()).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_add_channels_reports_duplicates() {
        let mut book = CategoryBook::new(vec![category("c1", "Food", &["a", "b"])]);
        let report = book
            .add_channels("c1", &[channel("b"), channel("c"), channel("c")])
            .unwrap();
        assert_eq!(
            report,
            AddChannelsReport {
                added: 1,
                already_present: 2
            }
        );
        let ids: Vec<_> = book.find("c1").unwrap().channels.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert!(book.add_channels("missing", &[channel("x")]).is_none());
    }

    #[test]
    fn test_remove_channel_and_delete() {
        let mut book = CategoryBook::new(vec![category("c1", "Food", &["a", "b"])]);
        assert!(book.remove_channel("c1", "a"));
        assert!(!book.remove_channel("c1", "a"));
        assert_eq!(book.delete("c1").map(|c| c.name), Some("Food".to_string()));
        assert!(book.is_empty());
    }

    #[test]
    fn test_merge_counts_new_and_updated() {
        let mut book = CategoryBook::new(vec![
            category("c1", "Food", &["a"]),
            category("c2", "Travel", &["t"]),
        ]);
        let report = book.merge(vec![
            category("other-id", "food", &["a", "b"]),
            category("c2", "Travel", &["t"]),
            category("c3", "Music", &["m", "m"]),
        ]);
        assert_eq!(
            report,
            MergeReport {
                new_categories: 1,
                updated_categories: 1
            }
        );
        assert_eq!(book.find("c1").unwrap().channels.len(), 2);
        assert_eq!(book.find("c3").unwrap().channels.len(), 1);
        assert_eq!(book.categories().len(), 3);
    }

    #[test]
    fn test_export_document_shape() {
        let book = CategoryBook::new(vec![category("c1", "Food", &["a"])]);
        let export = book.export(now());
        let json = serde_json::to_value(&export).unwrap();
        assert!(json["channelCategories"].is_array());
        assert_eq!(json["appVersion"], "1.0.0");
        assert_eq!(export.file_name(), "youtube-shorts-channels-2024-05-01.json");
    }

    #[test]
    fn test_import_round_trip() {
        let book = CategoryBook::new(vec![category("c1", "Food", &["a", "b"])]);
        let raw = serde_json::to_string(&book.export(now())).unwrap();
        let parsed = parse_import(&raw).unwrap();
        assert_eq!(parsed, book.categories().to_vec());
    }

    #[test]
    fn test_import_rejects_names_differing_only_by_case() {
        let raw = serde_json::to_string(&CategoryExport {
            channel_categories: vec![category("a", "Food", &["x"]), category("b", " food", &[])],
            export_date: now(),
            app_version: EXPORT_APP_VERSION.to_string(),
        })
        .unwrap();
        assert_eq!(
            parse_import(&raw),
            Err(ValidationError::DuplicateName("food".to_string()))
        );
    }

    #[test]
    fn test_import_dedups_channels_keeping_first() {
        let raw = serde_json::to_string(&CategoryExport {
            channel_categories: vec![category("a", "Food", &["c2", "c1", "c2", "c1"])],
            export_date: now(),
            app_version: EXPORT_APP_VERSION.to_string(),
        })
        .unwrap();
        let parsed = parse_import(&raw).unwrap();
        let ids: Vec<_> = parsed[0].channels.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c2", "c1"]);
    }

    #[test]
    fn test_import_rejects_other_documents() {
        assert!(matches!(
            parse_import(r#"{"categories":[]}"#),
            Err(ValidationError::InvalidImport(_))
        ));
        assert!(matches!(
            parse_import(r#"{"channelCategories":{}}"#),
            Err(ValidationError::InvalidImport(_))
        ));
        assert!(matches!(parse_import("not json"), Err(ValidationError::InvalidImport(_))));
    }
}
