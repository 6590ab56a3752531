//! One-time push of locally saved data to the backend.
//!
//! Runs at startup in remote mode. The completion flag is written only after
//! every step succeeded, so an interrupted run is retried on the next start.

use crate::categories::book::MergeReport;
use crate::categories::manager::CategoryBackend;
use crate::error::StoreError;
use crate::models::Category;
use crate::search::form::SearchForm;
use crate::search::history::SearchHistoryEntry;
use crate::storage::preferences::SnapshotBackend;
use crate::storage::{
    read_json, write_json, KeyValueStore, CHANNEL_CATEGORIES_KEY, MIGRATION_DONE_KEY,
    SEARCH_HISTORY_KEY, SEARCH_PREFS_KEY,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct MigrationFlag {
    completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MigrationReport {
    pub preferences: bool,
    pub history_entries: usize,
    pub categories: Option<MergeReport>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MigrationOutcome {
    AlreadyDone,
    Completed(MigrationReport),
}

pub fn is_migrated<S: KeyValueStore + ?Sized>(store: &S) -> bool {
    store.get_item(MIGRATION_DONE_KEY).is_some()
}

pub async fn migrate_local_data<S: KeyValueStore + ?Sized>(
    store: &S,
    snapshots: &dyn SnapshotBackend,
    categories: &dyn CategoryBackend,
    now: DateTime<Utc>,
) -> Result<MigrationOutcome, StoreError> {
    if is_migrated(store) {
        return Ok(MigrationOutcome::AlreadyDone);
    }

    let mut report = MigrationReport::default();

    if let Some(form) = read_json::<SearchForm, S>(store, SEARCH_PREFS_KEY) {
        snapshots.save_preferences(&form).await?;
        report.preferences = true;
    }

    let mut history: Vec<SearchHistoryEntry> =
        read_json(store, SEARCH_HISTORY_KEY).unwrap_or_default();
    history.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
    for entry in &history {
        snapshots.append_history(entry).await?;
    }
    report.history_entries = history.len();

    let local_categories: Vec<Category> =
        read_json(store, CHANNEL_CATEGORIES_KEY).unwrap_or_default();
    if !local_categories.is_empty() {
        report.categories = Some(categories.merge(&local_categories).await?);
    }

    write_json(store, MIGRATION_DONE_KEY, &MigrationFlag { completed_at: now })?;
    log::info!(
        "Moved local data to the server: preferences={}, history={}, categories={}",
        report.preferences,
        report.history_entries,
        local_categories.len()
    );
    Ok(MigrationOutcome::Completed(report))
}
