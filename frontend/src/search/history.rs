use crate::config::MAX_HISTORY_ENTRIES;
use crate::dialogs::Confirm;
use crate::error::StoreError;
use crate::search::form::SearchForm;
use crate::storage::preferences::SnapshotBackend;
use crate::utils::format_date_time;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use yew::Reducible;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHistoryEntry {
    pub form: SearchForm,
    pub timestamp: DateTime<Utc>,
    pub formatted_date: String,
}

impl SearchHistoryEntry {
    pub fn new(form: SearchForm, timestamp: DateTime<Utc>) -> Self {
        Self {
            formatted_date: format_date_time(&timestamp),
            form,
            timestamp,
        }
    }

    /// Short label for the history list.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if !self.form.keyword.trim().is_empty() {
            parts.push(format!("\"{}\"", self.form.keyword.trim()));
        }
        parts.push(self.form.region_code.clone());
        parts.push(format!("{}+ views", self.form.min_views));
        if !self.form.channels.is_empty() {
            parts.push(format!("{} channels", self.form.channels.len()));
        }
        parts.join(" · ")
    }
}

/// Bounded, newest-first log of past searches.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHistory {
    entries: Vec<SearchHistoryEntry>,
    max_entries: usize,
}

impl Default for SearchHistory {
    fn default() -> Self {
        Self::new(MAX_HISTORY_ENTRIES)
    }
}

impl SearchHistory {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_entries,
        }
    }

    /// Rebuilds a log from stored entries in any order.
    pub fn from_entries(mut entries: Vec<SearchHistoryEntry>, max_entries: usize) -> Self {
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        let mut history = Self::new(max_entries);
        for entry in entries {
            if !history.contains(&entry.form) {
                history.entries.push(entry);
            }
        }
        history.entries.truncate(max_entries);
        history
    }

    /// Adds an entry unless the same form values are already logged.
    pub fn insert(&mut self, entry: SearchHistoryEntry) -> bool {
        if self.contains(&entry.form) {
            return false;
        }
        self.entries.insert(0, entry);
        self.entries.truncate(self.max_entries);
        true
    }

    pub fn contains(&self, form: &SearchForm) -> bool {
        self.entries.iter().any(|e| &e.form == form)
    }

    /// Newest first.
    pub fn list(&self) -> &[SearchHistoryEntry] {
        &self.entries
    }

    pub fn entries(&self) -> Vec<SearchHistoryEntry> {
        self.entries.clone()
    }

    pub fn replay(&self, index: usize) -> Option<SearchForm> {
        self.entries.get(index).map(|e| e.form.clone())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Changes to the on-screen history. Applied through a yew reducer so that
/// searches finishing out of order all land on the latest state.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryAction {
    Loaded(SearchHistory),
    Recorded(SearchHistoryEntry),
    Cleared,
}

impl Reducible for SearchHistory {
    type Action = HistoryAction;

    fn reduce(self: Rc<Self>, action: HistoryAction) -> Rc<Self> {
        match action {
            HistoryAction::Loaded(history) => Rc::new(history),
            HistoryAction::Recorded(entry) => {
                let mut next = (*self).clone();
                if next.insert(entry) {
                    Rc::new(next)
                } else {
                    self
                }
            }
            HistoryAction::Cleared => Rc::new(Self::new(self.max_entries)),
        }
    }
}

/// Persists history through the configured snapshot backend. The current
/// log is passed in so duplicates are caught before anything is sent.
#[derive(Clone)]
pub struct HistoryManager {
    backend: Rc<dyn SnapshotBackend>,
}

impl PartialEq for HistoryManager {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.backend, &other.backend)
    }
}

impl HistoryManager {
    pub fn new(backend: Rc<dyn SnapshotBackend>) -> Self {
        Self { backend }
    }

    pub async fn load(&self) -> Result<SearchHistory, StoreError> {
        let entries = self.backend.load_history().await?;
        Ok(SearchHistory::from_entries(entries, MAX_HISTORY_ENTRIES))
    }

    /// Logs a submitted search. Returns the stored entry, or `None` when the
    /// same form values are already in `history`.
    pub async fn record(
        &self,
        history: &SearchHistory,
        form: SearchForm,
        now: DateTime<Utc>,
    ) -> Result<Option<SearchHistoryEntry>, StoreError> {
        if history.contains(&form) {
            log::debug!("Search already in history, not recording");
            return Ok(None);
        }
        let entry = SearchHistoryEntry::new(form, now);
        self.backend.append_history(&entry).await?;
        Ok(Some(entry))
    }

    pub async fn clear(
        &self,
        history: &SearchHistory,
        confirm: &dyn Confirm,
    ) -> Result<bool, StoreError> {
        if history.is_empty() || !confirm.confirm("Clear the whole search history?") {
            return Ok(false);
        }
        self.backend.clear_history().await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::preferences::LocalSnapshots;
    use crate::storage::MemoryStorage;
    use chrono::{Duration, TimeZone};
    use futures::executor::block_on;

    fn at(minute: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap() + Duration::minutes(minute)
    }

    fn form(keyword: &str) -> SearchForm {
        SearchForm {
            keyword: keyword.to_string(),
            ..SearchForm::default()
        }
    }

    #[test]
    fn test_identical_search_recorded_once() {
        let mut history = SearchHistory::default();
        assert!(history.insert(SearchHistoryEntry::new(form("cats"), at(0))));
        assert!(!history.insert(SearchHistoryEntry::new(form("cats"), at(5))));
        assert_eq!(history.len(), 1);
        assert_eq!(history.list()[0].timestamp, at(0));
    }

    #[test]
    fn test_oldest_entries_are_evicted() {
        let mut history = SearchHistory::new(10);
        for i in 0..12 {
            history.insert(SearchHistoryEntry::new(form(&format!("q{i}")), at(i)));
        }
        assert_eq!(history.len(), 10);
        assert_eq!(history.list()[0].form.keyword, "q11");
        assert_eq!(history.list()[9].form.keyword, "q2");
    }

    #[test]
    fn test_replay_returns_form_values() {
        let mut history = SearchHistory::default();
        history.insert(SearchHistoryEntry::new(form("older"), at(0)));
        history.insert(SearchHistoryEntry::new(form("newer"), at(1)));
        assert_eq!(history.replay(1).map(|f| f.keyword), Some("older".to_string()));
        assert_eq!(history.replay(7), None);
    }

    #[test]
    fn test_from_entries_sorts_and_dedups() {
        let history = SearchHistory::from_entries(
            vec![
                SearchHistoryEntry::new(form("a"), at(1)),
                SearchHistoryEntry::new(form("b"), at(3)),
                SearchHistoryEntry::new(form("a"), at(2)),
            ],
            10,
        );
        let keywords: Vec<_> = history.list().iter().map(|e| e.form.keyword.as_str()).collect();
        assert_eq!(keywords, vec!["b", "a"]);
        assert_eq!(history.list()[1].timestamp, at(2));
    }

    #[test]
    fn test_entry_formats_date() {
        let entry = SearchHistoryEntry::new(form("cats"), at(0));
        assert_eq!(entry.formatted_date, "2024-05-01 09:00");
        assert!(entry.summary().starts_with("\"cats\""));
    }

    #[test]
    fn test_manager_persists_records() {
        let storage = MemoryStorage::default();
        let backend: Rc<dyn SnapshotBackend> = Rc::new(LocalSnapshots::new(storage.clone()));
        let manager = HistoryManager::new(backend);

        let mut history = SearchHistory::default();
        let cats = block_on(manager.record(&history, form("cats"), at(0))).unwrap().unwrap();
        history.insert(cats);
        assert_eq!(block_on(manager.record(&history, form("cats"), at(1))).unwrap(), None);
        block_on(manager.record(&history, form("dogs"), at(2))).unwrap().unwrap();

        let reloaded = block_on(manager.load()).unwrap();
        let keywords: Vec<_> = reloaded.list().iter().map(|e| e.form.keyword.clone()).collect();
        assert_eq!(keywords, vec!["dogs", "cats"]);
    }

    #[test]
    fn test_records_finishing_out_of_order_are_all_kept() {
        let start = Rc::new(SearchHistory::default());
        // Both searches were submitted against the same starting state.
        let second = SearchHistoryEntry::new(form("second"), at(1));
        let first = SearchHistoryEntry::new(form("first"), at(0));

        let history = start
            .reduce(HistoryAction::Recorded(second))
            .reduce(HistoryAction::Recorded(first));
        let keywords: Vec<_> = history.list().iter().map(|e| e.form.keyword.as_str()).collect();
        assert_eq!(keywords, vec!["first", "second"]);

        let unchanged = history
            .clone()
            .reduce(HistoryAction::Recorded(SearchHistoryEntry::new(form("first"), at(5))));
        assert!(Rc::ptr_eq(&history, &unchanged));
        assert!(history.reduce(HistoryAction::Cleared).is_empty());
    }

    #[test]
    fn test_manager_clear_needs_confirmation() {
        let backend: Rc<dyn SnapshotBackend> =
            Rc::new(LocalSnapshots::new(MemoryStorage::default()));
        let manager = HistoryManager::new(backend.clone());
        let mut history = SearchHistory::default();
        let cats = block_on(manager.record(&history, form("cats"), at(0))).unwrap().unwrap();
        history.insert(cats);

        assert!(!block_on(manager.clear(&history, &|_: &str| false)).unwrap());
        assert_eq!(block_on(backend.load_history()).unwrap().len(), 1);

        assert!(block_on(manager.clear(&history, &|_: &str| true)).unwrap());
        assert!(block_on(backend.load_history()).unwrap().is_empty());
        assert!(!block_on(manager.clear(&SearchHistory::default(), &|_: &str| true)).unwrap());
    }
}
