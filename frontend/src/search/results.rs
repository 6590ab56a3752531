//! State of the current result set: sort order, filter view and the
//! "load more" cursor.
//!
//! The controller owns the fetched items in fetch order and keeps the
//! active view as a list of indices into them. Filtering always starts
//! again from the full set; sorting reorders the active view and breaks
//! ties by fetch index so the order is deterministic.

use crate::config::DEFAULT_PAGE_SIZE;
use crate::models::SearchResultItem;
use crate::search::search_options::{FilterCriteria, SortKey};
use chrono::{DateTime, Utc};
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub struct ResultSetController {
    items: Rc<Vec<SearchResultItem>>,
    view: Vec<usize>,
    sort_key: SortKey,
    criteria: FilterCriteria,
    page: usize,
    page_size: usize,
}

impl Default for ResultSetController {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl ResultSetController {
    pub fn new(page_size: usize) -> Self {
        Self {
            items: Rc::new(Vec::new()),
            view: Vec::new(),
            sort_key: SortKey::default(),
            criteria: FilterCriteria::default(),
            page: 1,
            page_size: page_size.max(1),
        }
    }

    /// Replaces the result set and resets sort, filter and paging.
    pub fn load(&mut self, items: Vec<SearchResultItem>) {
        self.items = Rc::new(items);
        self.sort_key = SortKey::default();
        self.criteria = FilterCriteria::default();
        self.view = (0..self.items.len()).collect();
        self.sort_view();
        self.page = 1;
    }

    pub fn apply_sort(&mut self, key: SortKey) {
        self.sort_key = key;
        self.sort_view();
        self.page = 1;
    }

    pub fn apply_filter(&mut self, criteria: FilterCriteria) {
        self.apply_filter_at(criteria, Utc::now());
    }

    /// Same as [`apply_filter`](Self::apply_filter) with an explicit clock for
    /// the publish-date bucket.
    pub fn apply_filter_at(&mut self, criteria: FilterCriteria, now: DateTime<Utc>) {
        self.view = if criteria.is_empty() {
            (0..self.items.len()).collect()
        } else {
            self.items
                .iter()
                .enumerate()
                .filter(|(_, item)| criteria.matches(item, &now))
                .map(|(index, _)| index)
                .collect()
        };
        self.criteria = criteria;
        self.sort_view();
        self.page = 1;
    }

    /// Reveals one more page. Returns `false` when everything is shown.
    pub fn next_page(&mut self) -> bool {
        if !self.has_more() {
            return false;
        }
        self.page += 1;
        true
    }

    /// Items of the current page only.
    pub fn current_page_items(&self) -> Vec<&SearchResultItem> {
        let start = (self.page - 1) * self.page_size;
        self.slice(start, self.page * self.page_size)
    }

    /// Everything revealed so far, pages 1..=current.
    pub fn displayed_items(&self) -> Vec<&SearchResultItem> {
        self.slice(0, self.displayed_count())
    }

    pub fn displayed_count(&self) -> usize {
        (self.page * self.page_size).min(self.total_count())
    }

    /// Size of the active view (filtered or not).
    pub fn total_count(&self) -> usize {
        self.view.len()
    }

    pub fn fetched_count(&self) -> usize {
        self.items.len()
    }

    pub fn has_more(&self) -> bool {
        self.total_count() > self.displayed_count()
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn is_filtered(&self) -> bool {
        !self.criteria.is_empty()
    }

    fn slice(&self, start: usize, end: usize) -> Vec<&SearchResultItem> {
        let end = end.min(self.view.len());
        if start >= end {
            return Vec::new();
        }
        self.view[start..end]
            .iter()
            .map(|&index| &self.items[index])
            .collect()
    }

    fn sort_view(&mut self) {
        let items = &self.items;
        let key = self.sort_key;
        self.view
            .sort_by(|&a, &b| key.compare(&items[a], &items[b]).then(a.cmp(&b)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::item;
    use crate::search::search_options::{DurationBucket, ViewBucket};
    use chrono::TimeZone;

    /// 25 items with distinct view counts; items 3, 11 and 19 are under 15s.
    fn twenty_five() -> Vec<SearchResultItem> {
        (0..25)
            .map(|i| {
                let duration = if i % 8 == 3 { 10 } else { 40 };
                item(&format!("v{i:02}"), 1_000 + (i as u64 * 37 % 25) * 100, i as u64, duration)
            })
            .collect()
    }

    fn ids(items: &[&SearchResultItem]) -> Vec<String> {
        items.iter().map(|i| i.id.clone()).collect()
    }

    #[test]
    fn test_load_defaults_to_views_descending() {
        let mut controller = ResultSetController::new(12);
        controller.load(twenty_five());

        let page = controller.current_page_items();
        assert_eq!(page.len(), 12);
        assert!(page.windows(2).all(|w| w[0].view_count >= w[1].view_count));
        assert_eq!(controller.sort_key(), SortKey::ViewCount);
        assert_eq!(controller.total_count(), 25);
    }

    #[test]
    fn test_paging_through_twenty_five_items() {
        let mut controller = ResultSetController::new(12);
        controller.load(twenty_five());
        let mut all = controller.clone();
        all.page_size = 25;
        let expected = ids(&all.current_page_items());

        assert_eq!(ids(&controller.current_page_items()), expected[0..12]);
        assert!(controller.has_more());

        assert!(controller.next_page());
        assert_eq!(ids(&controller.current_page_items()), expected[12..24]);
        assert_eq!(controller.displayed_count(), 24);

        assert!(controller.next_page());
        assert_eq!(ids(&controller.current_page_items()), expected[24..25]);
        assert_eq!(controller.displayed_count(), 25);
        assert!(!controller.has_more());

        assert!(!controller.next_page());
        assert_eq!(controller.page(), 3);
        assert_eq!(controller.displayed_items().len(), 25);
    }

    #[test]
    fn test_page_never_exceeds_page_size() {
        let mut controller = ResultSetController::new(5);
        controller.load(twenty_five());
        while controller.next_page() {
            assert!(controller.current_page_items().len() <= 5);
            assert!(controller.displayed_count() <= controller.total_count());
        }
        assert_eq!(controller.displayed_count(), 25);
    }

    #[test]
    fn test_empty_result_set() {
        let mut controller = ResultSetController::default();
        controller.load(Vec::new());
        assert!(controller.current_page_items().is_empty());
        assert!(!controller.has_more());
        assert!(!controller.next_page());
    }

    #[test]
    fn test_every_sort_key_orders_consecutive_items() {
        let mut controller = ResultSetController::new(25);
        controller.load(twenty_five());
        for key in SortKey::all_variants() {
            controller.apply_sort(key);
            let page = controller.current_page_items();
            assert_eq!(page.len(), 25);
            assert!(
                page.windows(2)
                    .all(|w| key.compare(w[0], w[1]) != std::cmp::Ordering::Greater),
                "{key:?} is out of order"
            );
        }
    }

    #[test]
    fn test_sort_ties_keep_fetch_order() {
        let items = vec![
            item("first", 100, 1, 30),
            item("second", 500, 2, 30),
            item("third", 100, 3, 30),
            item("fourth", 100, 4, 30),
        ];
        let mut controller = ResultSetController::new(12);
        controller.load(items);

        // Scramble with another key, then sort by duration where all tie.
        controller.apply_sort(SortKey::LikeCount);
        controller.apply_sort(SortKey::Duration);
        assert_eq!(
            ids(&controller.current_page_items()),
            vec!["first", "second", "third", "fourth"]
        );

        controller.apply_sort(SortKey::ViewCountAsc);
        assert_eq!(
            ids(&controller.current_page_items()),
            vec!["first", "third", "fourth", "second"]
        );
    }

    #[test]
    fn test_sort_resets_paging() {
        let mut controller = ResultSetController::new(12);
        controller.load(twenty_five());
        controller.next_page();
        controller.apply_sort(SortKey::PublishDate);
        assert_eq!(controller.page(), 1);
    }

    #[test]
    fn test_duration_filter_narrows_total() {
        let mut controller = ResultSetController::new(12);
        controller.load(twenty_five());
        controller.next_page();

        controller.apply_filter(FilterCriteria {
            duration: Some(DurationBucket::Under15),
            ..FilterCriteria::default()
        });

        assert_eq!(controller.total_count(), 3);
        assert_eq!(controller.page(), 1);
        assert_eq!(controller.displayed_count(), 3);
        assert!(!controller.has_more());
        assert!(controller
            .current_page_items()
            .iter()
            .all(|i| i.duration < 15));
        assert_eq!(controller.fetched_count(), 25);
    }

    #[test]
    fn test_filter_partitions_the_result_set() {
        let mut controller = ResultSetController::new(100);
        let items = twenty_five();
        controller.load(items.clone());
        let criteria = FilterCriteria {
            views: Some(ViewBucket::Under10K),
            duration: Some(DurationBucket::From30To60),
            ..FilterCriteria::default()
        };
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        controller.apply_filter_at(criteria.clone(), now);

        let kept = ids(&controller.current_page_items());
        for item in &items {
            assert_eq!(kept.contains(&item.id), criteria.matches(item, &now));
        }
    }

    #[test]
    fn test_filters_do_not_compound() {
        let mut controller = ResultSetController::new(12);
        controller.load(twenty_five());
        controller.apply_filter(FilterCriteria {
            duration: Some(DurationBucket::Under15),
            ..FilterCriteria::default()
        });
        controller.apply_filter(FilterCriteria {
            duration: Some(DurationBucket::From30To60),
            ..FilterCriteria::default()
        });
        assert_eq!(controller.total_count(), 22);

        controller.apply_filter(FilterCriteria::default());
        assert_eq!(controller.total_count(), 25);
        assert!(!controller.is_filtered());
    }

    #[test]
    fn test_sort_after_filter_sorts_filtered_view() {
        let mut controller = ResultSetController::new(12);
        controller.load(twenty_five());
        controller.apply_filter(FilterCriteria {
            duration: Some(DurationBucket::Under15),
            ..FilterCriteria::default()
        });
        controller.apply_sort(SortKey::ViewCountAsc);

        let page = controller.current_page_items();
        assert_eq!(page.len(), 3);
        assert!(page.windows(2).all(|w| w[0].view_count <= w[1].view_count));
    }

    #[test]
    fn test_filter_keeps_active_sort() {
        let mut controller = ResultSetController::new(12);
        controller.load(twenty_five());
        controller.apply_sort(SortKey::LikeCount);
        controller.apply_filter(FilterCriteria {
            duration: Some(DurationBucket::From30To60),
            ..FilterCriteria::default()
        });
        let page = controller.current_page_items();
        assert!(page.windows(2).all(|w| w[0].like_count >= w[1].like_count));
        assert_eq!(controller.sort_key(), SortKey::LikeCount);
    }

    #[test]
    fn test_load_resets_sort_and_filter() {
        let mut controller = ResultSetController::new(12);
        controller.load(twenty_five());
        controller.apply_sort(SortKey::Engagement);
        controller.apply_filter(FilterCriteria {
            duration: Some(DurationBucket::Under15),
            ..FilterCriteria::default()
        });

        controller.load(twenty_five());
        assert_eq!(controller.sort_key(), SortKey::ViewCount);
        assert!(!controller.is_filtered());
        assert_eq!(controller.total_count(), 25);
    }
}
