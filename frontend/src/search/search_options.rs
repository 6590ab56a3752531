use crate::models::SearchResultItem;
use chrono::{DateTime, Duration, Utc};
use js_sys::Reflect;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use wasm_bindgen::JsValue;
use web_sys::Event;
use yew::{function_component, html, Callback, Html, Properties};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    #[default]
    ViewCount,
    ViewCountAsc,
    LikeCount,
    CommentCount,
    PublishDate,
    PublishDateAsc,
    Duration,
    DurationAsc,
    Engagement,
}

impl SortKey {
    pub fn display_name(&self) -> &'static str {
        match self {
            SortKey::ViewCount => "Most viewed",
            SortKey::ViewCountAsc => "Least viewed",
            SortKey::LikeCount => "Most liked",
            SortKey::CommentCount => "Most comments",
            SortKey::PublishDate => "Newest",
            SortKey::PublishDateAsc => "Oldest",
            SortKey::Duration => "Longest",
            SortKey::DurationAsc => "Shortest",
            SortKey::Engagement => "Engagement",
        }
    }

    pub fn all_variants() -> Vec<Self> {
        vec![
            SortKey::ViewCount,
            SortKey::ViewCountAsc,
            SortKey::LikeCount,
            SortKey::CommentCount,
            SortKey::PublishDate,
            SortKey::PublishDateAsc,
            SortKey::Duration,
            SortKey::DurationAsc,
            SortKey::Engagement,
        ]
    }

    // Keys used in <option value="..."> so we can reliably map back and forth.
    pub fn key(&self) -> &'static str {
        match self {
            SortKey::ViewCount => "viewCount",
            SortKey::ViewCountAsc => "viewCountAsc",
            SortKey::LikeCount => "likeCount",
            SortKey::CommentCount => "commentCount",
            SortKey::PublishDate => "publishDate",
            SortKey::PublishDateAsc => "publishDateAsc",
            SortKey::Duration => "duration",
            SortKey::DurationAsc => "durationAsc",
            SortKey::Engagement => "engagement",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::all_variants().into_iter().find(|k| k.key() == key)
    }

    /// Orders `a` before `b` when it should be shown first. Ties are `Equal`;
    /// callers break them by fetch order.
    pub fn compare(&self, a: &SearchResultItem, b: &SearchResultItem) -> Ordering {
        match self {
            SortKey::ViewCount => b.view_count.cmp(&a.view_count),
            SortKey::ViewCountAsc => a.view_count.cmp(&b.view_count),
            SortKey::LikeCount => b.like_count.cmp(&a.like_count),
            SortKey::CommentCount => b.comment_count.cmp(&a.comment_count),
            SortKey::PublishDate => b.published_at.cmp(&a.published_at),
            SortKey::PublishDateAsc => a.published_at.cmp(&b.published_at),
            SortKey::Duration => b.duration.cmp(&a.duration),
            SortKey::DurationAsc => a.duration.cmp(&b.duration),
            SortKey::Engagement => b.engagement().total_cmp(&a.engagement()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewBucket {
    Under10K,
    From10KTo100K,
    From100KTo1M,
    Over1M,
}

impl ViewBucket {
    pub fn contains(&self, views: u64) -> bool {
        match self {
            ViewBucket::Under10K => views < 10_000,
            ViewBucket::From10KTo100K => (10_000..100_000).contains(&views),
            ViewBucket::From100KTo1M => (100_000..1_000_000).contains(&views),
            ViewBucket::Over1M => views >= 1_000_000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateBucket {
    Day,
    Week,
    Month,
    Older,
}

impl DateBucket {
    pub fn contains(&self, published_at: &DateTime<Utc>, now: &DateTime<Utc>) -> bool {
        let age = *now - *published_at;
        match self {
            DateBucket::Day => age <= Duration::days(1),
            DateBucket::Week => age <= Duration::days(7),
            DateBucket::Month => age <= Duration::days(30),
            DateBucket::Older => age > Duration::days(30),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DurationBucket {
    Under15,
    From15To30,
    From30To60,
    Over60,
}

impl DurationBucket {
    pub fn contains(&self, seconds: u32) -> bool {
        match self {
            DurationBucket::Under15 => seconds < 15,
            DurationBucket::From15To30 => (15..30).contains(&seconds),
            DurationBucket::From30To60 => (30..=60).contains(&seconds),
            DurationBucket::Over60 => seconds > 60,
        }
    }
}

macro_rules! option_keys {
    ($ty:ty { $($variant:ident => $key:literal, $label:literal;)+ }) => {
        impl $ty {
            pub fn all_variants() -> Vec<Self> {
                vec![$(Self::$variant),+]
            }

            pub fn key(&self) -> &'static str {
                match self {
                    $(Self::$variant => $key),+
                }
            }

            pub fn display_name(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }

            pub fn from_key(key: &str) -> Option<Self> {
                match key {
                    $($key => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

option_keys!(ViewBucket {
    Under10K => "under10k", "Under 10K";
    From10KTo100K => "10k-100k", "10K - 100K";
    From100KTo1M => "100k-1m", "100K - 1M";
    Over1M => "over1m", "Over 1M";
});

option_keys!(DateBucket {
    Day => "day", "Last 24 hours";
    Week => "week", "Last 7 days";
    Month => "month", "Last 30 days";
    Older => "older", "Older than 30 days";
});

option_keys!(DurationBucket {
    Under15 => "under15", "Under 15s";
    From15To30 => "15to30", "15 - 30s";
    From30To60 => "30to60", "30 - 60s";
    Over60 => "over60", "Over 60s";
});

/// Conjunction of optional predicates; `None` always passes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub views: Option<ViewBucket>,
    pub published: Option<DateBucket>,
    pub duration: Option<DurationBucket>,
    pub text: Option<String>,
    pub region: Option<String>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.views.is_none()
            && self.published.is_none()
            && self.duration.is_none()
            && self.text.as_deref().map_or(true, |t| t.trim().is_empty())
            && self.region.as_deref().map_or(true, |r| r.trim().is_empty())
    }

    pub fn matches(&self, item: &SearchResultItem, now: &DateTime<Utc>) -> bool {
        if let Some(bucket) = self.views {
            if !bucket.contains(item.view_count) {
                return false;
            }
        }
        if let Some(bucket) = self.published {
            if !bucket.contains(&item.published_at, now) {
                return false;
            }
        }
        if let Some(bucket) = self.duration {
            if !bucket.contains(item.duration) {
                return false;
            }
        }
        if let Some(text) = self.text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            if !item.title.to_lowercase().contains(&text.to_lowercase()) {
                return false;
            }
        }
        if let Some(region) = self.region.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
            let same_region = item
                .region_code
                .as_deref()
                .is_some_and(|code| code.eq_ignore_ascii_case(region));
            if !same_region {
                return false;
            }
        }
        true
    }
}

// Helper to read "value" from any event target without HtmlSelectElement.
pub fn event_value(e: &Event) -> Option<String> {
    let target = e.target()?;
    let js_value = Reflect::get(target.as_ref(), &JsValue::from_str("value")).ok()?;
    js_value.as_string()
}

#[derive(Properties, PartialEq)]
pub struct SearchOptionsProps {
    pub sort_key: SortKey,
    pub criteria: FilterCriteria,
    pub on_sort_change: Callback<SortKey>,
    pub on_filter_change: Callback<FilterCriteria>,
}

#[function_component(SearchOptionsDropdowns)]
pub fn search_options(props: &SearchOptionsProps) -> Html {
    let on_sort_change = {
        let on_sort_change = props.on_sort_change.clone();
        Callback::from(move |e: Event| {
            if let Some(key) = event_value(&e).as_deref().and_then(SortKey::from_key) {
                on_sort_change.emit(key);
            }
        })
    };

    // Each filter control rebuilds the criteria from the current props.
    let filter_callback = |apply: fn(&mut FilterCriteria, String)| {
        let criteria = props.criteria.clone();
        let on_filter_change = props.on_filter_change.clone();
        Callback::from(move |e: Event| {
            let mut next = criteria.clone();
            apply(&mut next, event_value(&e).unwrap_or_default());
            on_filter_change.emit(next);
        })
    };

    let on_views_change = filter_callback(|c, v| c.views = ViewBucket::from_key(&v));
    let on_date_change = filter_callback(|c, v| c.published = DateBucket::from_key(&v));
    let on_duration_change = filter_callback(|c, v| c.duration = DurationBucket::from_key(&v));
    let on_text_change = filter_callback(|c, v| c.text = Some(v).filter(|t| !t.trim().is_empty()));
    let on_region_change = filter_callback(|c, v| c.region = Some(v).filter(|r| !r.trim().is_empty()));

    let on_reset = {
        let on_filter_change = props.on_filter_change.clone();
        Callback::from(move |_| on_filter_change.emit(FilterCriteria::default()))
    };

    let criteria = &props.criteria;

    html! {
        <div class="search-options row g-2 mb-3">
            <label class="search-option col-md-3">
                { "Sort by" }
                <select class="form-select form-select-sm" onchange={on_sort_change}>
                    {
                        for SortKey::all_variants().into_iter().map(|key| html! {
                            <option value={key.key()} selected={key == props.sort_key}>
                                { key.display_name() }
                            </option>
                        })
                    }
                </select>
            </label>

            <label class="search-option col-md-2">
                { "Views" }
                <select class="form-select form-select-sm" onchange={on_views_change}>
                    <option value="" selected={criteria.views.is_none()}>{ "Any" }</option>
                    {
                        for ViewBucket::all_variants().into_iter().map(|b| html! {
                            <option value={b.key()} selected={criteria.views == Some(b)}>
                                { b.display_name() }
                            </option>
                        })
                    }
                </select>
            </label>

            <label class="search-option col-md-2">
                { "Published" }
                <select class="form-select form-select-sm" onchange={on_date_change}>
                    <option value="" selected={criteria.published.is_none()}>{ "Any time" }</option>
                    {
                        for DateBucket::all_variants().into_iter().map(|b| html! {
                            <option value={b.key()} selected={criteria.published == Some(b)}>
                                { b.display_name() }
                            </option>
                        })
                    }
                </select>
            </label>

            <label class="search-option col-md-2">
                { "Duration" }
                <select class="form-select form-select-sm" onchange={on_duration_change}>
                    <option value="" selected={criteria.duration.is_none()}>{ "Any length" }</option>
                    {
                        for DurationBucket::all_variants().into_iter().map(|b| html! {
                            <option value={b.key()} selected={criteria.duration == Some(b)}>
                                { b.display_name() }
                            </option>
                        })
                    }
                </select>
            </label>

            <label class="search-option col-md-2">
                { "Title contains" }
                <input
                    type="text"
                    class="form-control form-control-sm"
                    value={criteria.text.clone().unwrap_or_default()}
                    onchange={on_text_change}
                />
            </label>

            <label class="search-option col-md-1">
                { "Region" }
                <input
                    type="text"
                    class="form-control form-control-sm"
                    maxlength="2"
                    value={criteria.region.clone().unwrap_or_default()}
                    onchange={on_region_change}
                />
            </label>

            <div class="col-12 text-end">
                <button type="button" class="btn btn-sm btn-outline-secondary" onclick={on_reset}>
                    { "Clear filters" }
                </button>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::item;
    use chrono::TimeZone;

    #[test]
    fn test_sort_keys_round_trip_through_option_values() {
        for key in SortKey::all_variants() {
            assert_eq!(SortKey::from_key(key.key()), Some(key));
        }
        assert_eq!(SortKey::from_key("relevance"), None);
        assert_eq!(SortKey::default(), SortKey::ViewCount);
    }

    #[test]
    fn test_engagement_comparator_treats_zero_views_as_zero() {
        let silent = item("a", 0, 0, 10);
        let engaging = item("b", 100, 10, 10);
        assert_eq!(SortKey::Engagement.compare(&engaging, &silent), Ordering::Less);
        assert_eq!(SortKey::Engagement.compare(&silent, &silent), Ordering::Equal);
    }

    #[test]
    fn test_bucket_boundaries() {
        assert!(ViewBucket::Under10K.contains(9_999));
        assert!(ViewBucket::From10KTo100K.contains(10_000));
        assert!(ViewBucket::Over1M.contains(1_000_000));
        assert!(!ViewBucket::From100KTo1M.contains(1_000_000));

        assert!(DurationBucket::Under15.contains(14));
        assert!(!DurationBucket::Under15.contains(15));
        assert!(DurationBucket::From30To60.contains(60));
        assert!(DurationBucket::Over60.contains(61));
    }

    #[test]
    fn test_date_bucket_is_relative_to_now() {
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 0, 0, 0).unwrap();
        let three_days_ago = Utc.with_ymd_and_hms(2024, 5, 7, 0, 0, 0).unwrap();
        assert!(!DateBucket::Day.contains(&three_days_ago, &now));
        assert!(DateBucket::Week.contains(&three_days_ago, &now));
        assert!(!DateBucket::Older.contains(&three_days_ago, &now));
    }

    #[test]
    fn test_bucket_keys_parse() {
        assert_eq!(DurationBucket::from_key("under15"), Some(DurationBucket::Under15));
        assert_eq!(ViewBucket::from_key("100k-1m"), Some(ViewBucket::From100KTo1M));
        assert_eq!(DateBucket::from_key(""), None);
    }

    #[test]
    fn test_text_and_region_predicates() {
        let now = Utc::now();
        let mut short = item("a", 50, 1, 10);
        short.title = "Funny CAT compilation".to_string();

        let criteria = FilterCriteria {
            text: Some("cat".to_string()),
            region: Some("us".to_string()),
            ..FilterCriteria::default()
        };
        assert!(criteria.matches(&short, &now));

        short.region_code = Some("KR".to_string());
        assert!(!criteria.matches(&short, &now));

        short.region_code = None;
        assert!(!criteria.matches(&short, &now));
    }

    #[test]
    fn test_text_matches_original_title_only() {
        let mut short = item("a", 50, 1, 10);
        short.title = "고양이 Cat Video".to_string();
        short.translated_title = Some("Kitten clip".to_string());
        let now = Utc::now();

        let criteria = |text: &str| FilterCriteria {
            text: Some(text.to_string()),
            ..FilterCriteria::default()
        };
        assert!(criteria("cat video").matches(&short, &now));
        assert!(criteria("고양이").matches(&short, &now));
        assert!(!criteria("kitten").matches(&short, &now));
    }

    #[test]
    fn test_blank_criteria_is_empty() {
        assert!(FilterCriteria::default().is_empty());
        let blank = FilterCriteria {
            text: Some("   ".to_string()),
            ..FilterCriteria::default()
        };
        assert!(blank.is_empty());
        let active = FilterCriteria {
            duration: Some(DurationBucket::Under15),
            ..FilterCriteria::default()
        };
        assert!(!active.is_empty());
    }
}
