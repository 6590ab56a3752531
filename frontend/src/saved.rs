pub mod api;
pub mod components;

use crate::models::SavedVideo;
use std::cmp::Ordering;

pub const SAVED_PER_PAGE: usize = 20;

/// Client-side ordering of one page of saved videos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SavedSort {
    #[default]
    SavedNewest,
    SavedOldest,
    PublishedNewest,
    MostViewed,
    ChannelTitle,
}

impl SavedSort {
    pub fn all_variants() -> Vec<Self> {
        vec![
            SavedSort::SavedNewest,
            SavedSort::SavedOldest,
            SavedSort::PublishedNewest,
            SavedSort::MostViewed,
            SavedSort::ChannelTitle,
        ]
    }

    pub fn key(&self) -> &'static str {
        match self {
            SavedSort::SavedNewest => "saved_at_desc",
            SavedSort::SavedOldest => "saved_at_asc",
            SavedSort::PublishedNewest => "published_desc",
            SavedSort::MostViewed => "view_count_desc",
            SavedSort::ChannelTitle => "channel_title",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SavedSort::SavedNewest => "Recently saved",
            SavedSort::SavedOldest => "Saved first",
            SavedSort::PublishedNewest => "Newest upload",
            SavedSort::MostViewed => "Most viewed",
            SavedSort::ChannelTitle => "Channel name",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::all_variants().into_iter().find(|s| s.key() == key)
    }

    fn compare(&self, a: &SavedVideo, b: &SavedVideo) -> Ordering {
        match self {
            SavedSort::SavedNewest => b.saved_at.cmp(&a.saved_at),
            SavedSort::SavedOldest => a.saved_at.cmp(&b.saved_at),
            // Unknown publish dates go last.
            SavedSort::PublishedNewest => b.published_at.cmp(&a.published_at),
            SavedSort::MostViewed => b.view_count.cmp(&a.view_count),
            SavedSort::ChannelTitle => a
                .channel_title
                .to_lowercase()
                .cmp(&b.channel_title.to_lowercase()),
        }
    }
}

pub fn sort_saved(videos: &mut [SavedVideo], sort: SavedSort) {
    videos.sort_by(|a, b| sort.compare(a, b));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn video(id: i64, channel: &str, views: u64, saved_day: i64, published_day: Option<i64>) -> SavedVideo {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        SavedVideo {
            id,
            video_id: format!("v{id}"),
            video_title: format!("Video {id}"),
            channel_id: format!("UC{id}"),
            channel_title: channel.to_string(),
            thumbnail_url: String::new(),
            video_url: String::new(),
            view_count: views,
            duration: 30,
            published_at: published_day.map(|d| base + Duration::days(d)),
            saved_at: base + Duration::days(saved_day),
            notes: None,
        }
    }

    fn ids(videos: &[SavedVideo]) -> Vec<i64> {
        videos.iter().map(|v| v.id).collect()
    }

    fn sample() -> Vec<SavedVideo> {
        vec![
            video(1, "beta", 500, 3, Some(1)),
            video(2, "Alpha", 900, 1, None),
            video(3, "gamma", 100, 2, Some(5)),
        ]
    }

    #[test]
    fn test_saved_order() {
        let mut videos = sample();
        sort_saved(&mut videos, SavedSort::SavedNewest);
        assert_eq!(ids(&videos), vec![1, 3, 2]);
        sort_saved(&mut videos, SavedSort::SavedOldest);
        assert_eq!(ids(&videos), vec![2, 3, 1]);
    }

    #[test]
    fn test_published_order_puts_unknown_last() {
        let mut videos = sample();
        sort_saved(&mut videos, SavedSort::PublishedNewest);
        assert_eq!(ids(&videos), vec![3, 1, 2]);
    }

    #[test]
    fn test_views_and_channel_order() {
        let mut videos = sample();
        sort_saved(&mut videos, SavedSort::MostViewed);
        assert_eq!(ids(&videos), vec![2, 1, 3]);
        sort_saved(&mut videos, SavedSort::ChannelTitle);
        assert_eq!(ids(&videos), vec![2, 1, 3]);
    }

    #[test]
    fn test_sort_keys_round_trip() {
        for sort in SavedSort::all_variants() {
            assert_eq!(SavedSort::from_key(sort.key()), Some(sort));
        }
        assert_eq!(SavedSort::from_key("bogus"), None);
    }
}
