use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const PLACEHOLDER_THUMBNAIL: &str = "https://via.placeholder.com/40";

/// One Short returned by `POST /search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultItem {
    pub id: String,
    pub title: String,
    #[serde(default, alias = "translated_title")]
    pub translated_title: Option<String>,
    pub channel_id: String,
    pub channel_title: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub comment_count: u64,
    pub published_at: DateTime<Utc>,
    /// Seconds.
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub region_code: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl SearchResultItem {
    pub fn watch_url(&self) -> String {
        match &self.url {
            Some(url) if !url.is_empty() => url.clone(),
            _ => format!("https://www.youtube.com/shorts/{}", self.id),
        }
    }

    pub fn channel_url(&self) -> String {
        format!("https://www.youtube.com/channel/{}", self.channel_id)
    }

    /// Like-to-view ratio, 0 when there are no views.
    pub fn engagement(&self) -> f64 {
        if self.view_count == 0 {
            0.0
        } else {
            self.like_count as f64 / self.view_count as f64
        }
    }
}

/// A hit from `GET /channel-search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelHit {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedChannel {
    pub id: String,
    pub title: String,
    #[serde(default = "placeholder_thumbnail")]
    pub thumbnail: String,
}

fn placeholder_thumbnail() -> String {
    PLACEHOLDER_THUMBNAIL.to_string()
}

impl From<ChannelHit> for SelectedChannel {
    fn from(hit: ChannelHit) -> Self {
        let thumbnail = hit
            .thumbnail
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(placeholder_thumbnail);
        Self {
            id: hit.id,
            title: hit.title,
            thumbnail,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub channels: Vec<SelectedChannel>,
}

impl Category {
    pub fn has_channel(&self, channel_id: &str) -> bool {
        self.channels.iter().any(|c| c.id == channel_id)
    }
}

/// A bookmarked Short from `/api/saved-videos`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedVideo {
    pub id: i64,
    pub video_id: String,
    pub video_title: String,
    pub channel_id: String,
    pub channel_title: String,
    #[serde(default)]
    pub thumbnail_url: String,
    #[serde(default)]
    pub video_url: String,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    pub saved_at: DateTime<Utc>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Body of `POST /api/saved-videos`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveVideoRequest {
    pub video_id: String,
    pub video_title: String,
    pub channel_id: String,
    pub channel_title: String,
    pub thumbnail_url: String,
    pub video_url: String,
    pub view_count: u64,
    pub duration: u32,
    pub published_at: DateTime<Utc>,
}

impl From<&SearchResultItem> for SaveVideoRequest {
    fn from(item: &SearchResultItem) -> Self {
        Self {
            video_id: item.id.clone(),
            video_title: item.title.clone(),
            channel_id: item.channel_id.clone(),
            channel_title: item.channel_title.clone(),
            thumbnail_url: item.thumbnail.clone(),
            video_url: item.watch_url(),
            view_count: item.view_count,
            duration: item.duration,
            published_at: item.published_at,
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::TimeZone;

    pub fn item(id: &str, views: u64, likes: u64, duration: u32) -> SearchResultItem {
        SearchResultItem {
            id: id.to_string(),
            title: format!("Short {id}"),
            translated_title: None,
            channel_id: format!("UC{id}"),
            channel_title: format!("Channel {id}"),
            thumbnail: format!("https://i.ytimg.com/vi/{id}/hq.jpg"),
            view_count: views,
            like_count: likes,
            comment_count: likes / 10,
            published_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            duration,
            region_code: Some("US".to_string()),
            description: None,
            url: None,
        }
    }

    pub fn channel(id: &str) -> SelectedChannel {
        SelectedChannel {
            id: id.to_string(),
            title: format!("Channel {id}"),
            thumbnail: PLACEHOLDER_THUMBNAIL.to_string(),
        }
    }
}
