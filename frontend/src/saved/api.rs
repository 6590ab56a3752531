use crate::error::ApiResult;
use crate::gateway::{self, decode_envelope, expect_success};
use crate::models::{SaveVideoRequest, SavedVideo};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct Pagination {
    pub page: usize,
    pub pages: usize,
    pub total: usize,
    #[serde(default)]
    pub per_page: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SavedPage {
    pub videos: Vec<SavedVideo>,
    pub pagination: Pagination,
}

#[derive(Debug, Deserialize)]
struct SavedListResponse {
    videos: Vec<SavedVideo>,
    pagination: Pagination,
}

#[derive(Serialize)]
struct NotesBody<'a> {
    notes: &'a str,
}

pub fn parse_saved_page(body: &str) -> ApiResult<SavedPage> {
    let response: SavedListResponse = decode_envelope(body)?;
    Ok(SavedPage {
        videos: response.videos,
        pagination: response.pagination,
    })
}

pub async fn list_saved(page: usize, per_page: usize) -> ApiResult<SavedPage> {
    let path = format!("/api/saved-videos?page={}&per_page={}", page.max(1), per_page);
    let body = gateway::get(&path).await?;
    parse_saved_page(&body)
}

pub async fn save_video(request: &SaveVideoRequest) -> ApiResult<()> {
    let body = gateway::post_json("/api/saved-videos", request).await?;
    expect_success(&body)
}

pub async fn update_notes(id: i64, notes: &str) -> ApiResult<()> {
    let path = format!("/api/saved-videos/{}/notes", id);
    let body = gateway::put_json(&path, &NotesBody { notes }).await?;
    expect_success(&body)
}

pub async fn delete_saved(id: i64) -> ApiResult<()> {
    let body = gateway::delete(&format!("/api/saved-videos/{}", id)).await?;
    expect_success(&body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;

    #[test]
    fn test_parse_saved_page() {
        let page = parse_saved_page(
            r#"{"success":true,
                "videos":[{"id":7,"video_id":"abc","video_title":"T","channel_id":"UC1",
                           "channel_title":"C","saved_at":"2024-05-01T00:00:00Z","notes":"good"}],
                "pagination":{"page":1,"pages":3,"total":41,"per_page":20}}"#,
        )
        .unwrap();
        assert_eq!(page.videos[0].id, 7);
        assert_eq!(page.videos[0].notes.as_deref(), Some("good"));
        assert_eq!(page.pagination.pages, 3);
        assert_eq!(page.pagination.total, 41);
    }

    #[test]
    fn test_failed_listing_uses_message() {
        let err = parse_saved_page(r#"{"success":false,"message":"Login required"}"#).unwrap_err();
        assert_eq!(err, ApiError::Backend("Login required".to_string()));
    }
}
