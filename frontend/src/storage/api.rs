use crate::error::ApiResult;
use crate::gateway::{self, decode_envelope, expect_success};
use crate::search::form::SearchForm;
use crate::search::history::SearchHistoryEntry;
use serde::{Deserialize, Serialize};

const PREFERENCES_PATH: &str = "/api/search/preferences";
const HISTORY_PATH: &str = "/api/search/history";

#[derive(Debug, Deserialize)]
struct PreferencesResponse {
    #[serde(default)]
    preferences: Option<SearchForm>,
}

#[derive(Serialize)]
struct PreferencesBody<'a> {
    preferences: &'a SearchForm,
}

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    #[serde(default)]
    history: Vec<SearchHistoryEntry>,
}

pub fn parse_preferences_response(body: &str) -> ApiResult<Option<SearchForm>> {
    let response: PreferencesResponse = decode_envelope(body)?;
    Ok(response.preferences)
}

pub fn parse_history_response(body: &str) -> ApiResult<Vec<SearchHistoryEntry>> {
    let response: HistoryResponse = decode_envelope(body)?;
    Ok(response.history)
}

pub async fn fetch_preferences() -> ApiResult<Option<SearchForm>> {
    let body = gateway::get(PREFERENCES_PATH).await?;
    parse_preferences_response(&body)
}

pub async fn save_preferences(form: &SearchForm) -> ApiResult<()> {
    let body = gateway::post_json(PREFERENCES_PATH, &PreferencesBody { preferences: form }).await?;
    expect_success(&body)
}

pub async fn fetch_history() -> ApiResult<Vec<SearchHistoryEntry>> {
    let body = gateway::get(HISTORY_PATH).await?;
    parse_history_response(&body)
}

pub async fn append_history(entry: &SearchHistoryEntry) -> ApiResult<()> {
    let body = gateway::post_json(HISTORY_PATH, entry).await?;
    expect_success(&body)
}

pub async fn clear_history() -> ApiResult<()> {
    let body = gateway::delete(HISTORY_PATH).await?;
    expect_success(&body)
}
