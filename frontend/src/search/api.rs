use crate::error::ApiResult;
use crate::gateway::{self, decode_envelope};
use crate::models::{ChannelHit, SearchResultItem};
use crate::search::form::SearchForm;
use serde::Deserialize;

/// Successful `POST /search` payload.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub count: usize,
    pub results: Vec<SearchResultItem>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    count: Option<usize>,
    results: Vec<SearchResultItem>,
}

#[derive(Debug, Deserialize)]
struct ChannelSearchResponse {
    channels: Vec<ChannelHit>,
}

#[derive(Debug, Deserialize)]
struct StatusMessage {
    #[serde(default)]
    message: Option<String>,
}

pub fn parse_search_response(body: &str) -> ApiResult<SearchOutcome> {
    let response: SearchResponse = decode_envelope(body)?;
    Ok(SearchOutcome {
        count: response.count.unwrap_or(response.results.len()),
        results: response.results,
    })
}

pub fn parse_channel_search_response(body: &str) -> ApiResult<Vec<ChannelHit>> {
    let response: ChannelSearchResponse = decode_envelope(body)?;
    Ok(response.channels)
}

pub async fn execute_search(form: &SearchForm) -> ApiResult<SearchOutcome> {
    let body = gateway::post_form("/search", &form.to_form_pairs()).await?;
    parse_search_response(&body)
}

pub async fn search_channels(query: &str) -> ApiResult<Vec<ChannelHit>> {
    let path = format!("/channel-search?q={}", urlencoding::encode(query));
    let body = gateway::get(&path).await?;
    parse_channel_search_response(&body)
}

/// Backs the "check status" button on the quota panel.
pub async fn check_api_status() -> ApiResult<String> {
    let body = gateway::get("/api-test").await?;
    let status: StatusMessage = decode_envelope(&body)?;
    Ok(status.message.unwrap_or_else(|| "API key is working".to_string()))
}
