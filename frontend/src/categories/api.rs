use crate::categories::book::MergeReport;
use crate::error::ApiResult;
use crate::gateway::{self, decode_envelope, expect_success};
use crate::models::{Category, SelectedChannel};
use serde::{Deserialize, Serialize};
use urlencoding::encode;

#[derive(Debug, Deserialize)]
struct CategoriesResponse {
    categories: Vec<Category>,
}

#[derive(Debug, Deserialize)]
struct CategoryResponse {
    category: Category,
}

#[derive(Serialize)]
struct CreateCategoryBody<'a> {
    name: &'a str,
    description: &'a str,
}

#[derive(Serialize)]
struct ChannelsBody<'a> {
    channels: &'a [SelectedChannel],
}

#[derive(Serialize)]
struct CategoriesBody<'a> {
    categories: &'a [Category],
}

pub fn parse_categories_response(body: &str) -> ApiResult<Vec<Category>> {
    let response: CategoriesResponse = decode_envelope(body)?;
    Ok(response.categories)
}

pub fn parse_category_response(body: &str) -> ApiResult<Category> {
    let response: CategoryResponse = decode_envelope(body)?;
    Ok(response.category)
}

pub fn parse_merge_response(body: &str) -> ApiResult<MergeReport> {
    decode_envelope(body)
}

pub async fn list_categories() -> ApiResult<Vec<Category>> {
    let body = gateway::get("/api/categories").await?;
    parse_categories_response(&body)
}

pub async fn create_category(name: &str, description: Option<&str>) -> ApiResult<Category> {
    let request = CreateCategoryBody {
        name,
        description: description.unwrap_or_default(),
    };
    let body = gateway::post_json("/api/categories", &request).await?;
    parse_category_response(&body)
}

pub async fn delete_category(id: &str) -> ApiResult<()> {
    let body = gateway::delete(&format!("/api/categories/{}", encode(id))).await?;
    expect_success(&body)
}

pub async fn add_channels(id: &str, channels: &[SelectedChannel]) -> ApiResult<()> {
    let path = format!("/api/categories/{}/channels", encode(id));
    let body = gateway::post_json(&path, &ChannelsBody { channels }).await?;
    expect_success(&body)
}

pub async fn remove_channel(id: &str, channel_id: &str) -> ApiResult<()> {
    let path = format!(
        "/api/categories/{}/channels/{}",
        encode(id),
        encode(channel_id)
    );
    let body = gateway::delete(&path).await?;
    expect_success(&body)
}

pub async fn import_categories(categories: &[Category]) -> ApiResult<()> {
    let body = gateway::post_json("/api/categories/import", &CategoriesBody { categories }).await?;
    expect_success(&body)
}

pub async fn merge_categories(categories: &[Category]) -> ApiResult<MergeReport> {
    let body = gateway::post_json("/api/categories/merge", &CategoriesBody { categories }).await?;
    parse_merge_response(&body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;

    #[test]
    fn test_parse_category_list() {
        let categories = parse_categories_response(
            r#"{"status":"success","categories":[
                {"id":"1","name":"Food","created_at":"2024-05-01T00:00:00Z",
                 "channels":[{"id":"UC1","title":"Chef"}]}
            ]}"#,
        )
        .unwrap();
        assert_eq!(categories[0].name, "Food");
        assert_eq!(
            categories[0].channels[0].thumbnail,
            crate::models::PLACEHOLDER_THUMBNAIL
        );
    }

    #[test]
    fn test_duplicate_name_message_is_surfaced() {
        let err = parse_category_response(
            r#"{"status":"error","message":"Category 'Food' already exists"}"#,
        )
        .unwrap_err();
        assert_eq!(err, ApiError::Backend("Category 'Food' already exists".to_string()));
    }

    #[test]
    fn test_parse_merge_counts() {
        let report = parse_merge_response(
            r#"{"status":"success","newCategoriesCount":2,"updatedCategoriesCount":1}"#,
        )
        .unwrap();
        assert_eq!(report.new_categories, 2);
        assert_eq!(report.updated_categories, 1);
    }
}
