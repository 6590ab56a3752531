use crate::error::ApiResult;
use crate::gateway::{self, decode_envelope};
use crate::scripts::{ExtractedScript, ScriptRequest};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ExtractResponse {
    #[serde(default)]
    scripts: Vec<ExtractedScript>,
}

pub fn parse_extract_response(body: &str) -> ApiResult<Vec<ExtractedScript>> {
    let response: ExtractResponse = decode_envelope(body)?;
    Ok(response.scripts)
}

pub async fn extract_scripts(request: &ScriptRequest) -> ApiResult<Vec<ExtractedScript>> {
    log::debug!(
        "Extracting {} scripts from {}",
        request.video_count,
        request.channel_url
    );
    let body = gateway::post_form("/api/scripts/extract", &request.to_form_pairs()).await?;
    parse_extract_response(&body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;

    #[test]
    fn test_parse_extract_response() {
        let body = r#"{
            "status": "success",
            "scripts": [
                {"title": "Soup", "videoUrl": "https://www.youtube.com/watch?v=a1",
                 "text": "Boil water", "duration": 42, "thumbnail": "t.jpg",
                 "channelTitle": "Cook Daily"},
                {"title": "Bread", "videoUrl": "https://www.youtube.com/watch?v=b2"}
            ]
        }"#;
        let scripts = parse_extract_response(body).unwrap();
        assert_eq!(scripts.len(), 2);
        assert_eq!(scripts[0].duration, Some(42.0));
        assert_eq!(scripts[0].channel_title.as_deref(), Some("Cook Daily"));
        assert_eq!(scripts[1].text, None);
    }

    #[test]
    fn test_extract_error_message_is_surfaced() {
        let body = r#"{"status": "error", "message": "Channel not found"}"#;
        assert_eq!(
            parse_extract_response(body),
            Err(ApiError::Backend("Channel not found".to_string()))
        );
    }

    #[test]
    fn test_missing_scripts_list_is_empty() {
        assert!(parse_extract_response(r#"{"status": "success"}"#).unwrap().is_empty());
    }
}
