//! Thin wrapper over `gloo_net` shared by every feature's `api.rs`.
//!
//! Every call returns the raw body on 2xx; decoding happens in
//! [`decode_envelope`], which checks the backend's `status`/`success` field
//! before the typed payload is parsed. Anything that does not match the
//! expected shape is an [`ApiError::Decode`].

use crate::env_variable_utils::APP_CONFIG;
use crate::error::{ApiError, ApiResult};
use gloo_net::http::Request;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

pub fn endpoint(path: &str) -> String {
    APP_CONFIG.endpoint(path)
}

pub async fn get(path: &str) -> ApiResult<String> {
    send(Request::get(&endpoint(path)).build()?).await
}

pub async fn delete(path: &str) -> ApiResult<String> {
    send(Request::delete(&endpoint(path)).build()?).await
}

pub async fn post_json<T: Serialize>(path: &str, body: &T) -> ApiResult<String> {
    send(Request::post(&endpoint(path)).json(body)?).await
}

pub async fn put_json<T: Serialize>(path: &str, body: &T) -> ApiResult<String> {
    send(Request::put(&endpoint(path)).json(body)?).await
}

pub async fn post_form(path: &str, pairs: &[(&str, String)]) -> ApiResult<String> {
    let request = Request::post(&endpoint(path))
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(encode_form(pairs))?;
    send(request).await
}

async fn send(request: Request) -> ApiResult<String> {
    let url = request.url();
    let response = request.send().await.map_err(|e| {
        log::error!("Request to {} failed: {}", url, e);
        ApiError::from(e)
    })?;

    let status = response.status();
    let body = response.text().await?;

    if response.ok() {
        Ok(body)
    } else {
        log::warn!("{} answered HTTP {}", url, status);
        Err(error_from_failed_response(status, body))
    }
}

/// Prefers the structured `message` of an error body over the raw text.
fn error_from_failed_response(status: u16, body: String) -> ApiError {
    match serde_json::from_str::<Value>(&body) {
        Ok(value) if value.get("message").is_some() || value.get("status").is_some() => {
            match check_status(&value) {
                Err(e) => e,
                Ok(()) => ApiError::Http { status, body },
            }
        }
        _ => ApiError::Http { status, body },
    }
}

pub fn encode_form(pairs: &[(&str, String)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Decodes a `{status: ..., ...}` or `{success: bool, ...}` envelope into `T`.
pub fn decode_envelope<T: DeserializeOwned>(body: &str) -> ApiResult<T> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))?;
    check_status(&value)?;
    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Like [`decode_envelope`] for calls whose payload is irrelevant.
pub fn expect_success(body: &str) -> ApiResult<()> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))?;
    check_status(&value)
}

fn check_status(value: &Value) -> ApiResult<()> {
    let succeeded = match (value.get("status"), value.get("success")) {
        (Some(Value::String(status)), _) => match status.as_str() {
            "success" => true,
            "quota_exceeded" => return Err(ApiError::QuotaExceeded(backend_message(value))),
            _ => false,
        },
        (None, Some(Value::Bool(success))) => *success,
        _ => return Err(ApiError::Decode("missing status field".to_string())),
    };

    if succeeded {
        Ok(())
    } else {
        Err(ApiError::Backend(backend_message(value)))
    }
}

fn backend_message(value: &Value) -> String {
    ["user_message", "message", "error"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .filter(|m| !m.is_empty())
        .unwrap_or("Unknown error")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Named {
        name: String,
    }

    #[test]
    fn test_decode_success_envelope() {
        let named: Named = decode_envelope(r#"{"status":"success","name":"ok"}"#).unwrap();
        assert_eq!(named.name, "ok");

        let named: Named = decode_envelope(r#"{"success":true,"name":"saved"}"#).unwrap();
        assert_eq!(named.name, "saved");
    }

    #[test]
    fn test_error_status_uses_server_message() {
        let err = decode_envelope::<Named>(r#"{"status":"error","message":"API key missing"}"#)
            .unwrap_err();
        assert_eq!(err, ApiError::Backend("API key missing".to_string()));
    }

    #[test]
    fn test_quota_exceeded_prefers_user_message() {
        let err = expect_success(
            r#"{"status":"quota_exceeded","message":"quotaExceeded","user_message":"Try again tomorrow"}"#,
        )
        .unwrap_err();
        assert_eq!(err, ApiError::QuotaExceeded("Try again tomorrow".to_string()));
    }

    #[test]
    fn test_shape_mismatch_fails_closed() {
        assert!(matches!(
            decode_envelope::<Named>(r#"{"status":"success"}"#),
            Err(ApiError::Decode(_))
        ));
        assert!(matches!(
            expect_success(r#"{"name":"no status"}"#),
            Err(ApiError::Decode(_))
        ));
        assert!(matches!(expect_success("<html>"), Err(ApiError::Decode(_))));
    }

    #[test]
    fn test_failed_response_with_structured_body() {
        let err = error_from_failed_response(
            500,
            r#"{"status":"error","message":"database down"}"#.to_string(),
        );
        assert_eq!(err, ApiError::Backend("database down".to_string()));

        let err = error_from_failed_response(404, "Not Found".to_string());
        assert_eq!(
            err,
            ApiError::Http {
                status: 404,
                body: "Not Found".to_string()
            }
        );
    }

    #[test]
    fn test_encode_form_escapes_values() {
        let body = encode_form(&[
            ("keyword", "cats & dogs".to_string()),
            ("region_code", "KR".to_string()),
        ]);
        assert_eq!(body, "keyword=cats%20%26%20dogs&region_code=KR");
    }
}
