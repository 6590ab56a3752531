//! Error types shared by the gateway, the storage layer and the form checks.

use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

/// Failures talking to the backend.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response without a structured body.
    #[error("Request failed ({status}): {body}")]
    Http { status: u16, body: String },

    /// The body did not match the expected shape.
    #[error("Failed to parse response: {0}")]
    Decode(String),

    /// Structured `status != success` response.
    #[error("{0}")]
    Backend(String),

    /// The backend ran out of YouTube API quota.
    #[error("{0}")]
    QuotaExceeded(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl From<gloo_net::Error> for ApiError {
    fn from(e: gloo_net::Error) -> Self {
        ApiError::Network(e.to_string())
    }
}

/// Failures of the persisted preference/history/category stores.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Storage is unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to serialize {key}: {reason}")]
    Serialize { key: String, reason: String },

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Input rejected before any network call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: u64,
        max: u64,
    },

    #[error("{field} must be a whole number")]
    NotANumber { field: &'static str },

    #[error("Maximum views must not be lower than minimum views")]
    InvertedViewRange,

    #[error("A category named '{0}' already exists")]
    DuplicateName(String),

    #[error("Invalid import file: {0}")]
    InvalidImport(String),

    #[error("'{0}' is not a YouTube channel URL or @handle")]
    InvalidChannelUrl(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::Http {
            status: 502,
            body: "Bad Gateway".to_string(),
        };
        assert_eq!(err.to_string(), "Request failed (502): Bad Gateway");
        assert_eq!(
            ApiError::Network("offline".to_string()).to_string(),
            "Network error: offline"
        );
    }

    #[test]
    fn test_backend_messages_pass_through() {
        let err = ApiError::QuotaExceeded("Daily quota used up".to_string());
        assert_eq!(err.to_string(), "Daily quota used up");
    }

    #[test]
    fn test_validation_error_wraps_transparently() {
        let err: ApiError = ValidationError::Required { field: "Category name" }.into();
        assert_eq!(err.to_string(), "Category name is required");
    }

    #[test]
    fn test_out_of_range_display() {
        let err = ValidationError::OutOfRange {
            field: "Max results",
            min: 1,
            max: 500,
        };
        assert_eq!(err.to_string(), "Max results must be between 1 and 500");
    }
}
