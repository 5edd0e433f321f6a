//! Error types for the payment catalog gateway.

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when talking to the payment catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Rate limited by the platform.
    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Secret key rejected.
    #[error("unauthorized: invalid secret key")]
    Unauthorized,

    /// Failed to parse response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Request could not be built from local data.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Error envelope returned by the catalog API.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_error_display() {
        let err = CatalogError::RateLimited(2);
        assert_eq!(err.to_string(), "rate limited, retry after 2 seconds");

        let err = CatalogError::Api {
            status: 400,
            message: "Missing required param: name.".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 400 - Missing required param: name.");
    }

    #[test]
    fn test_api_error_deserialization() {
        let json = r#"{
            "error": {
                "type": "invalid_request_error",
                "message": "Invalid API Key provided: sk_test_****"
            }
        }"#;

        let response: ApiErrorResponse = serde_json::from_str(json).expect("deserialize");
        assert_eq!(response.error.error_type.as_deref(), Some("invalid_request_error"));
        assert_eq!(
            response.error.message.as_deref(),
            Some("Invalid API Key provided: sk_test_****")
        );
    }
}
