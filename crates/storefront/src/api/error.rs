//! Error types for the products API client.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when calling the products API.
///
/// Transport failures, non-success statuses and response decoding failures
/// all arrive as [`ApiError::Http`] carrying the underlying `reqwest` error.
/// The client does not classify or retry them.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed, returned an error status, or had an undecodable body.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The configured base URL cannot have `/products` appended to it.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// The payload cannot be expressed in the configured transport.
    #[error("unsupported payload: {0}")]
    UnsupportedPayload(&'static str),
}

impl ApiError {
    /// HTTP status returned by the backend, if the request got that far.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Http(e) => e.status(),
            Self::InvalidBaseUrl(_) | Self::UnsupportedPayload(_) => None,
        }
    }

    /// Returns `true` when the backend answered `404 Not Found`.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::UnsupportedPayload("image uploads require the multipart transport");
        assert_eq!(
            err.to_string(),
            "unsupported payload: image uploads require the multipart transport"
        );

        let err = ApiError::InvalidBaseUrl("mailto:x@example.com".to_string());
        assert_eq!(err.to_string(), "invalid base URL: mailto:x@example.com");
    }

    #[test]
    fn test_local_errors_have_no_status() {
        let err = ApiError::UnsupportedPayload("nope");
        assert!(err.status().is_none());
        assert!(!err.is_not_found());
    }
}
