//! API error types for the JIRA client.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when interacting with the JIRA API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a status code the endpoint does not accept.
    #[error("{0}")]
    Jira(#[from] JiraError),

    /// Network or HTTP error before a response was available.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The request was cancelled by the caller.
    #[error("Request cancelled")]
    Cancelled,

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A required argument was missing or empty.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Invalid response from the API.
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// A request body could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Keyring error when storing/retrieving tokens.
    #[error("Keyring error: {0}")]
    Keyring(String),

    /// Connection validation failed.
    #[error("Connection validation failed: {0}")]
    ConnectionFailed(String),
}

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// The HTTP status code, if the server produced one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Jira(e) => Some(e.status_code),
            ApiError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Field-level validation errors reported by the server.
    pub fn field_errors(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            ApiError::Jira(e) => Some(&e.errors),
            _ => None,
        }
    }

    /// Authentication failed (HTTP 401).
    pub fn is_unauthorized(&self) -> bool {
        self.status_code() == Some(401)
    }

    /// Permission denied (HTTP 403).
    pub fn is_forbidden(&self) -> bool {
        self.status_code() == Some(403)
    }

    /// The resource does not exist (HTTP 404).
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }

    /// The resource was modified concurrently (HTTP 409).
    pub fn is_conflict(&self) -> bool {
        self.status_code() == Some(409)
    }

    pub(crate) fn invalid_argument(name: &str) -> Self {
        ApiError::InvalidArgument(format!("{} must not be empty", name))
    }
}

/// A non-success response from JIRA.
///
/// The message is the best human-readable text available: the server's
/// `errorMessages` joined with `", "`, else its `message` field, else the
/// status code itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct JiraError {
    /// The HTTP status code.
    pub status_code: u16,
    /// The composed error message.
    pub message: String,
    /// Field name to validation message.
    pub errors: BTreeMap<String, String>,
}

/// Access to the error details carried in an error response body.
///
/// Implemented by every shape that can serve as the error side of an
/// [`Envelope`](super::Envelope).
pub trait ErrorDetails {
    /// General error messages, in server order.
    fn error_messages(&self) -> &[String];

    /// A single top-level message, used by some endpoints instead of
    /// `errorMessages`.
    fn message(&self) -> Option<&str>;

    /// Field name to validation message.
    fn field_errors(&self) -> BTreeMap<String, String>;
}

/// The standard JIRA error body.
///
/// ```json
/// {"errorMessages": ["Issue does not exist"], "errors": {"summary": "required"}}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    #[serde(default)]
    pub error_messages: Vec<String>,
    #[serde(default)]
    pub errors: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorDetails for ErrorResponse {
    fn error_messages(&self) -> &[String] {
        &self.error_messages
    }

    fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    fn field_errors(&self) -> BTreeMap<String, String> {
        self.errors.clone()
    }
}

/// For endpoints that declare no error shape.
impl ErrorDetails for () {
    fn error_messages(&self) -> &[String] {
        &[]
    }

    fn message(&self) -> Option<&str> {
        None
    }

    fn field_errors(&self) -> BTreeMap<String, String> {
        BTreeMap::new()
    }
}
