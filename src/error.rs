//! Crate-level error type.
//!
//! Aggregates configuration and API errors for callers that load a profile
//! and then talk to JIRA, and offers user-facing wording for each.

use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;

/// Any error produced by this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration-related errors.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// API-related errors.
    #[error("{0}")]
    Api(#[from] ApiError),
}

impl Error {
    /// A message suitable for end users, without technical detail.
    pub fn user_message(&self) -> String {
        match self {
            Error::Config(ConfigError::NoConfigDir) => {
                "Could not find configuration directory. Please check your system settings."
                    .to_string()
            }
            Error::Config(ConfigError::ParseError(_)) => {
                "Configuration file is invalid. Please check the file format.".to_string()
            }
            Error::Config(ConfigError::ProfileNotFound(name)) => {
                format!("Profile '{}' not found.", name)
            }
            Error::Config(ConfigError::ValidationError(msg)) => {
                format!("Configuration error: {}", msg)
            }
            Error::Config(_) => {
                "Could not read or write the configuration file. Check file permissions."
                    .to_string()
            }
            Error::Api(e) => api_user_message(e),
        }
    }

    /// Get a suggested action for the user.
    pub fn suggested_action(&self) -> Option<&'static str> {
        match self {
            Error::Config(ConfigError::NoConfigDir) | Error::Config(ConfigError::ProfileNotFound(_)) => {
                Some("Add a [[profiles]] entry to the configuration file.")
            }
            Error::Api(e) if e.is_unauthorized() => {
                Some("Check your API token at https://id.atlassian.com/manage-profile/security/api-tokens")
            }
            Error::Api(ApiError::Keyring(_)) => {
                Some("Store a token for the profile, or set JIRA_API_TOKEN.")
            }
            Error::Api(ApiError::Network(_)) | Error::Api(ApiError::ConnectionFailed(_)) => {
                Some("Check your internet connection and JIRA URL.")
            }
            _ => None,
        }
    }
}

fn api_user_message(err: &ApiError) -> String {
    match err {
        e if e.is_unauthorized() => {
            "Authentication failed. Please check your email and API token.".to_string()
        }
        e if e.is_forbidden() => {
            "Access denied. You don't have permission to access this resource.".to_string()
        }
        e if e.is_conflict() => {
            "This issue was modified by someone else. Please refresh and try again.".to_string()
        }
        ApiError::Jira(e) if e.status_code >= 500 => {
            "JIRA server error. Please try again later.".to_string()
        }
        ApiError::Jira(e) => e.message.clone(),
        ApiError::Network(_) | ApiError::ConnectionFailed(_) => {
            "Could not connect to JIRA. Please check your URL and network.".to_string()
        }
        ApiError::Cancelled => "The request was cancelled.".to_string(),
        ApiError::Keyring(_) => {
            "Could not access secure storage. Please reconfigure your profile.".to_string()
        }
        ApiError::InvalidUrl(_) => "Invalid JIRA URL in configuration.".to_string(),
        ApiError::InvalidResponse(_) | ApiError::Serialization(_) => {
            "Unexpected response from JIRA. Please try again.".to_string()
        }
        ApiError::InvalidArgument(msg) => msg.clone(),
    }
}

/// Result type for crate-level operations.
pub type Result<T> = std::result::Result<T, Error>;
