//! Authentication handling for JIRA API.
//!
//! JIRA Cloud uses Basic Auth with an email and API token. Tokens are looked
//! up in the OS keyring first and in the `JIRA_API_TOKEN` environment
//! variable second; they are never written to the config file.

use std::fmt;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use tracing::debug;

use super::error::{ApiError, Result};

/// The keyring service name for stored tokens.
const KEYRING_SERVICE: &str = "jira-rest";

/// Environment variable consulted when the keyring has no token.
pub const TOKEN_ENV_VAR: &str = "JIRA_API_TOKEN";

/// Authentication credentials for JIRA.
#[derive(Clone)]
pub struct Auth {
    email: String,
    /// The complete `Basic ...` header value. The raw token is not kept.
    auth_header: String,
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Auth")
            .field("email", &self.email)
            .field("auth_header", &"<redacted>")
            .finish()
    }
}

impl Auth {
    /// Create credentials from an email and API token.
    pub fn new(email: &str, token: &str) -> Self {
        Self {
            email: email.to_string(),
            auth_header: build_auth_header(email, token),
        }
    }

    /// Resolve the token for `profile_name`, trying the keyring and then
    /// the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Keyring`] if neither source has a token.
    pub fn resolve(profile_name: &str, email: &str) -> Result<Self> {
        match get_token(profile_name) {
            Ok(token) => Ok(Self::new(email, &token)),
            Err(keyring_err) => {
                debug!(profile = profile_name, "No keyring token, trying {}", TOKEN_ENV_VAR);
                Self::from_env(email).map_err(|_| keyring_err)
            }
        }
    }

    /// Create credentials using the token in `JIRA_API_TOKEN`.
    pub fn from_env(email: &str) -> Result<Self> {
        match std::env::var(TOKEN_ENV_VAR) {
            Ok(token) if !token.trim().is_empty() => Ok(Self::new(email, token.trim())),
            _ => Err(ApiError::Keyring(format!("{} is not set", TOKEN_ENV_VAR))),
        }
    }

    /// Get the authorization header value for HTTP requests.
    pub fn header_value(&self) -> &str {
        &self.auth_header
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

/// Encode "email:token" in Base64 and prepend "Basic ".
fn build_auth_header(email: &str, token: &str) -> String {
    let encoded = BASE64.encode(format!("{}:{}", email, token).as_bytes());
    format!("Basic {}", encoded)
}

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry> {
    keyring::Entry::new(KEYRING_SERVICE, profile_name)
        .map_err(|e| ApiError::Keyring(format!("failed to access keyring: {}", e)))
}

/// Store an API token in the OS keyring under the profile name.
pub fn store_token(profile_name: &str, token: &str) -> Result<()> {
    keyring_entry(profile_name)?
        .set_password(token)
        .map_err(|e| ApiError::Keyring(format!("failed to store token: {}", e)))
}

/// Retrieve the API token stored for a profile.
pub fn get_token(profile_name: &str) -> Result<String> {
    keyring_entry(profile_name)?
        .get_password()
        .map_err(|e| ApiError::Keyring(format!("failed to retrieve token: {}", e)))
}

/// Delete the API token stored for a profile.
pub fn delete_token(profile_name: &str) -> Result<()> {
    keyring_entry(profile_name)?
        .delete_password()
        .map_err(|e| ApiError::Keyring(format!("failed to delete token: {}", e)))
}
