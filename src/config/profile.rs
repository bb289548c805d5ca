//! JIRA profile configuration.

use serde::{Deserialize, Serialize};

use super::{ConfigError, Result};

/// Connection details for one JIRA instance.
///
/// The API token is looked up separately, see [`Auth::resolve`](crate::api::Auth::resolve).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    /// Unique, whitespace-free name; also the keyring username.
    pub name: String,
    /// The JIRA instance URL (e.g. "https://company.atlassian.net").
    pub url: String,
    /// The account email used for Basic Auth.
    pub email: String,
}

impl Profile {
    pub fn new(name: String, url: String, email: String) -> Self {
        Self { name, url, email }
    }

    /// Validate this profile.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::ValidationError` naming the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(invalid("profile name cannot be empty".to_string()));
        }
        if self.name.contains(char::is_whitespace) {
            return Err(invalid(format!(
                "profile name '{}' cannot contain whitespace",
                self.name
            )));
        }

        let problem = if self.url.is_empty() {
            Some("URL cannot be empty".to_string())
        } else if !self.url.starts_with("https://") && !self.url.starts_with("http://") {
            Some("URL must start with http:// or https://".to_string())
        } else if self.email.is_empty() {
            Some("email cannot be empty".to_string())
        } else if !self.email.contains('@') {
            Some(format!("'{}' is not a valid email address", self.email))
        } else {
            None
        };

        match problem {
            Some(problem) => Err(invalid(format!("profile '{}': {}", self.name, problem))),
            None => Ok(()),
        }
    }
}

fn invalid(message: String) -> ConfigError {
    ConfigError::ValidationError(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(name: &str, url: &str, email: &str) -> Profile {
        Profile::new(name.to_string(), url.to_string(), email.to_string())
    }

    fn validation_message(p: Profile) -> String {
        p.validate().unwrap_err().to_string()
    }

    #[test]
    fn test_valid_profile() {
        assert!(profile("work", "https://company.atlassian.net", "user@company.com")
            .validate()
            .is_ok());
        assert!(profile("local", "http://localhost:8080", "dev@localhost")
            .validate()
            .is_ok());
    }

    #[test]
    fn test_name_rules() {
        assert!(validation_message(profile("", "https://x", "a@b")).contains("name cannot be empty"));
        assert!(validation_message(profile("my work", "https://x", "a@b"))
            .contains("cannot contain whitespace"));
    }

    #[test]
    fn test_url_rules() {
        assert!(validation_message(profile("work", "", "a@b")).contains("URL cannot be empty"));
        assert!(validation_message(profile("work", "ftp://x", "a@b"))
            .contains("must start with http:// or https://"));
    }

    #[test]
    fn test_email_rules() {
        assert!(validation_message(profile("work", "https://x", "")).contains("email cannot be empty"));
        assert!(validation_message(profile("work", "https://x", "nobody"))
            .contains("'nobody' is not a valid email address"));
    }

    #[test]
    fn test_toml_round_trip() {
        let original = profile("work", "https://company.atlassian.net", "user@company.com");
        let text = toml::to_string(&original).unwrap();
        let parsed: Profile = toml::from_str(&text).unwrap();
        assert_eq!(parsed, original);
    }
}
