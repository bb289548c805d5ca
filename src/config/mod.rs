//! Configuration management for jira-rest.
//!
//! Profiles and client settings live in a TOML file in the platform
//! configuration directory (`~/.config/jira-rest/config.toml` on Linux), or
//! wherever `JIRA_REST_CONFIG` points. API tokens are never stored here.

mod profile;
mod settings;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

pub use profile::Profile;
pub use settings::Settings;

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV_VAR: &str = "JIRA_REST_CONFIG";

const CONFIG_DIR_NAME: &str = "jira-rest";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Errors that can occur while loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine the configuration directory")]
    NoConfigDir,

    #[error("failed to create configuration directory: {0}")]
    CreateDirError(#[source] std::io::Error),

    #[error("failed to read configuration file: {0}")]
    ReadError(#[source] std::io::Error),

    #[error("failed to write configuration file: {0}")]
    WriteError(#[source] std::io::Error),

    #[error("invalid configuration file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("failed to serialize configuration: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("{0}")]
    ValidationError(String),

    #[error("profile '{0}' not found")]
    ProfileNotFound(String),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// The full configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub profiles: Vec<Profile>,
}

impl Config {
    /// Location of the config file.
    ///
    /// `JIRA_REST_CONFIG` wins over the platform default.
    pub fn path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV_VAR) {
            return Ok(PathBuf::from(path));
        }
        let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(base.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load the config file, or defaults if it does not exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load and validate a config file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;

        debug!(
            path = %path.display(),
            profiles = config.profiles.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Save to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Validate and write the config file, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(ConfigError::CreateDirError)?;
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents).map_err(ConfigError::WriteError)?;

        info!(path = %path.display(), "Saved configuration");
        Ok(())
    }

    /// Check every profile, name uniqueness and the default profile.
    pub fn validate(&self) -> Result<()> {
        for (i, profile) in self.profiles.iter().enumerate() {
            profile.validate()?;
            if self.profiles[..i].iter().any(|p| p.name == profile.name) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate profile name '{}'",
                    profile.name
                )));
            }
        }

        if let Some(name) = &self.settings.default_profile {
            if self.profile(name).is_none() {
                return Err(ConfigError::ProfileNotFound(name.clone()));
            }
        }

        self.settings.validate()
    }

    pub fn profile(&self, name: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    /// The profile to use when none is named: the configured default, or
    /// the only profile if there is exactly one.
    pub fn default_profile(&self) -> Result<&Profile> {
        match &self.settings.default_profile {
            Some(name) => self
                .profile(name)
                .ok_or_else(|| ConfigError::ProfileNotFound(name.clone())),
            None if self.profiles.len() == 1 => Ok(&self.profiles[0]),
            None => Err(ConfigError::ValidationError(
                "no default profile configured".to_string(),
            )),
        }
    }

    /// Add a profile, rejecting duplicates.
    pub fn add_profile(&mut self, profile: Profile) -> Result<()> {
        profile.validate()?;
        if self.profile(&profile.name).is_some() {
            return Err(ConfigError::ValidationError(format!(
                "duplicate profile name '{}'",
                profile.name
            )));
        }
        self.profiles.push(profile);
        Ok(())
    }
}
