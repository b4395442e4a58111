use std::env::vars;

use serde::Deserialize;
use thiserror::Error;

/// Storage API prefix of the task manager deployment.
pub const DEFAULT_STORAGE_PREFIX: &str = "/hos-service/api/v1/taskmanager/drive/storage";

/// Drive used by every page unless overridden.
pub const DEFAULT_DRIVE_ID: &str = "default";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read drive configuration from environment: {0}")]
    Env(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessConfig {
    /// Deployment root, e.g. `https://robot.local`. Empty means relative URLs.
    pub api_base_url: String,
    /// Path of the storage API below the deployment root.
    pub storage_prefix: String,
    /// Drive every page operates on.
    pub drive_id: String,
}

/// Environment view of [`BusinessConfig`]; every field is optional.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    drivedeck_api_base_url: Option<String>,
    drivedeck_storage_prefix: Option<String>,
    drivedeck_drive_id: Option<String>,
}

impl BusinessConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_drive_id(mut self, drive_id: impl Into<String>) -> Self {
        self.drive_id = drive_id.into();
        self
    }

    /// `{base}` of every storage endpoint: `{api_base_url}{storage_prefix}`.
    pub fn storage_url(&self) -> String {
        let base = self.api_base_url.trim_end_matches('/');
        let prefix = self.storage_prefix.trim_end_matches('/');
        if prefix.starts_with('/') || prefix.is_empty() {
            format!("{base}{prefix}")
        } else {
            format!("{base}/{prefix}")
        }
    }

    /// Read `DRIVEDECK_API_BASE_URL`, `DRIVEDECK_STORAGE_PREFIX` and
    /// `DRIVEDECK_DRIVE_ID`, keeping defaults for unset variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().overlay_env()
    }

    /// Replace the fields whose environment variable is set.
    pub fn overlay_env(self) -> Result<Self, ConfigError> {
        let raw: RawConfig =
            serde_env::from_iter(vars()).map_err(|e| ConfigError::Env(e.to_string()))?;
        Ok(self.overlay(raw))
    }

    fn overlay(self, raw: RawConfig) -> Self {
        let config = Self {
            api_base_url: raw.drivedeck_api_base_url.unwrap_or(self.api_base_url),
            storage_prefix: raw.drivedeck_storage_prefix.unwrap_or(self.storage_prefix),
            drive_id: raw.drivedeck_drive_id.unwrap_or(self.drive_id),
        };
        log::debug!(
            "drive config: storage_url={} drive_id={}",
            config.storage_url(),
            config.drive_id
        );
        config
    }
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            api_base_url: String::new(),
            storage_prefix: DEFAULT_STORAGE_PREFIX.to_owned(),
            drive_id: DEFAULT_DRIVE_ID.to_owned(),
        }
    }
}
