//! Configuration file handling for the CLI.
//!
//! Stores the drive token and connection settings in
//! `$XDG_CONFIG_HOME/drivedeck/config.toml` following the XDG Base Directory
//! Specification.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use directories::ProjectDirs;
use drivedeck_business::{BusinessConfig, ConfigSpec, CredentialProvider, PageSpec, StaticPage};
use serde::{Deserialize, Serialize};

/// CLI configuration stored on disk
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Authentication section
    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub drive: DriveConfig,

    /// Per-page overrides keyed by page name
    #[serde(default)]
    pub pages: BTreeMap<String, PageOverride>,
}

/// Authentication configuration
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Bearer token sent with every drive request
    pub token: Option<String>,
}

/// Connection settings; unset fields keep the environment or default value.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveConfig {
    pub api_base_url: Option<String>,
    pub storage_prefix: Option<String>,
    pub drive_id: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageOverride {
    pub base_path: Option<String>,
    pub max_size_bytes: Option<u64>,
    /// External address shown by a static page
    pub link: Option<String>,
}

impl DriveConfig {
    pub fn apply(&self, business: &mut BusinessConfig) {
        if let Some(url) = &self.api_base_url {
            business.api_base_url.clone_from(url);
        }
        if let Some(prefix) = &self.storage_prefix {
            business.storage_prefix.clone_from(prefix);
        }
        if let Some(drive_id) = &self.drive_id {
            business.drive_id.clone_from(drive_id);
        }
    }
}

impl PageOverride {
    pub fn apply_to_files(&self, spec: PageSpec) -> PageSpec {
        let spec = match &self.base_path {
            Some(path) => spec.with_base_path(drivedeck_business::drive::as_folder(path)),
            None => spec,
        };
        match self.max_size_bytes {
            Some(limit) => spec.with_max_size(limit),
            None => spec,
        }
    }

    pub fn apply_to_config(&self, spec: ConfigSpec) -> ConfigSpec {
        let mut spec = match &self.base_path {
            Some(path) => spec.with_folder(path.clone()),
            None => spec,
        };
        if let Some(limit) = self.max_size_bytes {
            spec.max_size_bytes = limit;
        }
        spec
    }

    pub fn apply_to_static(&self, page: StaticPage) -> StaticPage {
        match &self.link {
            Some(link) => page.with_link(link.clone()),
            None => page,
        }
    }
}

impl Config {
    /// Get the default configuration file path.
    ///
    /// Returns `$XDG_CONFIG_HOME/drivedeck/config.toml` on Linux,
    /// appropriate paths on other platforms.
    pub fn default_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("com", "drivedeck", "drivedeck")
            .context("Failed to determine config directory")?;

        Ok(project_dirs.config_dir().join("config.toml"))
    }

    /// Load configuration from `path`.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save configuration to `path`, creating its directory if needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    pub fn has_token(&self) -> bool {
        self.auth.token.is_some()
    }

    pub fn get_token(&self) -> Option<&str> {
        self.auth.token.as_deref()
    }

    pub fn set_token(&mut self, token: &str) {
        self.auth.token = Some(token.trim().to_owned());
    }

    pub fn clear_auth(&mut self) {
        self.auth.token = None;
    }

    pub fn page_override(&self, slug: &str) -> Option<&PageOverride> {
        self.pages.get(slug)
    }
}

/// Credential provider backed by the config file.
///
/// The file is read on every request, so a `drivedeck login` in another
/// terminal takes effect on the next call of a running command.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CredentialProvider for FileCredentialStore {
    fn token(&self) -> Option<String> {
        match Config::load_from(&self.path) {
            Ok(config) => config.auth.token,
            Err(e) => {
                log::warn!("{e:#}");
                None
            }
        }
    }
}
