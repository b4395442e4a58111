//! Wiring of configuration, credentials and page controllers for a command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result, bail};
use drivedeck_business::{
    BusinessConfig, ConfigPageController, DriveClient, FilePageController, PageKind, PageLayout,
};
use tracing::instrument;

use crate::config::{Config, FileCredentialStore};

pub type Drive = Arc<DriveClient>;

/// Values given on the command line; they win over file and environment.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub drive_id: Option<String>,
    pub config_path: Option<PathBuf>,
}

pub struct AppContext {
    pub config_path: PathBuf,
    pub config: Config,
    pub business: BusinessConfig,
    pub drive: Drive,
}

impl AppContext {
    /// Resolve settings as defaults < environment < config file < flags.
    #[instrument(skip_all, name = "load_context")]
    pub fn load(overrides: &Overrides) -> Result<Self> {
        let config_path = match &overrides.config_path {
            Some(path) => path.clone(),
            None => Config::default_path()?,
        };
        let config = Config::load_from(&config_path)?;

        let mut business =
            BusinessConfig::from_env().context("Failed to read drive settings from environment")?;
        config.drive.apply(&mut business);
        if let Some(url) = &overrides.base_url {
            business.api_base_url.clone_from(url);
        }
        if let Some(drive_id) = &overrides.drive_id {
            business.drive_id.clone_from(drive_id);
        }

        let credentials = FileCredentialStore::new(config_path.clone());
        let drive = Arc::new(DriveClient::new(&business, credentials));
        tracing::debug!(storage_url = drive.storage_url(), drive_id = %business.drive_id, "context ready");

        Ok(Self {
            config_path,
            config,
            business,
            drive,
        })
    }

    /// Layout of `kind` with the config file overrides applied.
    pub fn layout(&self, kind: PageKind) -> PageLayout {
        let layout = kind.layout();
        let Some(page) = self.config.page_override(kind.slug()) else {
            return layout;
        };
        match layout {
            PageLayout::Files(spec) => PageLayout::Files(page.apply_to_files(spec)),
            PageLayout::Config(spec) => PageLayout::Config(page.apply_to_config(spec)),
            PageLayout::Static(static_page) => {
                PageLayout::Static(page.apply_to_static(static_page))
            }
        }
    }

    pub fn file_page(&self, kind: PageKind) -> Result<FilePageController<Drive>> {
        match self.layout(kind) {
            PageLayout::Files(spec) => Ok(FilePageController::new(
                Arc::clone(&self.drive),
                self.business.drive_id.clone(),
                spec,
            )),
            PageLayout::Config(_) => {
                bail!("'{kind}' holds a single YAML document; use `drivedeck config`")
            }
            PageLayout::Static(_) => bail!("'{kind}' has no files"),
        }
    }

    pub fn config_page(&self) -> Result<ConfigPageController<Drive>> {
        match self.layout(PageKind::ObjectConfig) {
            PageLayout::Config(spec) => Ok(ConfigPageController::new(
                Arc::clone(&self.drive),
                self.business.drive_id.clone(),
                spec,
            )),
            _ => bail!("object-config is not a config page"),
        }
    }
}
