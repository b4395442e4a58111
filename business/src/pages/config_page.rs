//! Editor for the single YAML document of the object config page.
//!
//! The controller keeps a text buffer and the last saved (or loaded) text.
//! Saving always validates first: a document that does not parse as YAML is
//! never uploaded.

use thiserror::Error;

use crate::drive::{DriveApi, TransportError, UploadFile, as_folder, join_path};
use crate::notify::{Notification, Notifications};

const MIB: u64 = 1024 * 1024;

/// Location and limits of the config document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSpec {
    pub title: String,
    pub folder: String,
    pub filename: String,
    pub mime_type: String,
    pub max_size_bytes: u64,
}

impl Default for ConfigSpec {
    fn default() -> Self {
        Self {
            title: "Object Config".to_owned(),
            folder: "/retail/object-config/".to_owned(),
            filename: "config.yml".to_owned(),
            mime_type: "application/x-yaml".to_owned(),
            max_size_bytes: MIB,
        }
    }
}

impl ConfigSpec {
    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = as_folder(&folder.into());
        self
    }

    /// Full drive path of the document.
    pub fn path(&self) -> String {
        join_path(&self.folder, &self.filename)
    }
}

#[derive(Debug, Error)]
pub enum ConfigPageError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("Invalid YAML: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),
    #[error("Config file is not valid UTF-8")]
    NotUtf8,
    #[error("Config is {size} bytes, the limit is {limit} bytes")]
    TooLarge { size: u64, limit: u64 },
}

#[derive(Debug)]
pub struct ConfigPageController<D> {
    drive: D,
    drive_id: String,
    spec: ConfigSpec,
    buffer: String,
    saved: String,
    dirty: bool,
    notifications: Notifications,
}

impl<D: DriveApi> ConfigPageController<D> {
    pub fn new(drive: D, drive_id: impl Into<String>, spec: ConfigSpec) -> Self {
        Self {
            drive,
            drive_id: drive_id.into(),
            spec,
            buffer: String::new(),
            saved: String::new(),
            dirty: false,
            notifications: Notifications::default(),
        }
    }

    pub fn spec(&self) -> &ConfigSpec {
        &self.spec
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    pub fn last_notification(&self) -> Option<&Notification> {
        self.notifications.last()
    }

    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain()
    }

    /// Download the document and make it both the buffer and the saved text.
    pub async fn load(&mut self) -> Result<&str, ConfigPageError> {
        let text = match self.fetch().await {
            Ok(text) => text,
            Err(e) => {
                self.notifications
                    .push(Notification::error(format!("Failed to load config: {e}")));
                return Err(e);
            }
        };
        self.saved.clone_from(&text);
        self.buffer = text;
        self.dirty = false;
        Ok(&self.buffer)
    }

    /// Replace the buffer. Marks the page dirty when the text differs from
    /// the saved version.
    pub fn edit(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
        self.dirty = self.buffer != self.saved;
    }

    /// Parse the buffer as YAML.
    pub fn validate(&self) -> Result<serde_yaml::Value, ConfigPageError> {
        let size = self.buffer.len() as u64;
        if size > self.spec.max_size_bytes {
            return Err(ConfigPageError::TooLarge {
                size,
                limit: self.spec.max_size_bytes,
            });
        }
        Ok(serde_yaml::from_str(&self.buffer)?)
    }

    /// Validate and upload the buffer over the remote document.
    pub async fn save(&mut self) -> Result<(), ConfigPageError> {
        if let Err(e) = self.validate() {
            self.notifications.push(Notification::error(e.to_string()));
            return Err(e);
        }

        let file = UploadFile::new(self.spec.filename.clone(), self.buffer.clone().into_bytes())
            .with_mime_type(self.spec.mime_type.clone());
        let folder = as_folder(&self.spec.folder);
        if let Err(e) = self.drive.upload(&self.drive_id, file, &folder).await {
            self.notifications
                .push(Notification::error(format!("Failed to save config: {e}")));
            return Err(e.into());
        }

        self.saved.clone_from(&self.buffer);
        self.dirty = false;
        self.notifications.push(Notification::success("Config saved"));
        Ok(())
    }

    /// Raw bytes of the remote document, independent of the buffer.
    pub async fn download(&mut self) -> Result<Vec<u8>, ConfigPageError> {
        match self.drive.download(&self.drive_id, &self.spec.path()).await {
            Ok(bytes) => Ok(bytes),
            Err(e) => {
                self.notifications
                    .push(Notification::error(format!("Failed to download config: {e}")));
                Err(e.into())
            }
        }
    }

    /// Save pending edits when the page is left. Returns whether a save ran.
    pub async fn flush_on_exit(&mut self) -> Result<bool, ConfigPageError> {
        if !self.dirty {
            return Ok(false);
        }
        log::debug!("saving unsaved config edits on exit");
        self.save().await?;
        Ok(true)
    }

    async fn fetch(&self) -> Result<String, ConfigPageError> {
        let bytes = self.drive.download(&self.drive_id, &self.spec.path()).await?;
        String::from_utf8(bytes).map_err(|_| ConfigPageError::NotUtf8)
    }
}
