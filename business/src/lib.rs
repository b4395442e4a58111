//! File management core of the drivedeck operator panel.
//!
//! A typed client for the drive storage API, an immutable file collection
//! with selection, upload classification and sequential upload, and the
//! controllers behind each panel page.

pub mod collection;
pub mod config;
pub mod credentials;
pub mod drive;
pub mod http;
pub mod notify;
pub mod pages;
pub mod resolver;
pub mod upload;

pub use collection::{FileCollection, FileCollectionModel, RefreshOrdering, reconcile_selection};
pub use config::{BusinessConfig, ConfigError};
pub use credentials::{Anonymous, CredentialProvider, SharedToken};
pub use drive::{
    DriveApi, DriveClient, DriveOperation, DriveResult, FileEntry, ServerMetadata,
    TransportError, TransportErrorKind, UploadFile,
};
pub use notify::{Notification, Notifications, Severity};
pub use pages::{
    ConfigPageController, ConfigPageError, ConfigSpec, FilePageController, PageKind, PageLayout,
    PageSpec, SelectionMode, StaticPage,
};
pub use resolver::{
    AllowedExtensions, OverwriteDecision, UploadCandidate, UploadPlan, UploadPolicy, classify,
};
pub use upload::{BatchUploadReport, UploadError, upload_sequential};
