//! Drive domain module: storage API client, its wire types and errors.

pub mod api;
pub mod error;
pub mod types;

pub use api::{DriveApi, DriveClient};
pub use error::{DriveOperation, DriveResult, TransportError, TransportErrorKind};
pub use types::{FileEntry, ServerMetadata, UploadFile, as_folder, join_path, leaf_name};
