//! Drive storage API client.
//!
//! One method per primitive action against a named drive. Each call is a
//! single request: no retries, no batching, no local state. The bearer token
//! is read from the injected [`CredentialProvider`] on every call.
//!
//! Any non-2xx response becomes a [`TransportError`] carrying the HTTP status
//! text, including responses the server uses for "not found" on delete.

use std::sync::Arc;

use async_trait::async_trait;

use super::error::{DriveOperation, DriveResult, TransportError, TransportErrorKind};
use super::types::{
    CreateDirRequest, FileEntry, ListResponse, ServerMetadata, TransferRequest, UploadFile,
    as_folder,
};
use crate::BusinessConfig;
use crate::credentials::{CredentialProvider, authorization_value};
use crate::http::{Client, MultipartBody, RequestBuilder, Response};

/// Multipart field carrying the file content.
pub const ATTACHMENT_FIELD: &str = "attachment";
/// Multipart field carrying the destination folder.
pub const PATH_FIELD: &str = "path";

/// Primitive operations of a drive backend.
///
/// Implemented by [`DriveClient`] for the HTTP API; the collection model,
/// upload executor and page controllers only depend on this trait.
#[async_trait]
pub trait DriveApi: Send + Sync {
    /// List the entries directly under `path`. An empty drive is `Ok(vec![])`.
    async fn list(&self, drive_id: &str, path: &str) -> DriveResult<Vec<FileEntry>>;

    /// Upload `file` into `destination_folder`; the server names the stored
    /// object after `file.filename`.
    async fn upload(
        &self,
        drive_id: &str,
        file: UploadFile,
        destination_folder: &str,
    ) -> DriveResult<ServerMetadata>;

    async fn delete(&self, drive_id: &str, path: &str) -> DriveResult<()>;

    async fn download(&self, drive_id: &str, path: &str) -> DriveResult<Vec<u8>>;

    async fn create_dir(&self, drive_id: &str, path: &str) -> DriveResult<()>;

    async fn copy(
        &self,
        drive_id: &str,
        old_path: &str,
        new_path: &str,
        overwrite: bool,
    ) -> DriveResult<()>;

    async fn move_entry(
        &self,
        drive_id: &str,
        old_path: &str,
        new_path: &str,
        overwrite: bool,
    ) -> DriveResult<()>;
}

#[async_trait]
impl<T: DriveApi + ?Sized> DriveApi for Arc<T> {
    async fn list(&self, drive_id: &str, path: &str) -> DriveResult<Vec<FileEntry>> {
        (**self).list(drive_id, path).await
    }

    async fn upload(
        &self,
        drive_id: &str,
        file: UploadFile,
        destination_folder: &str,
    ) -> DriveResult<ServerMetadata> {
        (**self).upload(drive_id, file, destination_folder).await
    }

    async fn delete(&self, drive_id: &str, path: &str) -> DriveResult<()> {
        (**self).delete(drive_id, path).await
    }

    async fn download(&self, drive_id: &str, path: &str) -> DriveResult<Vec<u8>> {
        (**self).download(drive_id, path).await
    }

    async fn create_dir(&self, drive_id: &str, path: &str) -> DriveResult<()> {
        (**self).create_dir(drive_id, path).await
    }

    async fn copy(
        &self,
        drive_id: &str,
        old_path: &str,
        new_path: &str,
        overwrite: bool,
    ) -> DriveResult<()> {
        (**self).copy(drive_id, old_path, new_path, overwrite).await
    }

    async fn move_entry(
        &self,
        drive_id: &str,
        old_path: &str,
        new_path: &str,
        overwrite: bool,
    ) -> DriveResult<()> {
        (**self)
            .move_entry(drive_id, old_path, new_path, overwrite)
            .await
    }
}

/// HTTP client for the drive storage API.
#[derive(Clone)]
pub struct DriveClient {
    http: Client,
    storage_url: String,
    credentials: Arc<dyn CredentialProvider>,
}

impl std::fmt::Debug for DriveClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriveClient")
            .field("storage_url", &self.storage_url)
            .field("has_token", &self.credentials.token().is_some())
            .finish()
    }
}

impl DriveClient {
    pub fn new(config: &BusinessConfig, credentials: impl CredentialProvider + 'static) -> Self {
        Self::with_http(config, Arc::new(credentials), Client::new())
    }

    pub fn with_http(
        config: &BusinessConfig,
        credentials: Arc<dyn CredentialProvider>,
        http: Client,
    ) -> Self {
        Self {
            http,
            storage_url: config.storage_url(),
            credentials,
        }
    }

    pub fn storage_url(&self) -> &str {
        &self.storage_url
    }

    fn endpoint(&self, drive_id: &str, action: &str) -> String {
        format!("{}/{drive_id}/{action}", self.storage_url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let token = self.credentials.token();
        request.header("authorization", authorization_value(token.as_deref()))
    }

    /// Send `request` and turn anything but a 2xx response into an error.
    async fn execute(
        &self,
        operation: DriveOperation,
        request: RequestBuilder,
    ) -> DriveResult<Response> {
        let response = self.authorize(request).send().await.map_err(|e| {
            log::warn!("{operation} failed before a response: {e}");
            TransportError::new(operation, TransportErrorKind::Network, e.message)
        })?;

        if !response.is_success() {
            log::warn!("{operation} returned status {}", response.status);
            return Err(TransportError::status(
                operation,
                response.status,
                response.status_message(),
            ));
        }

        Ok(response)
    }

    fn encode_error(operation: DriveOperation, e: &serde_json::Error) -> TransportError {
        TransportError::new(
            operation,
            TransportErrorKind::Encode,
            format!("Failed to serialize request: {e}"),
        )
    }

    async fn transfer(
        &self,
        operation: DriveOperation,
        action: &str,
        drive_id: &str,
        body: &TransferRequest,
    ) -> DriveResult<()> {
        let request = self
            .http
            .post(self.endpoint(drive_id, action))
            .json(body)
            .map_err(|e| Self::encode_error(operation, &e))?;

        self.execute(operation, request).await?;
        Ok(())
    }
}

#[async_trait]
impl DriveApi for DriveClient {
    /// GET `{base}/{driveId}/list?path=...`
    async fn list(&self, drive_id: &str, path: &str) -> DriveResult<Vec<FileEntry>> {
        let request = self
            .http
            .get(self.endpoint(drive_id, "list"))
            .query("path", path);

        let response = self.execute(DriveOperation::List, request).await?;

        let listing: ListResponse = response.json().map_err(|e| {
            TransportError::new(
                DriveOperation::List,
                TransportErrorKind::Decode,
                format!("Failed to parse list response: {e}"),
            )
        })?;

        let entries = listing.data.unwrap_or_default();
        log::debug!("listed {} entries under {path}", entries.len());
        Ok(entries)
    }

    /// POST `{base}/{driveId}/upload`
    /// Multipart: `attachment` = file content, `path` = destination folder.
    async fn upload(
        &self,
        drive_id: &str,
        file: UploadFile,
        destination_folder: &str,
    ) -> DriveResult<ServerMetadata> {
        let UploadFile {
            filename,
            mime_type,
            data,
        } = file;
        let size = data.len();

        let form = MultipartBody::new()
            .file(ATTACHMENT_FIELD, filename.clone(), mime_type, data)
            .text(PATH_FIELD, as_folder(destination_folder));

        let request = self
            .http
            .post(self.endpoint(drive_id, "upload"))
            .multipart(form);

        let response = self.execute(DriveOperation::Upload, request).await?;
        log::info!("uploaded {filename} ({size} bytes) to {destination_folder}");

        if response.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(ServerMetadata::default());
        }

        response.json().map_err(|e| {
            TransportError::new(
                DriveOperation::Upload,
                TransportErrorKind::Decode,
                format!("Failed to parse upload response: {e}"),
            )
        })
    }

    /// DELETE `{base}/{driveId}/file?path=...`
    async fn delete(&self, drive_id: &str, path: &str) -> DriveResult<()> {
        let request = self
            .http
            .delete(self.endpoint(drive_id, "file"))
            .query("path", path);

        self.execute(DriveOperation::Delete, request).await?;
        log::info!("deleted {path}");
        Ok(())
    }

    /// GET `{base}/{driveId}/download?path=...`
    async fn download(&self, drive_id: &str, path: &str) -> DriveResult<Vec<u8>> {
        let request = self
            .http
            .get(self.endpoint(drive_id, "download"))
            .query("path", path);

        let response = self.execute(DriveOperation::Download, request).await?;
        Ok(response.body)
    }

    /// POST `{base}/{driveId}/dir`
    /// Body: `{ "path": "..." }`
    async fn create_dir(&self, drive_id: &str, path: &str) -> DriveResult<()> {
        let operation = DriveOperation::CreateDirectory;
        let request = self
            .http
            .post(self.endpoint(drive_id, "dir"))
            .json(&CreateDirRequest {
                path: path.to_owned(),
            })
            .map_err(|e| Self::encode_error(operation, &e))?;

        self.execute(operation, request).await?;
        Ok(())
    }

    /// POST `{base}/{driveId}/copy`
    /// Body: `{ "oldPath": "...", "newPath": "...", "overWrite": bool }`
    async fn copy(
        &self,
        drive_id: &str,
        old_path: &str,
        new_path: &str,
        overwrite: bool,
    ) -> DriveResult<()> {
        let body = TransferRequest {
            old_path: old_path.to_owned(),
            new_path: new_path.to_owned(),
            over_write: overwrite,
        };
        self.transfer(DriveOperation::Copy, "copy", drive_id, &body)
            .await
    }

    /// POST `{base}/{driveId}/move`
    /// Body: `{ "oldPath": "...", "newPath": "...", "overWrite": bool }`
    async fn move_entry(
        &self,
        drive_id: &str,
        old_path: &str,
        new_path: &str,
        overwrite: bool,
    ) -> DriveResult<()> {
        let body = TransferRequest {
            old_path: old_path.to_owned(),
            new_path: new_path.to_owned(),
            over_write: overwrite,
        };
        self.transfer(DriveOperation::Move, "move", drive_id, &body)
            .await
    }
}
