//! In-memory drive shared by the integration tests.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use drivedeck_business::drive::{DriveApi, DriveOperation, DriveResult, join_path};
use drivedeck_business::{FileEntry, ServerMetadata, TransportError, UploadFile};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Default)]
struct State {
    files: BTreeMap<String, Vec<u8>>,
    calls: Vec<String>,
    failing: BTreeSet<(String, String)>,
    fail_list: bool,
    cancel_after_upload: Option<CancellationToken>,
}

/// Flat file store keyed by full path. Clones share the same store.
#[derive(Debug, Clone, Default)]
pub struct FakeDrive {
    state: Arc<Mutex<State>>,
}

fn op_key(operation: DriveOperation) -> String {
    operation.to_string()
}

#[allow(unused)]
impl FakeDrive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_files(files: &[(&str, &str)]) -> Self {
        let drive = Self::new();
        for (path, data) in files {
            drive.put(path, data.as_bytes());
        }
        drive
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("fake drive lock")
    }

    pub fn put(&self, path: &str, data: &[u8]) {
        self.state().files.insert(path.to_owned(), data.to_vec());
    }

    /// Make `operation` on `target` fail. Uploads match on the file name,
    /// everything else on the full path.
    pub fn fail(&self, operation: DriveOperation, target: &str) {
        self.state()
            .failing
            .insert((op_key(operation), target.to_owned()));
    }

    pub fn set_list_failing(&self, failing: bool) {
        self.state().fail_list = failing;
    }

    /// Cancel `token` right after the next successful upload.
    pub fn cancel_after_upload(&self, token: CancellationToken) {
        self.state().cancel_after_upload = Some(token);
    }

    /// Remove a file behind the client's back.
    pub fn remove(&self, path: &str) {
        self.state().files.remove(path);
    }

    pub fn paths(&self) -> Vec<String> {
        self.state().files.keys().cloned().collect()
    }

    pub fn contents(&self, path: &str) -> Option<Vec<u8>> {
        self.state().files.get(path).cloned()
    }

    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    fn record(&self, call: String) {
        self.state().calls.push(call);
    }

    fn is_failing(&self, operation: DriveOperation, target: &str) -> bool {
        self.state()
            .failing
            .contains(&(op_key(operation), target.to_owned()))
    }
}

fn internal_error(operation: DriveOperation) -> TransportError {
    TransportError::status(operation, 500, "Internal Server Error")
}

fn not_found(operation: DriveOperation) -> TransportError {
    TransportError::status(operation, 404, "Not Found")
}

#[async_trait]
impl DriveApi for FakeDrive {
    async fn list(&self, _drive_id: &str, path: &str) -> DriveResult<Vec<FileEntry>> {
        self.record(format!("list {path}"));
        let state = self.state();
        if state.fail_list {
            return Err(internal_error(DriveOperation::List));
        }
        Ok(state
            .files
            .iter()
            .filter_map(|(file, data)| {
                let rest = file.strip_prefix(path)?;
                (!rest.is_empty() && !rest.contains('/'))
                    .then(|| FileEntry::file(file.clone(), data.len() as u64))
            })
            .collect())
    }

    async fn upload(
        &self,
        _drive_id: &str,
        file: UploadFile,
        destination_folder: &str,
    ) -> DriveResult<ServerMetadata> {
        let path = join_path(destination_folder, &file.filename);
        self.record(format!("upload {path}"));
        if self.is_failing(DriveOperation::Upload, &file.filename) {
            return Err(internal_error(DriveOperation::Upload));
        }
        let mut state = self.state();
        state.files.insert(path.clone(), file.data);
        if let Some(token) = state.cancel_after_upload.take() {
            token.cancel();
        }
        Ok(ServerMetadata(serde_json::json!({ "path": path })))
    }

    async fn delete(&self, _drive_id: &str, path: &str) -> DriveResult<()> {
        self.record(format!("delete {path}"));
        if self.is_failing(DriveOperation::Delete, path) {
            return Err(internal_error(DriveOperation::Delete));
        }
        self.state()
            .files
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| not_found(DriveOperation::Delete))
    }

    async fn download(&self, _drive_id: &str, path: &str) -> DriveResult<Vec<u8>> {
        self.record(format!("download {path}"));
        if self.is_failing(DriveOperation::Download, path) {
            return Err(internal_error(DriveOperation::Download));
        }
        self.contents(path)
            .ok_or_else(|| not_found(DriveOperation::Download))
    }

    async fn create_dir(&self, _drive_id: &str, path: &str) -> DriveResult<()> {
        self.record(format!("mkdir {path}"));
        Ok(())
    }

    async fn copy(
        &self,
        _drive_id: &str,
        old_path: &str,
        new_path: &str,
        _overwrite: bool,
    ) -> DriveResult<()> {
        self.record(format!("copy {old_path} {new_path}"));
        let data = self
            .contents(old_path)
            .ok_or_else(|| not_found(DriveOperation::Copy))?;
        self.put(new_path, &data);
        Ok(())
    }

    async fn move_entry(
        &self,
        _drive_id: &str,
        old_path: &str,
        new_path: &str,
        _overwrite: bool,
    ) -> DriveResult<()> {
        self.record(format!("move {old_path} {new_path}"));
        let data = self
            .state()
            .files
            .remove(old_path)
            .ok_or_else(|| not_found(DriveOperation::Move))?;
        self.put(new_path, &data);
        Ok(())
    }
}
