//! Controller shared by all file pages.
//!
//! Composes the drive client, the collection model and the resolver for one
//! [`PageSpec`]. Every mutating call that changed something on the server is
//! followed by a refresh; nothing is updated optimistically.

use tokio_util::sync::CancellationToken;

use super::{PageSpec, SelectionMode};
use crate::collection::{FileCollection, FileCollectionModel};
use crate::drive::{DriveApi, DriveResult, TransportError, join_path};
use crate::notify::{Notification, Notifications};
use crate::resolver::{OverwriteDecision, Staged, UploadCandidate, UploadPlan, classify};
use crate::upload::{BatchUploadReport, upload_sequential};

/// A classified batch, ready for the overwrite decision.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagedUpload {
    pub plan: UploadPlan,
    /// Candidates beyond the first on a single-file page.
    pub too_many: Vec<Staged>,
}

impl StagedUpload {
    pub fn needs_confirmation(&self) -> bool {
        self.plan.has_conflicts()
    }

    /// Nothing would be uploaded whatever the decision.
    pub fn is_noop(&self) -> bool {
        self.plan.ready_to_upload.is_empty() && self.plan.conflicts_existing.is_empty()
    }
}

/// Outcome of deleting the selected files.
#[derive(Debug, Default)]
pub struct DeleteReport {
    pub deleted: Vec<String>,
    pub failed: Option<(String, TransportError)>,
    pub not_attempted: Vec<String>,
}

impl DeleteReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_none() && self.not_attempted.is_empty()
    }
}

#[derive(Debug)]
pub struct FilePageController<D> {
    spec: PageSpec,
    model: FileCollectionModel<D>,
    notifications: Notifications,
}

impl<D: DriveApi> FilePageController<D> {
    pub fn new(drive: D, drive_id: impl Into<String>, spec: PageSpec) -> Self {
        let model = FileCollectionModel::new(drive, drive_id, spec.base_path.clone());
        Self {
            spec,
            model,
            notifications: Notifications::default(),
        }
    }

    pub fn spec(&self) -> &PageSpec {
        &self.spec
    }

    pub fn collection(&self) -> &FileCollection {
        self.model.collection()
    }

    pub fn last_notification(&self) -> Option<&Notification> {
        self.notifications.last()
    }

    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain()
    }

    /// Reload the listing. A failure keeps the previous snapshot.
    pub async fn refresh(&mut self) -> DriveResult<&FileCollection> {
        if let Err(e) = self.model.refresh().await {
            self.notifications
                .push(Notification::error(format!("Failed to load file list: {e}")));
            return Err(e);
        }
        Ok(self.model.collection())
    }

    pub fn toggle_select(&mut self, path: &str) {
        self.model.toggle_select(path);
    }

    /// Select the listed file called `name`. Returns false when it is not listed.
    pub fn select_by_name(&mut self, name: &str) -> bool {
        let Some(path) = self.collection().find_by_name(name).map(|e| e.path.clone()) else {
            return false;
        };
        if !self.collection().is_selected(&path) {
            self.model.toggle_select(&path);
        }
        true
    }

    pub fn select_all(&mut self) {
        self.model.select_all();
    }

    pub fn clear_selection(&mut self) {
        self.model.clear_selection();
    }

    pub fn toggle_select_all(&mut self) {
        self.model.toggle_select_all();
    }

    pub fn is_all_selected(&self) -> bool {
        self.model.is_all_selected()
    }

    pub fn is_partially_selected(&self) -> bool {
        self.collection().is_partially_selected()
    }

    /// Classify a batch against the page policy and the current listing.
    pub fn stage(&self, candidates: Vec<UploadCandidate>) -> StagedUpload {
        let mut plan = classify(candidates, &self.spec.policy, self.collection());
        let mut too_many = Vec::new();

        if self.spec.mode == SelectionMode::Single {
            let first = plan
                .ready_to_upload
                .iter()
                .chain(&plan.conflicts_existing)
                .map(|staged| staged.index)
                .min();
            if let Some(first) = first {
                for bucket in [&mut plan.ready_to_upload, &mut plan.conflicts_existing] {
                    let (keep, extra): (Vec<_>, Vec<_>) =
                        bucket.drain(..).partition(|staged| staged.index == first);
                    *bucket = keep;
                    too_many.extend(extra);
                }
                too_many.sort_by_key(|staged| staged.index);
            }
        }

        StagedUpload { plan, too_many }
    }

    /// Upload the confirmed part of `staged` one file at a time, then refresh
    /// when anything reached the server.
    pub async fn upload(
        &mut self,
        staged: StagedUpload,
        decision: OverwriteDecision,
        cancel: &CancellationToken,
    ) -> BatchUploadReport {
        let StagedUpload { plan, too_many } = staged;

        for staged in &plan.wrong_type_rejected {
            self.notifications.push(Notification::warning(format!(
                "{} has a file type this page does not accept",
                staged.candidate.name
            )));
        }
        for staged in &plan.too_large_rejected {
            self.notifications.push(Notification::warning(format!(
                "{} exceeds the size limit of {} bytes",
                staged.candidate.name, self.spec.policy.max_size_bytes
            )));
        }
        if !too_many.is_empty() {
            self.notifications.push(Notification::warning(format!(
                "{} holds a single file; {} extra file(s) ignored",
                self.spec.title(),
                too_many.len()
            )));
        }

        let confirmed = plan.into_confirmed(decision);
        if confirmed.is_empty() {
            self.notifications
                .push(Notification::info("Nothing to upload"));
            return BatchUploadReport::default();
        }

        let report = upload_sequential(
            self.model.drive(),
            self.model.drive_id(),
            &self.spec.base_path,
            confirmed,
            cancel,
        )
        .await;

        match &report.failed {
            Some(failed) => self.notifications.push(Notification::error(format!(
                "Upload of {} failed after {} file(s) succeeded: {}",
                failed.name,
                report.succeeded.len(),
                failed.error
            ))),
            None if report.cancelled => self.notifications.push(Notification::warning(format!(
                "Upload cancelled after {} file(s)",
                report.succeeded.len()
            ))),
            None => self.notifications.push(Notification::success(format!(
                "Uploaded {} file(s)",
                report.succeeded.len()
            ))),
        }

        if !report.succeeded.is_empty() {
            // refresh errors are reported through the notification queue
            let _refreshed = self.refresh().await;
        }

        report
    }

    /// Delete the selected files one at a time, stopping at the first failure.
    pub async fn delete_selected(&mut self) -> DeleteReport {
        let paths: Vec<String> = self
            .collection()
            .selected_entries()
            .map(|e| e.path.clone())
            .collect();

        if paths.is_empty() {
            self.notifications
                .push(Notification::warning("Select the files to delete first"));
            return DeleteReport::default();
        }

        let mut report = DeleteReport::default();
        let mut remaining = paths.into_iter();
        for path in remaining.by_ref() {
            match self.model.drive().delete(self.model.drive_id(), &path).await {
                Ok(()) => report.deleted.push(path),
                Err(e) => {
                    report.failed = Some((path, e));
                    break;
                }
            }
        }
        report.not_attempted.extend(remaining);

        self.model.deselect(&report.deleted);

        match &report.failed {
            Some((path, e)) => self.notifications.push(Notification::error(format!(
                "Failed to delete {path} after {} deletion(s): {e}",
                report.deleted.len()
            ))),
            None => self.notifications.push(Notification::success(format!(
                "Deleted {} file(s)",
                report.deleted.len()
            ))),
        }

        if !report.deleted.is_empty() {
            let _refreshed = self.refresh().await;
        }

        report
    }

    /// Download a file of this page by name.
    pub async fn download(&mut self, name: &str) -> DriveResult<Vec<u8>> {
        let path = self
            .collection()
            .find_by_name(name)
            .map(|e| e.path.clone())
            .unwrap_or_else(|| join_path(&self.spec.base_path, name));

        let result = self
            .model
            .drive()
            .download(self.model.drive_id(), &path)
            .await;
        match &result {
            Ok(bytes) => self.notifications.push(Notification::success(format!(
                "Downloaded {name} ({} bytes)",
                bytes.len()
            ))),
            Err(e) => self
                .notifications
                .push(Notification::error(format!("Failed to download {name}: {e}"))),
        }
        result
    }
}
