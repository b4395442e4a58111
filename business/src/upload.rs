//! Sequential upload of confirmed candidates.
//!
//! Files are submitted one at a time in input order. The first failure halts
//! the batch; files uploaded before it are not rolled back, so a report with
//! both successes and a failure is an expected outcome. Cancellation is
//! cooperative and only checked between files.

use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::drive::{DriveApi, ServerMetadata, TransportError, UploadFile};
use crate::resolver::{CandidateContent, UploadCandidate};

#[derive(Debug, Error)]
pub enum UploadError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("Failed to read {name}: {source}")]
    Read {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// A file the server accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    pub name: String,
    pub metadata: ServerMetadata,
}

/// The file that halted the batch.
#[derive(Debug)]
pub struct FailedUpload {
    pub name: String,
    pub error: UploadError,
}

/// Outcome of one sequential batch.
#[derive(Debug, Default)]
pub struct BatchUploadReport {
    pub succeeded: Vec<UploadedFile>,
    pub failed: Option<FailedUpload>,
    pub not_attempted: Vec<String>,
    pub cancelled: bool,
}

impl BatchUploadReport {
    /// Every candidate was uploaded.
    pub fn is_complete(&self) -> bool {
        self.failed.is_none() && !self.cancelled && self.not_attempted.is_empty()
    }

    pub fn succeeded_names(&self) -> impl Iterator<Item = &str> {
        self.succeeded.iter().map(|f| f.name.as_str())
    }
}

async fn load(candidate: UploadCandidate) -> Result<UploadFile, UploadError> {
    let UploadCandidate {
        name,
        mime_type,
        content,
        ..
    } = candidate;
    let data = match content {
        CandidateContent::Bytes(data) => data,
        CandidateContent::Path(path) => match tokio::fs::read(&path).await {
            Ok(data) => data,
            Err(source) => return Err(UploadError::Read { name, source }),
        },
    };
    Ok(UploadFile::new(name, data).with_mime_type(mime_type))
}

/// Upload `candidates` into `destination_folder`, one at a time.
pub async fn upload_sequential<D: DriveApi + ?Sized>(
    drive: &D,
    drive_id: &str,
    destination_folder: &str,
    candidates: Vec<UploadCandidate>,
    cancel: &CancellationToken,
) -> BatchUploadReport {
    let mut report = BatchUploadReport::default();
    let total = candidates.len();
    let mut remaining = candidates.into_iter();

    for candidate in remaining.by_ref() {
        if cancel.is_cancelled() {
            log::info!("upload batch cancelled after {} file(s)", report.succeeded.len());
            report.cancelled = true;
            report.not_attempted.push(candidate.name);
            break;
        }

        let name = candidate.name.clone();
        let result = match load(candidate).await {
            Ok(file) => drive
                .upload(drive_id, file, destination_folder)
                .await
                .map_err(UploadError::from),
            Err(e) => Err(e),
        };

        match result {
            Ok(metadata) => {
                log::debug!(
                    "uploaded {}/{total}: {name}",
                    report.succeeded.len() + 1
                );
                report.succeeded.push(UploadedFile { name, metadata });
            }
            Err(error) => {
                log::warn!(
                    "upload of {name} failed after {} success(es): {error}",
                    report.succeeded.len()
                );
                report.failed = Some(FailedUpload { name, error });
                break;
            }
        }
    }

    report.not_attempted.extend(remaining.map(|c| c.name));
    report
}
