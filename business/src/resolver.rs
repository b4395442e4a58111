//! Upload conflict resolution.
//!
//! [`classify`] partitions a batch of local files into four buckets against a
//! page's [`UploadPolicy`] and the current [`FileCollection`]:
//!
//! 1. extension not allowed -> `wrong_type_rejected`
//! 2. larger than the limit -> `too_large_rejected`
//! 3. name already listed   -> `conflicts_existing` (needs confirmation)
//! 4. otherwise             -> `ready_to_upload`
//!
//! Classification is pure and never reaches the network. Overwriting a
//! conflicting file is always an explicit [`OverwriteDecision`] of the caller.
//!
//! Conflicts are detected against the last refreshed listing only; a file
//! created remotely after that refresh is not seen as a conflict.

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::collection::FileCollection;
use crate::drive::types::OCTET_STREAM;

/// Content of a staged file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateContent {
    Bytes(Vec<u8>),
    /// Read from disk right before the file is uploaded.
    Path(PathBuf),
}

/// A local file staged for upload, not yet an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadCandidate {
    pub name: String,
    pub size_bytes: u64,
    pub mime_type: String,
    pub content: CandidateContent,
}

impl UploadCandidate {
    pub fn from_bytes(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            size_bytes: data.len() as u64,
            mime_type: OCTET_STREAM.to_owned(),
            content: CandidateContent::Bytes(data),
        }
    }

    /// Candidate backed by a file on disk; `size_bytes` comes from its metadata.
    pub fn from_path(name: impl Into<String>, path: impl Into<PathBuf>, size_bytes: u64) -> Self {
        Self {
            name: name.into(),
            size_bytes,
            mime_type: OCTET_STREAM.to_owned(),
            content: CandidateContent::Path(path.into()),
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    /// Lowercased text after the final `.`, if any.
    pub fn extension(&self) -> Option<String> {
        file_extension(&self.name)
    }
}

/// Lowercased extension of a file name (`"A.MP3"` -> `"mp3"`).
pub fn file_extension(name: &str) -> Option<String> {
    name.rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .filter(|ext| !ext.is_empty())
}

/// Extension allow-list of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedExtensions {
    Any,
    /// Lowercased extensions without the leading dot.
    Only(BTreeSet<String>),
}

impl AllowedExtensions {
    /// Accepts `"mp3"`, `".mp3"` and `".MP3"` alike.
    pub fn only<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::Only(
            extensions
                .into_iter()
                .map(|ext| ext.as_ref().trim_start_matches('.').to_lowercase())
                .collect(),
        )
    }

    pub fn allows(&self, extension: Option<&str>) -> bool {
        match self {
            Self::Any => true,
            Self::Only(set) => extension.is_some_and(|ext| set.contains(ext)),
        }
    }
}

/// Pre-flight rules a batch is classified against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    pub allowed_extensions: AllowedExtensions,
    pub max_size_bytes: u64,
}

impl UploadPolicy {
    pub fn new(allowed_extensions: AllowedExtensions, max_size_bytes: u64) -> Self {
        Self {
            allowed_extensions,
            max_size_bytes,
        }
    }

    pub fn unrestricted() -> Self {
        Self::new(AllowedExtensions::Any, u64::MAX)
    }

    pub fn classify_one(&self, candidate: &UploadCandidate, existing: &FileCollection) -> Bucket {
        let extension = candidate.extension();
        if !self.allowed_extensions.allows(extension.as_deref()) {
            Bucket::WrongTypeRejected
        } else if candidate.size_bytes > self.max_size_bytes {
            Bucket::TooLargeRejected
        } else if existing.contains_name(&candidate.name) {
            Bucket::ConflictsExisting
        } else {
            Bucket::ReadyToUpload
        }
    }
}

/// The bucket a candidate is classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    WrongTypeRejected,
    TooLargeRejected,
    ConflictsExisting,
    ReadyToUpload,
}

/// A candidate together with its position in the input batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Staged {
    pub index: usize,
    pub candidate: UploadCandidate,
}

/// Whether conflicting candidates replace the existing remote files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverwriteDecision {
    Overwrite,
    SkipExisting,
}

/// Classification result: every input candidate is in exactly one bucket,
/// and each bucket keeps input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadPlan {
    pub wrong_type_rejected: Vec<Staged>,
    pub too_large_rejected: Vec<Staged>,
    pub conflicts_existing: Vec<Staged>,
    pub ready_to_upload: Vec<Staged>,
}

impl UploadPlan {
    pub fn len(&self) -> usize {
        self.wrong_type_rejected.len()
            + self.too_large_rejected.len()
            + self.conflicts_existing.len()
            + self.ready_to_upload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn has_conflicts(&self) -> bool {
        !self.conflicts_existing.is_empty()
    }

    pub fn rejected_count(&self) -> usize {
        self.wrong_type_rejected.len() + self.too_large_rejected.len()
    }

    /// Candidates to submit, in input order.
    pub fn into_confirmed(self, decision: OverwriteDecision) -> Vec<UploadCandidate> {
        let mut confirmed = self.ready_to_upload;
        if decision == OverwriteDecision::Overwrite {
            confirmed.extend(self.conflicts_existing);
        }
        confirmed.sort_by_key(|staged| staged.index);
        confirmed.into_iter().map(|staged| staged.candidate).collect()
    }
}

/// Partition `batch` into the four buckets of an [`UploadPlan`].
pub fn classify(
    batch: Vec<UploadCandidate>,
    policy: &UploadPolicy,
    existing: &FileCollection,
) -> UploadPlan {
    let mut plan = UploadPlan::default();
    for (index, candidate) in batch.into_iter().enumerate() {
        let bucket = policy.classify_one(&candidate, existing);
        let staged = Staged { index, candidate };
        match bucket {
            Bucket::WrongTypeRejected => plan.wrong_type_rejected.push(staged),
            Bucket::TooLargeRejected => plan.too_large_rejected.push(staged),
            Bucket::ConflictsExisting => plan.conflicts_existing.push(staged),
            Bucket::ReadyToUpload => plan.ready_to_upload.push(staged),
        }
    }
    log::debug!(
        "classified {} candidate(s): {} ready, {} conflicting, {} rejected",
        plan.len(),
        plan.ready_to_upload.len(),
        plan.conflicts_existing.len(),
        plan.rejected_count()
    );
    plan
}
