use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use chrono::{DateTime, Local, Utc};
use drivedeck_business::UploadCandidate;

/// Stage a local file for upload without reading its content.
pub async fn candidate_from_path(path: &Path) -> Result<UploadCandidate> {
    let name = path
        .file_name()
        .context("Invalid filename")?
        .to_string_lossy()
        .to_string();

    let metadata = tokio::fs::metadata(path)
        .await
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    let mime_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .to_string();

    Ok(UploadCandidate::from_path(name, path, metadata.len()).with_mime_type(mime_type))
}

/// Local destination of a download: `output`, or the file name in the
/// working directory.
pub fn download_target(output: Option<PathBuf>, name: &str) -> PathBuf {
    output.unwrap_or_else(|| PathBuf::from(name))
}

pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    let size = bytes as f64;
    if bytes < 1024 {
        format!("{bytes} B")
    } else if size < KB * KB {
        format!("{:.1} KB", size / KB)
    } else if size < KB * KB * KB {
        format!("{:.1} MB", size / (KB * KB))
    } else {
        format!("{:.2} GB", size / (KB * KB * KB))
    }
}

pub fn format_timestamp(at: Option<DateTime<Utc>>) -> String {
    at.map(|at| at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_owned())
}
