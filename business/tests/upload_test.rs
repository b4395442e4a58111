//! Sequential upload against an in-memory drive.

mod common;

use common::FakeDrive;
use drivedeck_business::drive::DriveOperation;
use drivedeck_business::{UploadCandidate, UploadError, upload_sequential};
use tokio_util::sync::CancellationToken;

const MODELS: &str = "/retail/models/";

fn batch(names: &[&str]) -> Vec<UploadCandidate> {
    names
        .iter()
        .map(|name| UploadCandidate::from_bytes(*name, name.as_bytes().to_vec()))
        .collect()
}

#[tokio::test]
async fn test_uploads_every_file_in_order() {
    let drive = FakeDrive::new();
    let report = upload_sequential(
        &drive,
        "default",
        MODELS,
        batch(&["x.onnx", "y.onnx", "z.onnx"]),
        &CancellationToken::new(),
    )
    .await;

    assert!(report.is_complete());
    assert_eq!(
        report.succeeded_names().collect::<Vec<_>>(),
        ["x.onnx", "y.onnx", "z.onnx"]
    );
    assert_eq!(
        drive.calls(),
        [
            "upload /retail/models/x.onnx",
            "upload /retail/models/y.onnx",
            "upload /retail/models/z.onnx",
        ]
    );
    assert_eq!(
        drive.contents("/retail/models/y.onnx").as_deref(),
        Some(b"y.onnx".as_slice())
    );
}

#[tokio::test]
async fn test_first_failure_halts_the_batch() {
    let drive = FakeDrive::new();
    drive.fail(DriveOperation::Upload, "y.onnx");

    let report = upload_sequential(
        &drive,
        "default",
        MODELS,
        batch(&["x.onnx", "y.onnx", "z.onnx"]),
        &CancellationToken::new(),
    )
    .await;

    assert_eq!(report.succeeded_names().collect::<Vec<_>>(), ["x.onnx"]);
    let failed = report.failed.as_ref().expect("y fails");
    assert_eq!(failed.name, "y.onnx");
    assert!(matches!(failed.error, UploadError::Transport(ref e) if e.http_status() == Some(500)));
    assert_eq!(report.not_attempted, ["z.onnx"]);
    assert!(!report.cancelled);

    // x stays uploaded, z is never submitted
    assert_eq!(drive.paths(), ["/retail/models/x.onnx"]);
    assert_eq!(drive.calls().len(), 2);
}

#[tokio::test]
async fn test_cancelled_before_start_uploads_nothing() {
    let drive = FakeDrive::new();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let report = upload_sequential(&drive, "default", MODELS, batch(&["a.pt", "b.pt"]), &cancel).await;

    assert!(report.cancelled);
    assert!(report.succeeded.is_empty());
    assert_eq!(report.not_attempted, ["a.pt", "b.pt"]);
    assert!(drive.calls().is_empty());
}

#[tokio::test]
async fn test_cancellation_is_checked_between_files() {
    let drive = FakeDrive::new();
    let cancel = CancellationToken::new();
    drive.cancel_after_upload(cancel.clone());

    let report = upload_sequential(
        &drive,
        "default",
        MODELS,
        batch(&["a.pt", "b.pt", "c.pt"]),
        &cancel,
    )
    .await;

    assert!(report.cancelled);
    assert!(report.failed.is_none());
    assert_eq!(report.succeeded_names().collect::<Vec<_>>(), ["a.pt"]);
    assert_eq!(report.not_attempted, ["b.pt", "c.pt"]);
}

#[tokio::test]
async fn test_path_candidates_are_read_at_upload_time() {
    let dir = tempfile::tempdir().expect("temp dir");
    let file = dir.path().join("grip.yaml");
    std::fs::write(&file, "grip: 0.4\n").expect("write candidate");

    let drive = FakeDrive::new();
    let candidate = UploadCandidate::from_path("grip.yaml", &file, 10)
        .with_mime_type("application/x-yaml");
    let missing = UploadCandidate::from_path("gone.yaml", dir.path().join("gone.yaml"), 1);

    let report = upload_sequential(
        &drive,
        "default",
        "/retail/grasp-teach",
        vec![candidate, missing],
        &CancellationToken::new(),
    )
    .await;

    assert_eq!(report.succeeded_names().collect::<Vec<_>>(), ["grip.yaml"]);
    assert_eq!(
        drive.contents("/retail/grasp-teach/grip.yaml").as_deref(),
        Some(b"grip: 0.4\n".as_slice())
    );
    let failed = report.failed.expect("missing file fails");
    assert_eq!(failed.name, "gone.yaml");
    assert!(matches!(failed.error, UploadError::Read { .. }));
}
