//! Upload local files to a page.

use std::io::IsTerminal as _;
use std::path::PathBuf;

use anyhow::{Context as _, Result, bail};
use drivedeck_business::pages::StagedUpload;
use drivedeck_business::{OverwriteDecision, PageKind};
use inquire::Confirm;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::context::AppContext;
use crate::output::Output;
use crate::utils::candidate_from_path;

/// Resolve the overwrite decision, asking only when conflicts exist and no
/// flag decided it.
fn decide(staged: &StagedUpload, overwrite: bool, skip_existing: bool) -> Result<OverwriteDecision> {
    if overwrite {
        return Ok(OverwriteDecision::Overwrite);
    }
    if skip_existing || !staged.needs_confirmation() {
        return Ok(OverwriteDecision::SkipExisting);
    }

    let names = staged
        .plan
        .conflicts_existing
        .iter()
        .map(|s| s.candidate.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    if !std::io::stdin().is_terminal() {
        bail!("Already on the drive: {names}. Pass --overwrite or --skip-existing");
    }

    let confirmed = Confirm::new(&format!("Overwrite existing {names}?"))
        .with_default(false)
        .with_help_message("No keeps the remote files and uploads the rest")
        .prompt()
        .context("Failed to read confirmation")?;

    Ok(if confirmed {
        OverwriteDecision::Overwrite
    } else {
        OverwriteDecision::SkipExisting
    })
}

#[instrument(skip_all, name = "upload", fields(page = %page, file_count = files.len()))]
pub async fn run_upload(
    ctx: &AppContext,
    page: PageKind,
    files: Vec<PathBuf>,
    overwrite: bool,
    skip_existing: bool,
) -> Result<()> {
    let out = Output::new();
    let mut controller = ctx.file_page(page)?;

    // conflicts are detected against this listing
    controller.refresh().await?;

    let mut candidates = Vec::with_capacity(files.len());
    for path in &files {
        candidates.push(candidate_from_path(path).await?);
    }

    let staged = controller.stage(candidates);
    let decision = decide(&staged, overwrite, skip_existing)?;

    let cancel = CancellationToken::new();
    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };

    let report = controller.upload(staged, decision, &cancel).await;
    interrupt.abort();

    out.notifications(&controller.drain_notifications());
    for name in &report.not_attempted {
        out.dim(format!("  not uploaded: {name}"));
    }

    if report.failed.is_some() || report.cancelled {
        bail!(
            "{} of {} file(s) uploaded",
            report.succeeded.len(),
            report.succeeded.len() + report.not_attempted.len() + usize::from(report.failed.is_some())
        );
    }
    Ok(())
}
