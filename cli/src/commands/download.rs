//! Download a file of a page.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use drivedeck_business::PageKind;
use tracing::instrument;

use crate::context::AppContext;
use crate::output::Output;
use crate::utils::{download_target, format_size};

#[instrument(skip_all, name = "get", fields(page = %page, name = name.as_str()))]
pub async fn run_get(
    ctx: &AppContext,
    page: PageKind,
    name: String,
    output: Option<PathBuf>,
) -> Result<()> {
    let out = Output::new();
    let mut controller = ctx.file_page(page)?;

    // a failed listing still lets the download try the page folder
    if controller.refresh().await.is_err() {
        controller.drain_notifications();
    }

    let bytes = controller.download(&name).await?;
    let target = download_target(output, &name);
    tokio::fs::write(&target, &bytes)
        .await
        .with_context(|| format!("Failed to write {}", target.display()))?;

    out.success(format!(
        "Saved {name} to {} ({})",
        target.display(),
        format_size(bytes.len() as u64)
    ));
    Ok(())
}
