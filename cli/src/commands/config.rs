//! Object config YAML commands.

use std::path::Path;

use anyhow::{Context as _, Result};
use drivedeck_business::ConfigPageError;
use tracing::instrument;

use crate::cli::ConfigAction;
use crate::context::AppContext;
use crate::output::Output;
use crate::utils::{download_target, format_size};

async fn read_local(file: &Path) -> Result<String> {
    tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))
}

#[instrument(skip_all, name = "config")]
pub async fn run_config(ctx: &AppContext, action: ConfigAction) -> Result<()> {
    let out = Output::new();
    let mut page = ctx.config_page()?;

    match action {
        ConfigAction::Show => {
            let text = page.load().await?;
            out.print(text.trim_end());
        }
        ConfigAction::Download { output } => {
            let bytes = page.download().await?;
            let target = download_target(output, &page.spec().filename);
            tokio::fs::write(&target, &bytes)
                .await
                .with_context(|| format!("Failed to write {}", target.display()))?;
            out.success(format!(
                "Saved {} to {} ({})",
                page.spec().path(),
                target.display(),
                format_size(bytes.len() as u64)
            ));
        }
        ConfigAction::Apply { file } => {
            let text = read_local(&file).await?;
            let loaded = page.load().await.map(|_| ());
            match loaded {
                Ok(()) => {}
                Err(ConfigPageError::Transport(e)) if e.http_status() == Some(404) => {
                    page.drain_notifications();
                    out.info(format!("{} does not exist yet, creating it", page.spec().path()));
                }
                Err(e) => return Err(e.into()),
            }
            page.edit(text);
            if !page.has_unsaved_changes() {
                out.info("Remote config already matches, nothing uploaded");
                return Ok(());
            }
            let saved = page.flush_on_exit().await;
            out.notifications(&page.drain_notifications());
            saved?;
        }
        ConfigAction::Check { file } => {
            page.edit(read_local(&file).await?);
            page.validate()
                .with_context(|| format!("{} is not a valid config", file.display()))?;
            out.success(format!("{} is valid YAML", file.display()));
        }
    }
    Ok(())
}
