//! Delete files of a page.

use std::io::IsTerminal as _;

use anyhow::{Context as _, Result, bail};
use drivedeck_business::PageKind;
use inquire::Confirm;
use tracing::instrument;

use crate::context::AppContext;
use crate::output::Output;

fn confirm_delete(count: usize, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        bail!("Refusing to delete {count} file(s) without --yes");
    }
    Confirm::new(&format!("Delete {count} file(s)?"))
        .with_default(false)
        .prompt()
        .context("Failed to read confirmation")
}

#[instrument(skip_all, name = "remove", fields(page = %page, all))]
pub async fn run_remove(
    ctx: &AppContext,
    page: PageKind,
    names: Vec<String>,
    all: bool,
    yes: bool,
) -> Result<()> {
    let out = Output::new();
    let mut controller = ctx.file_page(page)?;
    controller.refresh().await?;

    if all {
        controller.select_all();
    } else {
        for name in &names {
            if !controller.select_by_name(name) {
                out.warning(format!("{name} is not in {}", controller.spec().base_path));
            }
        }
    }

    let count = controller.collection().selected_paths().len();
    if count > 0 && !confirm_delete(count, yes)? {
        out.info("Nothing deleted");
        return Ok(());
    }

    let report = controller.delete_selected().await;
    out.notifications(&controller.drain_notifications());
    for path in &report.not_attempted {
        out.dim(format!("  not deleted: {path}"));
    }

    if report.failed.is_some() {
        bail!("{} of {count} file(s) deleted", report.deleted.len());
    }
    Ok(())
}
