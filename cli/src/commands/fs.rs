//! Raw drive path operations that no page exposes.

use anyhow::Result;
use drivedeck_business::DriveApi as _;
use tracing::instrument;

use crate::context::AppContext;
use crate::output::Output;

#[instrument(skip_all, name = "mkdir", fields(path = path.as_str()))]
pub async fn run_mkdir(ctx: &AppContext, path: String) -> Result<()> {
    ctx.drive.create_dir(&ctx.business.drive_id, &path).await?;
    Output::new().success(format!("Created {path}"));
    Ok(())
}

#[instrument(skip_all, name = "copy", fields(from = from.as_str(), to = to.as_str()))]
pub async fn run_copy(ctx: &AppContext, from: String, to: String, overwrite: bool) -> Result<()> {
    ctx.drive
        .copy(&ctx.business.drive_id, &from, &to, overwrite)
        .await?;
    Output::new().success(format!("Copied {from} to {to}"));
    Ok(())
}

#[instrument(skip_all, name = "move", fields(from = from.as_str(), to = to.as_str()))]
pub async fn run_move(ctx: &AppContext, from: String, to: String, overwrite: bool) -> Result<()> {
    ctx.drive
        .move_entry(&ctx.business.drive_id, &from, &to, overwrite)
        .await?;
    Output::new().success(format!("Moved {from} to {to}"));
    Ok(())
}
