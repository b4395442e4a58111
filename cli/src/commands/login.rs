//! Token management commands.

use anyhow::{Context as _, Result, bail};
use inquire::Password;
use tracing::{info, instrument};

use crate::context::AppContext;
use crate::output::Output;

#[instrument(skip_all, name = "login")]
pub fn run_login(mut ctx: AppContext, token: Option<String>) -> Result<()> {
    let out = Output::new();

    let token = match token {
        Some(token) => token,
        None => Password::new("Token:")
            .without_confirmation()
            .with_help_message("Bearer token of the drive API")
            .prompt()
            .context("Failed to read token")?,
    };
    if token.trim().is_empty() {
        bail!("Token cannot be empty");
    }

    ctx.config.set_token(&token);
    ctx.config.save_to(&ctx.config_path)?;

    info!("token stored in {}", ctx.config_path.display());
    out.success(format!("Token saved to {}", ctx.config_path.display()));
    Ok(())
}

#[instrument(skip_all, name = "logout")]
pub fn run_logout(mut ctx: AppContext) -> Result<()> {
    let out = Output::new();

    if !ctx.config.has_token() {
        out.info("No token stored");
        return Ok(());
    }

    ctx.config.clear_auth();
    ctx.config.save_to(&ctx.config_path)?;
    out.success("Token removed");
    Ok(())
}

#[instrument(skip_all, name = "status")]
pub fn run_status(ctx: &AppContext) -> Result<()> {
    let out = Output::new();

    out.header("drivedeck");
    out.labeled_indent("Config", ctx.config_path.display(), 2);
    out.labeled_indent("Storage", ctx.drive.storage_url(), 2);
    out.labeled_indent("Drive", &ctx.business.drive_id, 2);
    let token = if ctx.config.has_token() {
        "stored"
    } else {
        "not set (requests are sent without credentials)"
    };
    out.labeled_indent("Token", token, 2);
    Ok(())
}
