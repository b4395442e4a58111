#![allow(clippy::exit)]

mod cli;
mod commands;
mod config;
mod context;
mod output;
mod timing;
mod utils;

use anyhow::Result;
use clap::Parser as _;
use tracing::error;

use crate::cli::{Cli, Commands};
use crate::context::{AppContext, Overrides};
use crate::output::Output;

async fn run(cli: Cli) -> Result<()> {
    let overrides = Overrides {
        base_url: cli.base_url,
        drive_id: cli.drive,
        config_path: cli.config,
    };

    if let Commands::Completions { shell } = cli.command {
        commands::generate_completions(shell);
        return Ok(());
    }

    let ctx = AppContext::load(&overrides)?;

    match cli.command {
        Commands::Login { token } => commands::run_login(ctx, token),
        Commands::Logout => commands::run_logout(ctx),
        Commands::Status => commands::run_status(&ctx),
        Commands::Pages => commands::run_pages(&ctx),
        Commands::Ls { page } => commands::run_list(&ctx, page).await,
        Commands::Upload {
            page,
            files,
            overwrite,
            skip_existing,
        } => commands::run_upload(&ctx, page, files, overwrite, skip_existing).await,
        Commands::Rm {
            page,
            names,
            all,
            yes,
        } => commands::run_remove(&ctx, page, names, all, yes).await,
        Commands::Get { page, name, output } => commands::run_get(&ctx, page, name, output).await,
        Commands::Config { action } => commands::run_config(&ctx, action).await,
        Commands::Mkdir { path } => commands::run_mkdir(&ctx, path).await,
        Commands::Cp {
            from,
            to,
            overwrite,
        } => commands::run_copy(&ctx, from, to, overwrite).await,
        Commands::Mv {
            from,
            to,
            overwrite,
        } => commands::run_move(&ctx, from, to, overwrite).await,
        Commands::Completions { .. } => Ok(()),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    timing::init_tracing(cli.verbose, cli.timing);

    if let Err(e) = run(cli).await {
        error!("{e:#}");
        Output::new().error(format!("{e:#}"));
        std::process::exit(1);
    }
}
