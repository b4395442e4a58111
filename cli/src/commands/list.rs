//! List the files of a page.

use anyhow::Result;
use drivedeck_business::PageKind;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tracing::instrument;

use crate::context::AppContext;
use crate::output::Output;
use crate::utils::{format_size, format_timestamp};

#[derive(Tabled)]
struct FileRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

#[instrument(skip_all, name = "list", fields(page = %page))]
pub async fn run_list(ctx: &AppContext, page: PageKind) -> Result<()> {
    let out = Output::new();
    let mut controller = ctx.file_page(page)?;

    controller.refresh().await?;
    let collection = controller.collection();

    if collection.is_empty() {
        out.dim(format!("No files in {}.", controller.spec().base_path));
        return Ok(());
    }

    let rows: Vec<FileRow> = collection
        .entries()
        .iter()
        .map(|entry| FileRow {
            name: entry.name.clone(),
            size: format_size(entry.size_bytes),
            updated: format_timestamp(entry.last_updated_at),
        })
        .collect();
    let total = rows.len();

    let mut table = Table::new(&rows);
    table.with(Style::rounded());
    out.header(page.title());
    out.print(table);
    out.total("Total", total);
    Ok(())
}
