//! Page catalogue command.

use anyhow::Result;
use drivedeck_business::{AllowedExtensions, PageKind, PageLayout, SelectionMode};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::context::AppContext;
use crate::output::Output;
use crate::utils::format_size;

#[derive(Tabled)]
struct PageRow {
    #[tabled(rename = "Page")]
    slug: &'static str,
    #[tabled(rename = "Title")]
    title: &'static str,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Accepts")]
    accepts: String,
    #[tabled(rename = "Max size")]
    max_size: String,
}

fn accepts(extensions: &AllowedExtensions, mode: SelectionMode) -> String {
    let list = match extensions {
        AllowedExtensions::Any => "any".to_owned(),
        AllowedExtensions::Only(set) => set.iter().cloned().collect::<Vec<_>>().join(", "),
    };
    match mode {
        SelectionMode::Multiple => list,
        SelectionMode::Single => format!("{list} (one file)"),
    }
}

fn row(kind: PageKind, layout: PageLayout) -> PageRow {
    let (location, accepts, max_size) = match layout {
        PageLayout::Files(spec) => (
            spec.base_path,
            accepts(&spec.policy.allowed_extensions, spec.mode),
            format_size(spec.policy.max_size_bytes),
        ),
        PageLayout::Config(spec) => (
            spec.path(),
            "YAML".to_owned(),
            format_size(spec.max_size_bytes),
        ),
        PageLayout::Static(page) => (
            page.link.unwrap_or_else(|| "-".to_owned()),
            "-".to_owned(),
            "-".to_owned(),
        ),
    };
    PageRow {
        slug: kind.slug(),
        title: kind.title(),
        location,
        accepts,
        max_size,
    }
}

pub fn run_pages(ctx: &AppContext) -> Result<()> {
    let out = Output::new();

    let rows: Vec<PageRow> = PageKind::ALL
        .into_iter()
        .map(|kind| row(kind, ctx.layout(kind)))
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::rounded());
    out.print(table);

    if let PageLayout::Static(page) = ctx.layout(PageKind::GoodsManager) {
        out.dim(page.body);
    }
    Ok(())
}
