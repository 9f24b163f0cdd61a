//! List command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use recipebook_client::{FetchOutcome, ListOrchestrator};
use recipebook_core::PageRequest;

use crate::app::App;
use crate::output;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Page number, starting at 1
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,

    /// Recipes per page
    #[arg(long, default_value_t = PageRequest::DEFAULT_PAGE_SIZE)]
    pub size: u32,

    /// Print the page as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(app: &App, args: ListArgs) -> Result<()> {
    let records = app.records()?;
    let request = PageRequest::new(args.page - 1, args.size).context("Invalid page")?;

    let (list, initial) = ListOrchestrator::start(records, request);
    if let FetchOutcome::Failed(err) = initial.await {
        return Err(app.failure(err).context("Failed to list recipes"));
    }

    let view = list.view();

    if args.json {
        return output::json_pretty(&view.page);
    }

    if view.page.is_empty() {
        eprintln!("{}", "No recipes found.".dimmed());
        return Ok(());
    }

    for recipe in &view.page.contents {
        output::recipe_row(recipe);
    }

    eprintln!();
    eprintln!(
        "{}",
        format!(
            "Page {} of {} ({} recipes)",
            view.page.current_page + 1,
            view.page.total_pages.max(1),
            view.page.total_items
        )
        .dimmed()
    );

    Ok(())
}
