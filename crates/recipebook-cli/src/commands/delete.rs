//! Delete command implementation.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use recipebook_client::{ConfirmationOptions, DeleteOutcome, ListOrchestrator};
use recipebook_core::{PageRequest, RecordId};

use crate::app::App;
use crate::output;

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Recipe id
    pub id: String,

    /// Skip confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

pub async fn run(app: &App, args: DeleteArgs) -> Result<()> {
    let id = RecordId::new(&args.id).context("Invalid recipe id")?;
    let records = app.records()?;

    let recipe = records
        .get(&id)
        .await
        .map_err(|err| app.failure(err).context("Failed to fetch recipe"))?;

    let (list, initial) = ListOrchestrator::start(records, PageRequest::default());
    initial.await;
    list.select(Some(id));

    let (prompt, follow_up) = list.request_delete(&recipe)?;
    if args.yes {
        prompt.confirm();
    } else {
        match ask(prompt.options(), &recipe.name)? {
            Some(true) => prompt.confirm(),
            Some(false) => prompt.cancel(),
            None => prompt.dismiss(),
        }
    }

    match follow_up.await {
        DeleteOutcome::Deleted => {
            output::success(&format!("Deleted recipe '{}'", recipe.name));
            let remaining = list.view().page.total_items;
            eprintln!("{}", format!("{remaining} recipes left.").dimmed());
            Ok(())
        }
        DeleteOutcome::Cancelled => {
            eprintln!("{}", "Nothing was deleted.".dimmed());
            Ok(())
        }
        DeleteOutcome::Failed(err) => Err(app.failure(err).context("Failed to delete recipe")),
    }
}

/// Ask on the terminal. `None` when stdin is closed before an answer.
fn ask(options: &ConfirmationOptions, name: &str) -> Result<Option<bool>> {
    eprintln!("{} {}", options.title.bold(), name);
    eprintln!("{}", options.message);
    eprint!(
        "Type '{}' to confirm or '{}' to keep it: ",
        options.confirm_text, options.cancel_text
    );
    io::stderr().flush()?;

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input)? == 0 {
        return Ok(None);
    }

    let answer = input.trim();
    Ok(Some(
        answer.eq_ignore_ascii_case(&options.confirm_text)
            || answer.eq_ignore_ascii_case("y")
            || answer.eq_ignore_ascii_case("yes"),
    ))
}
