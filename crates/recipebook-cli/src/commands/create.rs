//! Create command implementation.

use anyhow::Result;
use clap::Args;

use recipebook_client::RecordDialog;

use super::form::{self, RecipeFields};
use crate::app::App;
use crate::output;

#[derive(Args, Debug)]
pub struct CreateArgs {
    #[command(flatten)]
    pub fields: RecipeFields,
}

pub async fn run(app: &App, args: CreateArgs) -> Result<()> {
    let records = app.records()?;
    let (dialog, outcome) = RecordDialog::open(records, None);
    args.fields.apply(&dialog)?;

    let name = dialog.form().map(|form| form.name).unwrap_or_default();
    form::save(app, dialog, outcome).await?;

    output::success(&format!("Created recipe '{}'", name));
    Ok(())
}
