//! Edit command implementation.

use anyhow::{Context, Result, bail};
use clap::Args;

use recipebook_client::RecordDialog;
use recipebook_core::RecordId;

use super::form::{self, RecipeFields};
use crate::app::App;
use crate::output;

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Recipe id
    pub id: String,

    #[command(flatten)]
    pub fields: RecipeFields,

    /// Append an ingredient line; repeatable
    #[arg(long = "add-ingredient")]
    pub add: Vec<String>,

    /// Remove the ingredient at this position (starting at 1); repeatable
    #[arg(long = "remove-ingredient", value_parser = clap::value_parser!(u32).range(1..))]
    pub remove: Vec<u32>,
}

pub async fn run(app: &App, args: EditArgs) -> Result<()> {
    let id = RecordId::new(&args.id).context("Invalid recipe id")?;
    let records = app.records()?;

    let (dialog, outcome) = RecordDialog::open(records, Some(id));
    if let Err(err) = dialog.load().await {
        return Err(app.failure(err).context("Failed to load recipe"));
    }

    args.fields.apply(&dialog)?;

    // Highest position first so earlier removals do not shift later ones.
    let mut positions = args.remove.clone();
    positions.sort_unstable_by(|a, b| b.cmp(a));
    positions.dedup();
    for position in positions {
        let removed = dialog.edit_ingredients(|rows| rows.remove_at(position as usize - 1))?;
        if !removed {
            bail!(
                "Ingredient {} cannot be removed; a recipe keeps at least one ingredient row",
                position
            );
        }
    }

    for line in &args.add {
        dialog.edit_ingredients(|rows| rows.add(line.as_str()))?;
    }

    let name = dialog.form().map(|form| form.name).unwrap_or_default();
    form::save(app, dialog, outcome).await?;

    output::success(&format!("Updated recipe '{}'", name));
    Ok(())
}
