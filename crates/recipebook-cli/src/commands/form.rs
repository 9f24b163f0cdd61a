//! Recipe fields shared by `create` and `edit`.

use anyhow::{Result, bail};
use clap::Args;

use recipebook_client::{DialogOutcome, IngredientEditor, PendingOutcome, RecordDialog};
use recipebook_core::Error;

use crate::app::App;
use crate::output;

#[derive(Args, Debug)]
pub struct RecipeFields {
    /// Recipe name (5 to 255 characters)
    #[arg(long)]
    pub name: Option<String>,

    /// Number of people the recipe serves
    #[arg(long)]
    pub serves: Option<u32>,

    /// Whether the recipe is vegetarian
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub vegetarian: Option<bool>,

    /// Cooking instructions
    #[arg(long)]
    pub instruction: Option<String>,

    /// Ingredient line; repeat for each ingredient. Replaces all rows.
    #[arg(long = "ingredient")]
    pub ingredients: Vec<String>,
}

impl RecipeFields {
    /// Copy the given fields onto the dialog's form.
    pub fn apply(&self, dialog: &RecordDialog) -> recipebook_core::Result<()> {
        dialog.update_form(|form| {
            if let Some(name) = &self.name {
                form.name = name.clone();
            }
            if let Some(serves) = self.serves {
                form.suitable_for = serves;
            }
            if let Some(vegetarian) = self.vegetarian {
                form.vegetarian = vegetarian;
            }
            if let Some(instruction) = &self.instruction {
                form.cooking_instruction = instruction.clone();
            }
        })?;

        if !self.ingredients.is_empty() {
            dialog.edit_ingredients(|rows| {
                *rows = IngredientEditor::from_values(self.ingredients.iter().cloned());
            })?;
        }
        Ok(())
    }
}

/// Submit the dialog and wait for its outcome.
///
/// Rejected fields are printed one per line.
pub async fn save(app: &App, dialog: RecordDialog, outcome: PendingOutcome) -> Result<()> {
    if let Err(err) = dialog.submit().await {
        return match err {
            Error::Validation(validation) => {
                for violation in validation.violations() {
                    output::error(&format!("{}: {}", violation.field, violation.message));
                }
                dialog.cancel();
                bail!("Recipe was not saved")
            }
            other => {
                dialog.cancel();
                Err(app.failure(other).context("Recipe was not saved"))
            }
        };
    }

    match outcome.await {
        DialogOutcome::Success => Ok(()),
        DialogOutcome::Dismissed => bail!("Recipe was not saved"),
    }
}
