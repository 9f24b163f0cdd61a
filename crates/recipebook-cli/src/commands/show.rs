//! Show command implementation.

use anyhow::{Context, Result};
use clap::Args;

use recipebook_core::RecordId;

use crate::app::App;
use crate::output;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Recipe id
    pub id: String,

    /// Print the recipe as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(app: &App, args: ShowArgs) -> Result<()> {
    let id = RecordId::new(&args.id).context("Invalid recipe id")?;
    let records = app.records()?;

    let recipe = records
        .get(&id)
        .await
        .map_err(|err| app.failure(err).context("Failed to fetch recipe"))?;

    if args.json {
        return output::json_pretty(&recipe);
    }

    output::field("Id", id.as_str());
    output::field("Name", &recipe.name);
    output::field("Serves", &recipe.suitable_for.to_string());
    output::field("Vegetarian", if recipe.vegetarian { "yes" } else { "no" });
    if let Some(created_at) = &recipe.created_at {
        output::field("Created", &output::timestamp(created_at));
    }
    output::field("Ingredients", "");
    for ingredient in &recipe.ingredients {
        println!("  - {}", ingredient);
    }
    output::field("Instructions", "");
    println!("{}", recipe.cooking_instruction);

    Ok(())
}
