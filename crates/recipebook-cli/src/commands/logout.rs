use anyhow::{Context, Result};
use colored::Colorize;

use crate::app::App;
use crate::output;

pub fn run(app: &App) -> Result<()> {
    let signed_out = app.session().logout().context("Failed to sign out")?;
    if signed_out {
        output::success("Signed out");
    } else {
        eprintln!("{}", "No active session.".dimmed());
    }
    Ok(())
}
