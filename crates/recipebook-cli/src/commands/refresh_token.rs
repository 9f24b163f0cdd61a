//! Refresh token command implementation.

use anyhow::{Context, Result, bail};
use colored::Colorize;

use crate::app::App;
use crate::output;

pub async fn run(app: &App) -> Result<()> {
    if !app.session().is_authenticated() {
        bail!("No active session. Run 'recipebook login' first.");
    }

    eprintln!("{}", "Refreshing session...".dimmed());

    // A rejected refresh token also ends the stored session.
    app.session()
        .refresh()
        .await
        .context("Failed to refresh session")?;

    output::success("Session refreshed successfully");

    Ok(())
}
