//! Whoami command implementation.

use anyhow::{Context, Result};

use crate::app::App;
use crate::output;

pub fn run(app: &App) -> Result<()> {
    let user = app
        .session()
        .user_info()
        .context("No active session. Run 'recipebook login' first.")?;

    output::field("Name", &user.display_name());
    output::field("User", &user.id);
    output::field("Service", app.service().as_str());

    Ok(())
}
