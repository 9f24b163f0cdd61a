//! Login command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use recipebook_core::Credentials;

use crate::app::App;
use crate::output;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account email address
    #[arg(long)]
    pub email: String,

    /// Account password
    #[arg(long, env = "RECIPEBOOK_PASSWORD", hide_env_values = true)]
    pub password: String,
}

pub async fn run(app: &App, args: LoginArgs) -> Result<()> {
    let credentials = Credentials::new(&args.email, &args.password);

    eprintln!("{}", "Signing in...".dimmed());

    let user = app
        .session()
        .login(&credentials)
        .await
        .context("Failed to sign in")?;

    output::success("Signed in successfully");
    println!();
    output::field("Name", &user.display_name());
    output::field("User", &user.id);
    output::field("Service", app.service().as_str());

    Ok(())
}
