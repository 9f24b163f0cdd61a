//! Register command implementation.

use anyhow::{Context, Result};
use clap::Args;

use recipebook_core::Registration;

use crate::app::App;
use crate::output;

#[derive(Args, Debug)]
pub struct RegisterArgs {
    #[arg(long)]
    pub first_name: String,

    #[arg(long)]
    pub last_name: String,

    #[arg(long)]
    pub email: String,

    #[arg(long, env = "RECIPEBOOK_PASSWORD", hide_env_values = true)]
    pub password: String,
}

pub async fn run(app: &App, args: RegisterArgs) -> Result<()> {
    let registration =
        Registration::new(args.first_name, args.last_name, args.email, args.password);

    let user = app
        .session()
        .register(&registration)
        .await
        .context("Failed to register")?;

    output::success("Account created");
    output::field("Name", &user.display_name());
    output::field("User", &user.id);
    println!();
    println!("Run 'recipebook login' to sign in.");

    Ok(())
}
