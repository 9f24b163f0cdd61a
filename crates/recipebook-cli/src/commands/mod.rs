//! Subcommand implementations.

pub mod create;
pub mod delete;
pub mod edit;
mod form;
pub mod list;
pub mod login;
mod logout;
mod refresh_token;
pub mod register;
pub mod show;
mod whoami;

use anyhow::Result;

use crate::app::App;
use crate::cli::Commands;

pub async fn handle(service: Option<&str>, command: Commands) -> Result<()> {
    let app = App::open(service)?;

    match command {
        Commands::Login(args) => login::run(&app, args).await,
        Commands::Register(args) => register::run(&app, args).await,
        Commands::Whoami => whoami::run(&app),
        Commands::RefreshToken => refresh_token::run(&app).await,
        Commands::Logout => logout::run(&app),
        Commands::List(args) => list::run(&app, args).await,
        Commands::Show(args) => show::run(&app, args).await,
        Commands::Create(args) => create::run(&app, args).await,
        Commands::Edit(args) => edit::run(&app, args).await,
        Commands::Delete(args) => delete::run(&app, args).await,
    }
}
