//! CLI argument definitions.

use clap::{Parser, Subcommand};

use crate::commands::{create, delete, edit, list, login, register, show};

/// Manage your recipe book from the terminal.
#[derive(Parser, Debug)]
#[command(name = "recipebook")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Recipe book service URL (https://, http://localhost or file://).
    /// Defaults to the service of the stored session.
    #[arg(long, env = "RECIPEBOOK_SERVICE", global = true)]
    pub service: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in and store the session
    Login(login::LoginArgs),

    /// Create an account
    Register(register::RegisterArgs),

    /// Display the signed-in user
    Whoami,

    /// Renew the access token
    RefreshToken,

    /// Sign out and forget the stored session
    Logout,

    /// List your recipes one page at a time
    List(list::ListArgs),

    /// Show a single recipe
    Show(show::ShowArgs),

    /// Create a recipe
    Create(create::CreateArgs),

    /// Change an existing recipe
    Edit(edit::EditArgs),

    /// Delete a recipe
    Delete(delete::DeleteArgs),
}
