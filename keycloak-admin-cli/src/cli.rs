//! Command-line argument parsing.

use clap::{Args, Parser, Subcommand};

use crate::output::OutputFormat;

/// Administer users of a Keycloak realm.
///
/// Connection settings come from `KEYCLOAK_ADMIN_URL`, `KEYCLOAK_REALM`,
/// `KEYCLOAK_ADMIN` and `KEYCLOAK_ADMIN_PASSWORD`.
#[derive(Debug, Parser)]
#[command(name = "keycloak-admin")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true, default_value = "table")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// User management commands
    #[command(subcommand)]
    Users(UserCommand),
}

#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// List users, one page at a time
    List {
        /// Offset of the first user returned
        #[arg(long)]
        first: Option<u32>,

        /// Page size
        #[arg(long)]
        max: Option<u32>,
    },

    /// Get a user by id, or by exact username with --username
    Get {
        /// User id
        #[arg(required_unless_present = "username", conflicts_with = "username")]
        id: Option<String>,

        #[arg(long)]
        username: Option<String>,
    },

    /// Create a user
    Create(CreateArgs),

    /// Update fields of a user
    Update(UpdateArgs),

    /// Delete a user
    Delete {
        id: String,
    },

    /// Set a new password
    ResetPassword {
        id: String,

        #[arg(long, env = "KEYCLOAK_NEW_USER_PASSWORD", hide_env_values = true)]
        password: String,

        /// Require the user to change it at next login
        #[arg(long)]
        temporary: bool,
    },

    /// Enable a user
    Enable {
        id: String,
    },

    /// Disable a user
    Disable {
        id: String,
    },

    /// Number of users in the realm
    Count,
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    pub username: String,

    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub first_name: Option<String>,

    #[arg(long)]
    pub last_name: Option<String>,

    /// Initial password
    #[arg(long)]
    pub password: Option<String>,

    /// Mark the initial password as temporary
    #[arg(long, requires = "password")]
    pub temporary: bool,

    /// Create the account disabled
    #[arg(long)]
    pub disabled: bool,

    #[arg(long)]
    pub email_verified: bool,
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    pub id: String,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub first_name: Option<String>,

    #[arg(long)]
    pub last_name: Option<String>,

    #[arg(long)]
    pub enabled: Option<bool>,

    #[arg(long)]
    pub email_verified: Option<bool>,
}
