//! CLI module for the `edu` binary.
//!
//! ```ignore
//! use edu_client::cli::{parse_args, run_cli_command};
//!
//! let command = parse_args(std::env::args());
//! run_cli_command(command, &gateway, &guard).await?;
//! ```

pub mod args;
pub mod commands;
pub mod version;

pub use args::{parse_args, CliCommand, USAGE};
pub use version::{handle_version_command, VERSION};

use color_eyre::eyre::eyre;
use color_eyre::Result;

use crate::gateway::ApiGateway;
use crate::guard::RouteGuard;

/// Run a parsed command.
///
/// `Version` never returns. `Help` and `Invalid` need no backend and are
/// handled here as well so every command goes through one entry point.
pub async fn run_cli_command(
    command: CliCommand,
    gateway: &ApiGateway,
    guard: &RouteGuard,
) -> Result<()> {
    match command {
        CliCommand::Version => handle_version_command(),
        CliCommand::Help => {
            println!("{}", USAGE);
            Ok(())
        }
        CliCommand::Invalid(message) => {
            eprintln!("{}", USAGE);
            Err(eyre!(message))
        }
        CliCommand::Login { email, password } => {
            commands::handle_login(gateway, &email, &password).await
        }
        CliCommand::Logout => commands::handle_logout(gateway),
        CliCommand::Whoami => commands::handle_whoami(gateway),
        CliCommand::Role { role } => commands::handle_role(gateway, &role).await,
        CliCommand::Get { path } => {
            commands::validate_path(&path)?;
            commands::handle_get(gateway, &path).await
        }
        CliCommand::Stream { path, body } => {
            commands::validate_path(&path)?;
            commands::handle_stream(gateway, &path, body.as_deref()).await
        }
        CliCommand::Guard { path } => commands::handle_guard(guard, &path),
    }
}
