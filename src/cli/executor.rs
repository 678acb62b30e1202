//! Command executor for dispatching CLI commands
//!
//! This module provides the main entry point for executing CLI commands
//! after parsing and configuration loading.

use super::handlers::{MigrateCommandHandler, ServeCommandHandler};
use super::parser::{Cli, Commands};
use crate::config::{Environment, Settings};
use crate::error::{AppError, AppResult};

/// Execute a CLI command with the given settings
///
/// Without a subcommand the server is started.
///
/// # Errors
/// Returns errors from command handlers or validation failures
pub async fn execute_command(cli: &Cli, settings: Settings) -> AppResult<()> {
    cli.validate().map_err(|reason| AppError::Validation {
        field: "cli_arguments".to_string(),
        reason,
    })?;

    let environment = cli.env.map(Environment::from).unwrap_or_else(Environment::from_env);

    match cli.command_or_default() {
        Commands::Serve { dry_run, .. } => {
            ServeCommandHandler::new(settings)
                .execute(dry_run, environment)
                .await
        }
        Commands::Migrate { dry_run, rollback } => {
            if let Some(steps) = rollback.filter(|s| *s > 50) {
                tracing::warn!(
                    steps,
                    "Rolling back many migrations at once; consider smaller steps"
                );
            }
            MigrateCommandHandler::new(settings)
                .execute(dry_run, rollback)
                .await
        }
    }
}
