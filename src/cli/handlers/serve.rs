//! Serve command handler
//!
//! Handles the serve command including dry-run validation and server startup.

use crate::config::{Environment, Settings, StorageBackend};
use crate::error::AppResult;
use crate::server::Server;

/// Handler for the serve command
pub struct ServeCommandHandler {
    config: Settings,
}

impl ServeCommandHandler {
    /// Create a new serve command handler
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Start the server, or with `dry_run` only validate and print a summary.
    ///
    /// # Errors
    /// - Configuration validation errors
    /// - Server startup errors (if not dry-run)
    pub async fn execute(&self, dry_run: bool, environment: Environment) -> AppResult<()> {
        if dry_run {
            return self.validate_only(environment);
        }

        Server::new(self.config.clone(), environment).run().await?;
        Ok(())
    }

    /// Validate configuration without starting the server
    pub fn validate_only(&self, environment: Environment) -> AppResult<()> {
        self.config.validate()?;

        println!("✓ Configuration is valid ({})", environment);
        println!("✓ Server would bind to: {}", self.config.server.address());
        match self.config.storage.backend {
            StorageBackend::Postgres => println!("✓ Storage: postgres (database URL configured)"),
            StorageBackend::Memory => println!("✓ Storage: memory (data is not persisted)"),
        }
        println!("✓ Logger level: {}", self.config.logger.level);

        println!("Dry run completed successfully - configuration is ready for deployment");
        Ok(())
    }

    /// Get the configuration
    pub fn config(&self) -> &Settings {
        &self.config
    }
}
