//! Configuration merger for CLI arguments and config files
//!
//! CLI arguments override file and environment configuration. Validation
//! runs once, on the merged result.

use std::path::Path;

use super::parser::{Cli, Commands};
use crate::config::error::ConfigError;
use crate::config::{ConfigLoader, Environment, Settings};

/// Applies CLI argument overrides on top of loaded configuration.
pub struct ConfigurationMerger {
    base_config: Settings,
}

impl ConfigurationMerger {
    /// Create a new configuration merger with base configuration
    pub fn new(base_config: Settings) -> Self {
        Self { base_config }
    }

    /// Load the base configuration, unvalidated.
    ///
    /// With `config_path` only that file (plus environment variables) is
    /// read; otherwise the layered `config/` directory is used.
    ///
    /// # Errors
    /// Returns ConfigError if configuration loading fails
    pub fn from_config_path(
        config_path: Option<&Path>,
        environment: Option<Environment>,
    ) -> Result<Self, ConfigError> {
        let loader = match config_path {
            Some(path) => ConfigLoader::with_file(path),
            None => ConfigLoader::new()?,
        };
        let loader = match environment {
            Some(env) => loader.environment(env),
            None => loader,
        };

        Ok(Self::new(loader.load_unvalidated()?))
    }

    /// Merge CLI arguments with the base configuration and validate the result.
    ///
    /// A command-level `--log-level` wins over the global `--verbose`/`--quiet`.
    pub fn merge_cli_args(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut config = self.base_config.clone();

        if cli.verbose {
            config.logger.level = "debug".to_string();
        } else if cli.quiet {
            config.logger.level = "error".to_string();
        }

        if let Some(Commands::Serve {
            host,
            port,
            log_level,
            storage,
            dry_run: _,
        }) = &cli.command
        {
            if let Some(host_addr) = host {
                config.server.host = host_addr.clone();
            }
            if let Some(port_num) = port {
                config.server.port = *port_num;
            }
            if let Some(level) = log_level {
                config.logger.level = level.as_str().to_string();
            }
            if let Some(backend) = storage {
                config.storage.backend = (*backend).into();
            }
        }

        config.validate()?;

        Ok(config)
    }

    /// Get the base configuration (useful for inspection)
    pub fn config(&self) -> &Settings {
        &self.base_config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageBackend;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    fn create_valid_base_config() -> Settings {
        let mut config = Settings::default();
        config.database.url = "postgres://localhost/biblioteca".to_string();
        config
    }

    fn merge(args: &[&str]) -> Result<Settings, ConfigError> {
        let merger = ConfigurationMerger::new(create_valid_base_config());
        let cli = Cli::try_parse_from(args).unwrap();
        merger.merge_cli_args(&cli)
    }

    #[test]
    fn test_configuration_merger_new() {
        let base_config = Settings::default();
        let merger = ConfigurationMerger::new(base_config.clone());
        assert_eq!(merger.config(), &base_config);
    }

    #[test]
    fn test_merge_verbose_and_quiet_flags() {
        assert_eq!(merge(&["biblioteca", "--verbose"]).unwrap().logger.level, "debug");
        assert_eq!(merge(&["biblioteca", "--quiet"]).unwrap().logger.level, "error");
    }

    #[test]
    fn test_merge_serve_overrides() {
        let merged = merge(&[
            "biblioteca",
            "serve",
            "--host",
            "0.0.0.0",
            "--port",
            "9090",
            "--storage",
            "memory",
        ])
        .unwrap();

        assert_eq!(merged.server.host, "0.0.0.0");
        assert_eq!(merged.server.port, 9090);
        assert_eq!(merged.storage.backend, StorageBackend::Memory);
    }

    #[test]
    fn test_command_log_level_overrides_global() {
        let merged = merge(&["biblioteca", "--verbose", "serve", "--log-level", "warn"]).unwrap();
        assert_eq!(merged.logger.level, "warn");
    }

    #[test]
    fn test_memory_override_rescues_missing_database_url() {
        let merger = ConfigurationMerger::new(Settings::default());

        let cli = Cli::try_parse_from(["biblioteca", "serve"]).unwrap();
        assert!(merger.merge_cli_args(&cli).is_err());

        let cli = Cli::try_parse_from(["biblioteca", "serve", "--storage", "memory"]).unwrap();
        assert!(merger.merge_cli_args(&cli).is_ok());
    }

    #[test]
    fn test_from_config_path_reads_single_file() {
        let _lock = crate::config::loader::tests::ENV_MUTEX.lock().unwrap();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.toml");
        fs::write(&path, "[server]\nport = 7070\n[storage]\nbackend = \"memory\"\n").unwrap();

        let merger = ConfigurationMerger::from_config_path(Some(&path), None).unwrap();
        assert_eq!(merger.config().server.port, 7070);

        let cli = Cli::try_parse_from(["biblioteca"]).unwrap();
        assert!(merger.merge_cli_args(&cli).is_ok());
    }
}
