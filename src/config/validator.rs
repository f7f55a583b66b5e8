//! Configuration validator
//!
//! Validates configuration values before the database is loaded against
//! them, so a bad setting fails at startup and not mid-resolution.

use super::loader::{Config, ConfigError};
use crate::reloc::LookupMode;

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates the entire configuration
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        Self::validate_database(config)?;
        Self::validate_resolver(config)?;
        Self::validate_logging(config)?;
        Ok(())
    }

    fn validate_database(config: &Config) -> Result<(), ConfigError> {
        if config.database.path.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "Database path cannot be empty".to_string(),
            ));
        }

        let identity = config.database.identity.trim();
        if !identity.is_empty() && hex::decode(identity).is_err() {
            return Err(ConfigError::Invalid(format!(
                "Database identity is not valid hex: {identity:?}"
            )));
        }

        Ok(())
    }

    fn validate_resolver(config: &Config) -> Result<(), ConfigError> {
        config
            .resolver
            .lookup_mode
            .parse::<LookupMode>()
            .map_err(ConfigError::Invalid)?;
        Ok(())
    }

    fn validate_logging(config: &Config) -> Result<(), ConfigError> {
        const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
        let level = config.logging.level.to_ascii_lowercase();
        if !LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "Unknown log level: {:?}",
                config.logging.level
            )));
        }
        Ok(())
    }
}

/// Validates a configuration
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    ConfigValidator::validate(config)
}
