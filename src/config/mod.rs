//! Configuration module
//!
//! Provides configuration loading, validation, and default settings for the
//! database path, the lookup policy, and logging.

mod defaults;
mod loader;
mod validator;

pub use defaults::{default_config, ConfigDefaults};
pub use loader::{load_config, ConfigLoader};
pub use validator::{validate_config, ConfigValidator};

// Re-export the main configuration structure
pub use loader::Config;

// Configuration-related error type
pub use loader::ConfigError;

// Configuration result type
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_module_exports() {
        let _config = default_config();
        let _loader = ConfigLoader::new("test.toml");
        let _validator = ConfigValidator;

        let result: ConfigResult<String> = Ok("test".to_string());
        assert!(result.is_ok());

        let error_result: ConfigResult<String> = Err(ConfigError::Invalid("test".to_string()));
        assert!(error_result.is_err());
    }

    #[test]
    fn test_validate_config_export() {
        let config = Config::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_load_config_export() {
        // returns defaults when the file doesn't exist
        let result = load_config();
        assert!(result.is_ok());
    }
}
