//! Default configuration values

use serde::{Deserialize, Serialize};

/// Default configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigDefaults {
    pub database: DatabaseDefaults,
    pub resolver: ResolverDefaults,
    pub logging: LoggingDefaults,
}

/// Default offset-database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseDefaults {
    pub path: String,
    pub identity: String,
}

/// Default resolver configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverDefaults {
    pub lookup_mode: String,
}

/// Default logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingDefaults {
    pub level: String,
    pub file: String,
}

/// Returns the default configuration
pub fn default_config() -> ConfigDefaults {
    ConfigDefaults {
        database: DatabaseDefaults {
            path: "offsets.json".to_string(),
            identity: String::new(),
        },
        resolver: ResolverDefaults {
            // strict is the only safe default; nearest must be opted into
            lookup_mode: "strict".to_string(),
        },
        logging: LoggingDefaults {
            level: "info".to_string(),
            file: "relokit.log".to_string(),
        },
    }
}
