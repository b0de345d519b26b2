//! # Configuration Management for pgtable
//!
//! This crate provides the configuration structures used across the pgtable
//! workspace: database connection settings and auditing defaults.
//!
//! ## Quick Start
//!
//! ### Programmatic Configuration
//! ```rust
//! use config::{AuditConfig, DatabaseConfig};
//!
//! let db_config = DatabaseConfig::new(
//!     "localhost".to_string(), 5432, "myapp".to_string(),
//!     "postgres".to_string(), "password".to_string(),
//!     1, 10, 30, 600, 3600,
//! );
//!
//! let audit_config = AuditConfig::new("anonymous".to_string());
//! assert_eq!(audit_config.created_date_column, "created_date");
//! ```
//!
//! ### TOML File Configuration
//! ```toml
//! [database]
//! host = "localhost"
//! port = 5432
//! database = "myapp"
//! username = "postgres"
//! password = "password"
//! min_connections = 1
//! max_connections = 10
//! connection_timeout_seconds = 30
//! idle_timeout_seconds = 600
//! max_lifetime_seconds = 3600
//!
//! [audit]
//! default_principal = "anonymous"
//! # optional, these are the defaults
//! created_date_column = "created_date"
//! created_by_column = "created_by"
//! updated_date_column = "updated_date"
//! updated_by_column = "updated_by"
//! ```
//!
//! Load configuration:
//! ```rust,no_run
//! use config::AppConfig;
//!
//! // Load from pgtable.toml (or the path in PGTABLE_CONFIG)
//! let config = AppConfig::load()?;
//!
//! // Or load from custom path
//! let config = AppConfig::from_file("config/production.toml")?;
//! # Ok::<(), config::ConfigError>(())
//! ```

use serde::{Deserialize, Serialize};
use std::{env, path::Path};
use thiserror::Error;

const DEFAULT_CONFIG_PATH: &str = "./pgtable.toml";
const CONFIG_PATH_ENV: &str = "PGTABLE_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Dotenvy error: {0}")]
    Dotenvy(#[from] dotenvy::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub audit: AuditConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
    pub min_connections: u32,
    pub max_connections: u32,
    pub connection_timeout_seconds: u64,
    pub idle_timeout_seconds: u64,
    pub max_lifetime_seconds: u64,
}

/// Auditing defaults for auditable tables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Principal recorded when no resolver overrides it
    pub default_principal: String,
    #[serde(default = "default_created_date_column")]
    pub created_date_column: String,
    #[serde(default = "default_created_by_column")]
    pub created_by_column: String,
    #[serde(default = "default_updated_date_column")]
    pub updated_date_column: String,
    #[serde(default = "default_updated_by_column")]
    pub updated_by_column: String,
}

fn default_created_date_column() -> String {
    "created_date".to_string()
}

fn default_created_by_column() -> String {
    "created_by".to_string()
}

fn default_updated_date_column() -> String {
    "updated_date".to_string()
}

fn default_updated_by_column() -> String {
    "updated_by".to_string()
}

impl AppConfig {
    /// Load configuration from TOML file specified in .env or defaults
    pub fn load() -> Result<Self, ConfigError> {
        // A missing .env file is fine; the variable may come from the environment
        match dotenvy::dotenv() {
            Ok(_) => {}
            Err(e) if e.not_found() => {}
            Err(e) => return Err(e.into()),
        }

        if let Ok(config_path) = env::var(CONFIG_PATH_ENV) {
            Self::from_file(&config_path)
        } else if Path::new(DEFAULT_CONFIG_PATH).exists() {
            Self::from_file(DEFAULT_CONFIG_PATH)
        } else {
            Err(ConfigError::Invalid(format!(
                "Config path must be specified as {} (environment or .env file) or in {} file",
                CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH
            )))
        }
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<(), ConfigError> {
        self.database.validate()?;
        self.audit.validate()
    }
}

impl DatabaseConfig {
    /// Create a new database configuration
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        host: String,
        port: u16,
        database: String,
        username: String,
        password: String,
        min_connections: u32,
        max_connections: u32,
        connection_timeout_seconds: u64,
        idle_timeout_seconds: u64,
        max_lifetime_seconds: u64,
    ) -> Self {
        Self {
            host,
            port,
            database,
            username,
            password,
            min_connections,
            max_connections,
            connection_timeout_seconds,
            idle_timeout_seconds,
            max_lifetime_seconds,
        }
    }

    /// Build connection string
    pub fn connection_string(&self) -> String {
        format!(
            "postgresql://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database
        )
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.is_empty() {
            return Err(ConfigError::Invalid(
                "Database host cannot be empty".to_string(),
            ));
        }
        if self.port == 0 {
            return Err(ConfigError::Invalid(
                "Database port cannot be zero".to_string(),
            ));
        }
        if self.database.is_empty() {
            return Err(ConfigError::Invalid(
                "Database name cannot be empty".to_string(),
            ));
        }
        if self.username.is_empty() {
            return Err(ConfigError::Invalid(
                "Database username cannot be empty".to_string(),
            ));
        }
        if self.min_connections == 0 {
            return Err(ConfigError::Invalid(
                "Database min_connections must be greater than 0".to_string(),
            ));
        }
        if self.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "Database max_connections must be greater than 0".to_string(),
            ));
        }
        if self.min_connections > self.max_connections {
            return Err(ConfigError::Invalid(
                "Database min_connections cannot be greater than max_connections".to_string(),
            ));
        }
        if self.connection_timeout_seconds == 0 {
            return Err(ConfigError::Invalid(
                "Database connection_timeout_seconds must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl AuditConfig {
    /// Create an audit configuration with the default column names
    pub fn new(default_principal: String) -> Self {
        Self {
            default_principal,
            created_date_column: default_created_date_column(),
            created_by_column: default_created_by_column(),
            updated_date_column: default_updated_date_column(),
            updated_by_column: default_updated_by_column(),
        }
    }

    /// Column names in the order created-date, created-by, updated-date, updated-by
    pub fn column_names(&self) -> [&str; 4] {
        [
            &self.created_date_column,
            &self.created_by_column,
            &self.updated_date_column,
            &self.updated_by_column,
        ]
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_principal.is_empty() {
            return Err(ConfigError::Invalid(
                "Audit default_principal cannot be empty".to_string(),
            ));
        }

        let names = self.column_names();
        for (i, name) in names.iter().enumerate() {
            if name.is_empty() {
                return Err(ConfigError::Invalid(
                    "Audit column names cannot be empty".to_string(),
                ));
            }
            if names[..i].contains(name) {
                return Err(ConfigError::Invalid(format!(
                    "Audit column '{}' is configured more than once",
                    name
                )));
            }
        }
        Ok(())
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self::new("anonymous".to_string())
    }
}
