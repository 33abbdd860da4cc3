use std::env;
use std::time::Duration as StdDuration;

use auth::PasswordPolicy;
use chrono::Duration;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

use crate::credential::service::AuthPolicy;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub store: StoreConfig,
    pub database: Option<DatabaseConfig>,
    pub session: SessionConfig,
    #[serde(default)]
    pub password: PasswordPolicy,
}

/// Which credential store implementation to construct.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    Postgres,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "DatabaseConfig::default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "DatabaseConfig::default_timeout_ms")]
    pub timeout_ms: u64,
}

impl DatabaseConfig {
    fn default_max_connections() -> u32 {
        5
    }

    fn default_timeout_ms() -> u64 {
        5000
    }

    /// Upper bound applied to every outbound database call.
    pub fn timeout(&self) -> StdDuration {
        StdDuration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    pub ttl_seconds: i64,
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (STORE__BACKEND, DATABASE__URL, SESSION__TTL_SECONDS, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());
        Self::load_layered(&run_mode, Environment::default())
    }

    fn load_layered(run_mode: &str, environment: Environment) -> Result<Self, ConfigError> {
        let configuration = ConfigBuilder::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on unprefixed environment variables (with __ as separator)
            // Example: STORE__BACKEND=memory overrides store.backend
            .add_source(environment.separator("__").try_parsing(true))
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=AuthPolicy::MAX_SESSION_TTL_SECONDS).contains(&self.session.ttl_seconds) {
            return Err(ConfigError::Message(format!(
                "session.ttl_seconds must be between 1 and {}, got {}",
                AuthPolicy::MAX_SESSION_TTL_SECONDS,
                self.session.ttl_seconds
            )));
        }
        if self.password.min_length == 0 || self.password.min_length > self.password.max_length {
            return Err(ConfigError::Message(format!(
                "password.min_length ({}) must be between 1 and password.max_length ({})",
                self.password.min_length, self.password.max_length
            )));
        }
        if self.store.backend == StoreBackend::Postgres && self.database.is_none() {
            return Err(ConfigError::Message(
                "store.backend = \"postgres\" requires a [database] section".to_string(),
            ));
        }
        Ok(())
    }

    /// Authentication rules derived from the session and password sections.
    pub fn auth_policy(&self) -> AuthPolicy {
        AuthPolicy {
            password: self.password,
            session_ttl: Duration::seconds(self.session.ttl_seconds),
        }
    }
}
