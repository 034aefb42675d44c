//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `CAMPAIGN_PULSE` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use campaign_pulse::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr().unwrap());
//! ```

mod error;
mod progress;
mod server;

pub use error::{ConfigError, ValidationError};
pub use progress::ProgressConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a runnable
/// development configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Progress engine configuration (queues, heartbeat, eviction)
    #[serde(default)]
    pub progress: ProgressConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `CAMPAIGN_PULSE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `CAMPAIGN_PULSE__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `CAMPAIGN_PULSE__PROGRESS__QUEUE_CAPACITY=32` -> `progress.queue_capacity = 32`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CAMPAIGN_PULSE")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.progress.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        env::remove_var("CAMPAIGN_PULSE__SERVER__PORT");
        env::remove_var("CAMPAIGN_PULSE__SERVER__ENVIRONMENT");
        env::remove_var("CAMPAIGN_PULSE__PROGRESS__QUEUE_CAPACITY");
        env::remove_var("CAMPAIGN_PULSE__PROGRESS__EVICTION_GRACE_SECS");
    }

    #[test]
    fn test_load_with_empty_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.progress.queue_capacity, 16);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_is_production() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("CAMPAIGN_PULSE__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.is_production());
    }

    #[test]
    fn test_custom_progress_settings() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("CAMPAIGN_PULSE__SERVER__PORT", "3000");
        env::set_var("CAMPAIGN_PULSE__PROGRESS__QUEUE_CAPACITY", "4");
        env::set_var("CAMPAIGN_PULSE__PROGRESS__EVICTION_GRACE_SECS", "120");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.progress.queue_capacity, 4);
        assert_eq!(config.progress.eviction_grace_secs, 120);
    }

    #[test]
    fn test_validate_rejects_zero_queue_capacity() {
        let config = AppConfig {
            progress: ProgressConfig {
                queue_capacity: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
