//! Configuration Loader
//!
//! Environment-aware configuration loading. Detects the environment, layers
//! the TOML files for it, applies environment variable overrides and validates
//! the result before anything else starts.

use config::{Config, Environment, File};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use super::error::ConfigResult;
use super::AppConfig;

/// Prefix for environment overrides, e.g. `ITEMS__SERVER__BIND_ADDRESS`
const ENV_PREFIX: &str = "ITEMS";
const ENV_SEPARATOR: &str = "__";

/// Loaded, validated configuration plus where it came from
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: AppConfig,
    environment: String,
    config_directory: PathBuf,
}

impl ConfigManager {
    /// Load configuration with environment auto-detection
    pub fn load() -> ConfigResult<Arc<ConfigManager>> {
        Self::load_from_directory(None)
    }

    /// Load configuration from a specific directory
    pub fn load_from_directory(config_dir: Option<PathBuf>) -> ConfigResult<Arc<ConfigManager>> {
        let environment = Self::detect_environment();
        Self::load_from_directory_with_env(config_dir, &environment)
    }

    /// Load configuration from a specific directory with explicit environment
    /// This is useful for testing without modifying global environment variables
    pub fn load_from_directory_with_env(
        config_dir: Option<PathBuf>,
        environment: &str,
    ) -> ConfigResult<Arc<ConfigManager>> {
        let config_directory = config_dir.unwrap_or_else(Self::default_config_directory);

        debug!(
            environment = %environment,
            directory = %config_directory.display(),
            "Loading configuration"
        );

        let mut config: AppConfig = Self::builder(&config_directory, environment)
            .build()?
            .try_deserialize()?;

        if config.store.database_url.is_none() {
            config.store.database_url = env::var("DATABASE_URL").ok();
        }

        config.validate()?;

        debug!(
            config = %Self::sanitize_config_for_logging(&config),
            "Configuration loaded successfully"
        );

        Ok(Arc::new(ConfigManager {
            config,
            environment: environment.to_string(),
            config_directory,
        }))
    }

    /// Build from an already assembled configuration, skipping file discovery
    pub fn from_config(config: AppConfig, environment: &str) -> ConfigResult<Arc<ConfigManager>> {
        config.validate()?;
        Ok(Arc::new(ConfigManager {
            config,
            environment: environment.to_string(),
            config_directory: Self::default_config_directory(),
        }))
    }

    fn builder(
        config_directory: &Path,
        environment: &str,
    ) -> config::ConfigBuilder<config::builder::DefaultState> {
        Config::builder()
            .add_source(File::from(config_directory.join("base.toml")).required(false))
            .add_source(
                File::from(config_directory.join(format!("{environment}.toml"))).required(false),
            )
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
    }

    /// Get current environment from environment variables
    pub fn detect_environment() -> String {
        env::var("ITEMS_ENV")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string())
    }

    /// `ITEMS_CONFIG_DIR`, or `config/items` relative to the working directory
    pub fn default_config_directory() -> PathBuf {
        env::var("ITEMS_CONFIG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config").join("items"))
    }

    /// Get the loaded configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn config_directory(&self) -> &Path {
        &self.config_directory
    }

    /// Configuration as JSON with connection credentials masked
    pub fn debug_config(&self) -> serde_json::Value {
        Self::sanitize_config_for_logging(&self.config)
    }

    fn sanitize_config_for_logging(config: &AppConfig) -> serde_json::Value {
        let mut value = serde_json::to_value(config).unwrap_or(serde_json::Value::Null);
        if let Some(url) = value
            .pointer_mut("/store/database_url")
            .filter(|url| url.is_string())
        {
            *url = serde_json::Value::String("[MASKED]".to_string());
        }
        if let Some(accounts) = value
            .pointer_mut("/session/accounts")
            .and_then(|accounts| accounts.as_array_mut())
        {
            for account in accounts {
                if let Some(password) = account.get_mut("password") {
                    *password = serde_json::Value::String("[MASKED]".to_string());
                }
            }
        }
        value
    }
}
