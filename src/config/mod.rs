//! # Items Service Configuration
//!
//! Layered configuration: `config/items/base.toml`, then the optional
//! `config/items/{environment}.toml`, then `ITEMS__SECTION__KEY` environment
//! variables. Every field has a default, so a bare checkout runs with the
//! in-memory store on `127.0.0.1:3000`.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use todo_items::config::ConfigManager;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ConfigManager::load()?;
//! let bind = &manager.config().server.bind_address;
//! let cookie = &manager.config().session.cookie_name;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;
use uuid::Uuid;

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigManager;

/// Root configuration for the items service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub session: SessionConfig,
    pub paths: PathsConfig,
    pub logging: LoggingConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
    pub request_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3000".to_string(),
            request_timeout_ms: 30_000,
        }
    }
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Which item store backs the service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    Postgres,
}

/// Item store settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Falls back to `DATABASE_URL` when unset
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub acquire_timeout_seconds: u64,
    pub run_migrations: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            database_url: None,
            max_connections: 10,
            acquire_timeout_seconds: 5,
            run_migrations: true,
        }
    }
}

/// Session cookie settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub ttl_seconds: u64,
    pub secure_cookie: bool,
    /// Accounts accepted by the built-in sign-in form
    pub accounts: Vec<AccountConfig>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "_items_session".to_string(),
            ttl_seconds: 14 * 24 * 60 * 60,
            secure_cookie: false,
            accounts: Vec::new(),
        }
    }
}

/// One sign-in account
///
/// `actor_id` is fixed in configuration so that items stay with their owner
/// across restarts.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountConfig {
    pub actor_id: Uuid,
    pub email: String,
    pub password: String,
}

impl fmt::Debug for AccountConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountConfig")
            .field("actor_id", &self.actor_id)
            .field("email", &self.email)
            .field("password", &"[MASKED]")
            .finish()
    }
}

impl SessionConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

/// Redirect destinations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Item list
    pub root: String,
    pub sign_in: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            root: "/".to_string(),
            sign_in: "/users/sign_in".to_string(),
        }
    }
}

/// Log output settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive; defaults by environment when unset
    pub level: Option<String>,
    pub log_dir: Option<String>,
    /// Write a JSON log file into `log_dir`
    pub json: bool,
}

impl AppConfig {
    /// Check cross-field constraints the types cannot express
    pub fn validate(&self) -> ConfigResult<()> {
        if self.server.bind_address.parse::<SocketAddr>().is_err() {
            return Err(ConfigurationError::invalid_value(
                "server.bind_address",
                &self.server.bind_address,
                "must be a socket address such as 127.0.0.1:3000",
            ));
        }
        if self.server.request_timeout_ms == 0 {
            return Err(ConfigurationError::invalid_value(
                "server.request_timeout_ms",
                "0",
                "must be greater than zero",
            ));
        }

        if self.store.backend == StoreBackend::Postgres && self.store.database_url.is_none() {
            return Err(ConfigurationError::missing_field(
                "store.database_url (or DATABASE_URL)",
            ));
        }
        if self.store.max_connections == 0 {
            return Err(ConfigurationError::invalid_value(
                "store.max_connections",
                "0",
                "must be greater than zero",
            ));
        }

        let cookie_name = &self.session.cookie_name;
        if cookie_name.is_empty()
            || cookie_name
                .chars()
                .any(|c| c.is_whitespace() || c.is_control() || "()<>@,;:\\\"/[]?={}".contains(c))
        {
            return Err(ConfigurationError::invalid_value(
                "session.cookie_name",
                cookie_name,
                "must be a non-empty cookie token",
            ));
        }
        if self.session.ttl_seconds == 0 {
            return Err(ConfigurationError::invalid_value(
                "session.ttl_seconds",
                "0",
                "must be greater than zero",
            ));
        }

        let mut emails = HashSet::new();
        for account in &self.session.accounts {
            let email = account.email.trim().to_lowercase();
            if email.is_empty() || account.password.is_empty() {
                return Err(ConfigurationError::invalid_value(
                    "session.accounts",
                    &account.email,
                    "accounts need an email and a password",
                ));
            }
            if !emails.insert(email) {
                return Err(ConfigurationError::invalid_value(
                    "session.accounts",
                    &account.email,
                    "email is listed more than once",
                ));
            }
        }

        let paths = [
            ("paths.root", &self.paths.root),
            ("paths.sign_in", &self.paths.sign_in),
        ];
        for (field, path) in paths {
            if !path.starts_with('/') {
                return Err(ConfigurationError::invalid_value(
                    field,
                    path,
                    "must be an absolute path starting with '/'",
                ));
            }
        }

        let sign_in = self.paths.sign_in.as_str();
        if RESERVED_PATHS.contains(&sign_in)
            || sign_in.starts_with("/items/")
            || sign_in.contains(['*', ':'])
        {
            return Err(ConfigurationError::invalid_value(
                "paths.sign_in",
                sign_in,
                "must not overlap the item, sign-out or health routes",
            ));
        }

        Ok(())
    }
}

/// Fixed routes the sign-in form cannot be mounted over
const RESERVED_PATHS: &[&str] = &["/", "/items", "/users/sign_out", "/health", "/health/ready"];
