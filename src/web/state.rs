//! # Web API Application State
//!
//! Shared state handed to every handler: configuration, the access controller
//! over the configured item store, the session provider and the credential
//! verifier behind the sign-in form.

use std::sync::Arc;
use tracing::{info, warn};

use crate::config::{AppConfig, StoreBackend};
use crate::controller::ItemAccessController;
use crate::error::{ItemsError, Result};
use crate::session::{CredentialRegistry, CredentialVerifier, MemorySessionStore, SessionProvider};
use crate::store::{ItemStore, MemoryItemStore, PgItemStore};

/// Shared application state for the web API
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub controller: ItemAccessController,
    pub sessions: Arc<dyn SessionProvider>,
    pub credentials: Arc<dyn CredentialVerifier>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Sign-in credentials are checked against `session.accounts` until
    /// [`with_credentials`](Self::with_credentials) swaps in another verifier.
    pub fn new(
        config: Arc<AppConfig>,
        store: Arc<dyn ItemStore>,
        sessions: Arc<dyn SessionProvider>,
    ) -> Self {
        let credentials = Arc::new(CredentialRegistry::from_config(&config.session.accounts));
        Self {
            config,
            controller: ItemAccessController::new(store),
            sessions,
            credentials,
        }
    }

    pub fn with_credentials(mut self, credentials: Arc<dyn CredentialVerifier>) -> Self {
        self.credentials = credentials;
        self
    }

    /// State backed entirely by process memory
    pub fn in_memory(config: AppConfig) -> Self {
        let sessions = Arc::new(MemorySessionStore::new(config.session.ttl()));
        Self::new(Arc::new(config), Arc::new(MemoryItemStore::new()), sessions)
    }

    /// Create the configured item store and wrap it with `sessions`
    pub async fn build(config: AppConfig, sessions: Arc<dyn SessionProvider>) -> Result<Self> {
        let store: Arc<dyn ItemStore> = match config.store.backend {
            StoreBackend::Memory => {
                warn!("Using in-memory item store - items are lost on restart");
                Arc::new(MemoryItemStore::new())
            }
            StoreBackend::Postgres => {
                let database_url = config.store.database_url.as_deref().ok_or_else(|| {
                    ItemsError::Server(
                        "postgres backend selected without a database URL".to_string(),
                    )
                })?;
                let store = PgItemStore::connect(&config.store, database_url).await?;
                if config.store.run_migrations {
                    store.migrate().await?;
                }
                Arc::new(store)
            }
        };

        info!(backend = ?config.store.backend, "Item store ready");

        Ok(Self::new(Arc::new(config), store, sessions))
    }

    pub fn store(&self) -> &Arc<dyn ItemStore> {
        self.controller.store()
    }
}
