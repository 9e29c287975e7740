//! # Credential Verification
//!
//! Turns submitted sign-in credentials into an [`Actor`]. The web layer only
//! sees the [`CredentialVerifier`] trait; deployments backed by an external
//! identity provider supply their own implementation.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::config::AccountConfig;
use crate::models::Actor;

/// Checks an email/password pair
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// The actor the credentials belong to, or `None` when they do not match
    async fn verify(&self, email: &str, password: &str) -> Option<Actor>;
}

/// Accounts listed under `session.accounts` in configuration
#[derive(Debug, Clone, Default)]
pub struct CredentialRegistry {
    accounts: HashMap<String, AccountConfig>,
}

impl CredentialRegistry {
    /// Build the registry from configuration. Emails match case-insensitively.
    pub fn from_config(accounts: &[AccountConfig]) -> Self {
        let accounts = accounts
            .iter()
            .map(|account| (normalize_email(&account.email), account.clone()))
            .collect();
        Self { accounts }
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[async_trait]
impl CredentialVerifier for CredentialRegistry {
    async fn verify(&self, email: &str, password: &str) -> Option<Actor> {
        self.accounts
            .get(&normalize_email(email))
            .filter(|account| !password.is_empty() && account.password == password)
            .map(|account| Actor::new(account.actor_id, account.email.clone()))
    }
}
