//! # Session / Identity Provider
//!
//! Resolves the actor bound to a request. Requests carry an opaque
//! [`SessionToken`] (a cookie in the web layer); a [`SessionProvider`] maps it
//! to an [`Actor`] or to nobody.
//!
//! The resolved value travels as an explicit [`CurrentActor`] context, never as
//! global state, so the access controller can be driven without any session
//! machinery at all.

pub mod credentials;
pub mod memory;

use async_trait::async_trait;
use std::fmt;

use crate::models::Actor;

pub use credentials::{CredentialRegistry, CredentialVerifier};
pub use memory::MemorySessionStore;

/// Opaque session identifier handed to clients
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(pub String);

impl SessionToken {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionToken {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// The actor resolved for the current request, if any.
///
/// Inserted into request extensions by the session middleware together with
/// the token it was resolved from.
#[derive(Debug, Clone, Default)]
pub struct CurrentActor {
    pub actor: Option<Actor>,
    pub token: Option<SessionToken>,
}

impl CurrentActor {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(actor: Actor, token: SessionToken) -> Self {
        Self {
            actor: Some(actor),
            token: Some(token),
        }
    }

    pub fn actor(&self) -> Option<&Actor> {
        self.actor.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.actor.is_some()
    }
}

/// Source of truth for which actor a session token belongs to.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Actor bound to `token`, or `None` for unknown and expired tokens
    async fn current_actor(&self, token: &SessionToken) -> Option<Actor>;

    /// Open a session for an actor whose credentials were already verified
    async fn sign_in(&self, actor: Actor) -> SessionToken;

    /// Revoke a session. Returns whether the token was live.
    async fn sign_out(&self, token: &SessionToken) -> bool;
}
