use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use tracing::debug;

use super::{SessionProvider, SessionToken};
use crate::models::Actor;

#[derive(Debug, Clone)]
struct SessionRecord {
    actor: Actor,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

/// In-process session store with a fixed time-to-live.
///
/// Expired records are evicted lazily on lookup and by [`purge_expired`].
///
/// [`purge_expired`]: MemorySessionStore::purge_expired
#[derive(Debug)]
pub struct MemorySessionStore {
    sessions: DashMap<String, SessionRecord>,
    ttl: Duration,
}

impl MemorySessionStore {
    pub fn new(ttl: std::time::Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl: Duration::from_std(ttl).unwrap_or_else(|_| Duration::days(36_500)),
        }
    }

    /// Number of sessions currently held, expired ones included
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Drop every expired session, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let before = self.sessions.len();
        self.sessions.retain(|_, record| record.expires_at > now);
        before - self.sessions.len()
    }
}

#[async_trait]
impl SessionProvider for MemorySessionStore {
    async fn current_actor(&self, token: &SessionToken) -> Option<Actor> {
        let now = Utc::now();
        let expired = match self.sessions.get(token.as_str()) {
            None => return None,
            Some(record) if record.expires_at > now => return Some(record.actor.clone()),
            Some(record) => {
                debug!(
                    actor_id = %record.actor.actor_id,
                    created_at = %record.created_at,
                    "Session expired"
                );
                true
            }
        };

        if expired {
            self.sessions.remove(token.as_str());
        }
        None
    }

    async fn sign_in(&self, actor: Actor) -> SessionToken {
        let token = SessionToken::generate();
        let created_at = Utc::now();
        let expires_at = created_at
            .checked_add_signed(self.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        debug!(actor_id = %actor.actor_id, %expires_at, "Opening session");

        self.sessions.insert(
            token.as_str().to_string(),
            SessionRecord {
                actor,
                created_at,
                expires_at,
            },
        );
        token
    }

    async fn sign_out(&self, token: &SessionToken) -> bool {
        self.sessions.remove(token.as_str()).is_some()
    }
}
