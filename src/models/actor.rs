use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An authenticated identity making a request.
///
/// Actors are registered and credentialed outside this crate. The core only
/// ever refers to them by `actor_id`; `email` is carried for display and logs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor {
    pub actor_id: Uuid,
    pub email: String,
}

impl Actor {
    pub fn new(actor_id: Uuid, email: impl Into<String>) -> Self {
        Self {
            actor_id,
            email: email.into(),
        }
    }

    /// Create an actor with a freshly generated id
    pub fn generate(email: impl Into<String>) -> Self {
        Self::new(Uuid::new_v4(), email)
    }
}
