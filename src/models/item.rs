use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

use super::actor::Actor;

/// Upper bound on item text, counted in characters
pub const MAX_TEXT_LENGTH: usize = 1000;

/// Item represents a single owned to-do entry
/// Maps to `items` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Item {
    pub item_id: Uuid,
    pub owner_id: Uuid,
    pub text: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// New Item for creation (without generated fields)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    pub owner_id: Uuid,
    pub text: String,
}

/// Reasons a store refuses to persist item text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ItemValidationError {
    #[error("Text can't be blank")]
    EmptyText,

    #[error("Text is too long (maximum is {max} characters, got {actual})")]
    TextTooLong { max: usize, actual: usize },
}

impl Item {
    /// Build a fresh item owned by `owner_id`, stamped with the current time
    pub fn from_new(new_item: NewItem) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            item_id: Uuid::new_v4(),
            owner_id: new_item.owner_id,
            text: new_item.text,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, actor: &Actor) -> bool {
        self.owner_id == actor.actor_id
    }
}

impl NewItem {
    pub fn new(owner_id: Uuid, text: impl Into<String>) -> Self {
        Self {
            owner_id,
            text: text.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ItemValidationError> {
        validate_text(&self.text)
    }
}

/// Check item text before any write reaches storage.
///
/// Text must contain at least one non-whitespace character and be no longer
/// than [`MAX_TEXT_LENGTH`] characters. The text itself is stored verbatim.
pub fn validate_text(text: &str) -> Result<(), ItemValidationError> {
    if text.trim().is_empty() {
        return Err(ItemValidationError::EmptyText);
    }

    let actual = text.chars().count();
    if actual > MAX_TEXT_LENGTH {
        return Err(ItemValidationError::TextTooLong {
            max: MAX_TEXT_LENGTH,
            actual,
        });
    }

    Ok(())
}
