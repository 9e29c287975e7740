pub mod actor;
pub mod item;

// Re-export core models for easy access
pub use actor::Actor;
pub use item::{validate_text, Item, ItemValidationError, NewItem, MAX_TEXT_LENGTH};
