//! # Item Authorization
//!
//! One predicate decides every (actor, item, action) triple the web layer can
//! produce. Handlers never compare owner ids themselves; they ask [`decide`]
//! and act on the [`AccessDecision`].
//!
//! ```rust
//! use todo_items::authorization::{decide, AccessDecision, ItemAction};
//! use todo_items::models::Actor;
//!
//! let visitor: Option<&Actor> = None;
//! assert_eq!(
//!     decide(visitor, None, ItemAction::List),
//!     AccessDecision::Unauthenticated
//! );
//! ```

use std::fmt;

use crate::models::{Actor, Item};

/// Actions that can be performed on items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemAction {
    /// List the actor's own items (GET collection)
    List,
    /// View the new-item form
    New,
    /// Create a new item (POST)
    Create,
    /// View the edit form for one item
    Edit,
    /// Replace an item's text (PATCH/PUT)
    Update,
    /// Delete an item (DELETE)
    Delete,
}

impl ItemAction {
    /// Whether this action addresses a single existing item and therefore
    /// requires ownership on top of authentication.
    #[must_use]
    pub const fn targets_item(&self) -> bool {
        matches!(self, Self::Edit | Self::Update | Self::Delete)
    }

    /// Whether this action writes to the store.
    #[must_use]
    pub const fn is_mutation(&self) -> bool {
        matches!(self, Self::Create | Self::Update | Self::Delete)
    }

    pub fn all() -> &'static [ItemAction] {
        &[
            Self::List,
            Self::New,
            Self::Create,
            Self::Edit,
            Self::Update,
            Self::Delete,
        ]
    }
}

impl fmt::Display for ItemAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::List => "list",
            Self::New => "new",
            Self::Create => "create",
            Self::Edit => "edit",
            Self::Update => "update",
            Self::Delete => "delete",
        })
    }
}

/// Result of evaluating an (actor, item, action) triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// No actor resolved for the request
    Unauthenticated,
    /// Actor may proceed
    Granted,
    /// Actor is signed in but the item belongs to someone else
    NotOwner,
    /// Actor is signed in but the addressed item does not exist
    Missing,
}

impl AccessDecision {
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }
}

impl fmt::Display for AccessDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unauthenticated => "unauthenticated",
            Self::Granted => "granted",
            Self::NotOwner => "not_owner",
            Self::Missing => "missing",
        })
    }
}

/// Decide whether `actor` may perform `action`, on `item` when the action
/// addresses one.
///
/// Authentication is always checked first, so an anonymous request never
/// learns anything about the item. For collection actions the item is ignored.
pub fn decide(actor: Option<&Actor>, item: Option<&Item>, action: ItemAction) -> AccessDecision {
    let Some(actor) = actor else {
        return AccessDecision::Unauthenticated;
    };

    if !action.targets_item() {
        return AccessDecision::Granted;
    }

    match item {
        None => AccessDecision::Missing,
        Some(item) if item.is_owned_by(actor) => AccessDecision::Granted,
        Some(_) => AccessDecision::NotOwner,
    }
}

/// Boolean form of [`decide`].
pub fn can_access(actor: Option<&Actor>, item: Option<&Item>, action: ItemAction) -> bool {
    decide(actor, item, action).is_granted()
}
