//! # Item Access Controller
//!
//! Mediates every item operation on behalf of the current actor. Each
//! operation runs the same sequence:
//!
//! 1. Authentication - anonymous requests end in [`Outcome::RedirectSignIn`]
//!    before the store is touched
//! 2. Ownership - item operations load the target and ask
//!    [`decide`](crate::authorization::decide); foreign and missing items both
//!    end in [`Outcome::RedirectRoot`] with nothing written
//! 3. Store operation - only for granted requests
//!
//! Authorization failures are ordinary outcomes. The only errors returned are
//! store infrastructure failures.

use std::sync::Arc;
use uuid::Uuid;

use crate::authorization::{decide, AccessDecision, ItemAction};
use crate::error::Result;
use crate::logging::log_item_operation;
use crate::models::{Actor, Item};
use crate::store::{ItemStore, StoreError};

/// Content rendered for a successful view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    ItemList(Vec<Item>),
    NewItemForm,
    EditItemForm(Item),
}

/// Terminal result of one controller operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Show a page (200)
    Render(Page),
    /// Store refused the submitted text; show the form again with messages (422)
    Invalid { page: Page, errors: Vec<String> },
    /// Redirect to the item list
    RedirectRoot,
    /// Redirect to the sign-in page
    RedirectSignIn,
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Render(_) => "render",
            Self::Invalid { .. } => "invalid",
            Self::RedirectRoot => "redirect_root",
            Self::RedirectSignIn => "redirect_sign_in",
        }
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, Self::RedirectRoot | Self::RedirectSignIn)
    }

    /// Outcome for an authorization decision that did not grant access
    fn rejected(decision: AccessDecision) -> Option<Self> {
        match decision {
            AccessDecision::Granted => None,
            AccessDecision::Unauthenticated => Some(Self::RedirectSignIn),
            AccessDecision::NotOwner | AccessDecision::Missing => Some(Self::RedirectRoot),
        }
    }
}

/// Authorization-scoped CRUD over items
#[derive(Clone)]
pub struct ItemAccessController {
    store: Arc<dyn ItemStore>,
}

impl std::fmt::Debug for ItemAccessController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemAccessController").finish_non_exhaustive()
    }
}

impl ItemAccessController {
    pub fn new(store: Arc<dyn ItemStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn ItemStore> {
        &self.store
    }

    /// ListOwn: items owned by the actor
    pub async fn list_own(&self, actor: Option<&Actor>) -> Result<Outcome> {
        let action = ItemAction::List;
        let outcome = match authorize_collection(actor, action) {
            Err(rejected) => rejected,
            Ok(actor) => {
                let items = self.store.list_by_owner(actor.actor_id).await?;
                Outcome::Render(Page::ItemList(items))
            }
        };

        Ok(finish(action, actor, None, outcome))
    }

    /// ShowNewForm: no store access
    pub async fn show_new_form(&self, actor: Option<&Actor>) -> Result<Outcome> {
        let action = ItemAction::New;
        let outcome = match authorize_collection(actor, action) {
            Err(rejected) => rejected,
            Ok(_) => Outcome::Render(Page::NewItemForm),
        };

        Ok(finish(action, actor, None, outcome))
    }

    /// Create: new item owned by the actor
    pub async fn create(&self, actor: Option<&Actor>, text: &str) -> Result<Outcome> {
        let action = ItemAction::Create;
        let outcome = match authorize_collection(actor, action) {
            Err(rejected) => rejected,
            Ok(actor) => match self.store.create(actor.actor_id, text).await {
                Ok(_) => Outcome::RedirectRoot,
                Err(StoreError::Validation(e)) => Outcome::Invalid {
                    page: Page::NewItemForm,
                    errors: vec![e.to_string()],
                },
                Err(e) => return Err(e.into()),
            },
        };

        Ok(finish(action, actor, None, outcome))
    }

    /// ShowEditForm: the target item, for its owner only
    pub async fn show_edit_form(&self, actor: Option<&Actor>, item_id: Uuid) -> Result<Outcome> {
        let action = ItemAction::Edit;
        let outcome = match self.authorize_item(actor, item_id, action).await? {
            Err(rejected) => rejected,
            Ok(item) => Outcome::Render(Page::EditItemForm(item)),
        };

        Ok(finish(action, actor, Some(item_id), outcome))
    }

    /// Update: replace the target item's text, for its owner only
    pub async fn update(
        &self,
        actor: Option<&Actor>,
        item_id: Uuid,
        text: &str,
    ) -> Result<Outcome> {
        let action = ItemAction::Update;
        let outcome = match self.authorize_item(actor, item_id, action).await? {
            Err(rejected) => rejected,
            Ok(item) => match self.store.update(item.item_id, text).await {
                Ok(_) => Outcome::RedirectRoot,
                Err(StoreError::Validation(e)) => Outcome::Invalid {
                    page: Page::EditItemForm(item),
                    errors: vec![e.to_string()],
                },
                // Deleted between the ownership check and the write
                Err(StoreError::NotFound(_)) => Outcome::RedirectRoot,
                Err(e) => return Err(e.into()),
            },
        };

        Ok(finish(action, actor, Some(item_id), outcome))
    }

    /// Delete: remove the target item, for its owner only
    pub async fn delete(&self, actor: Option<&Actor>, item_id: Uuid) -> Result<Outcome> {
        let action = ItemAction::Delete;
        let outcome = match self.authorize_item(actor, item_id, action).await? {
            Err(rejected) => rejected,
            Ok(item) => match self.store.delete(item.item_id).await {
                Ok(()) | Err(StoreError::NotFound(_)) => Outcome::RedirectRoot,
                Err(e) => return Err(e.into()),
            },
        };

        Ok(finish(action, actor, Some(item_id), outcome))
    }

    /// Outcome for an item action whose id could not even be parsed.
    ///
    /// Goes through the same predicate as a missing item so the response
    /// matches one for an id that parses but does not exist.
    pub fn unresolvable_item(&self, actor: Option<&Actor>, action: ItemAction) -> Outcome {
        let outcome =
            Outcome::rejected(decide(actor, None, action)).unwrap_or(Outcome::RedirectRoot);
        finish(action, actor, None, outcome)
    }

    /// Load the target item and decide access. Anonymous requests are decided
    /// without a store lookup.
    async fn authorize_item(
        &self,
        actor: Option<&Actor>,
        item_id: Uuid,
        action: ItemAction,
    ) -> Result<std::result::Result<Item, Outcome>> {
        if actor.is_none() {
            return Ok(Err(Outcome::RedirectSignIn));
        }

        let item = self.store.find(item_id).await?;
        match Outcome::rejected(decide(actor, item.as_ref(), action)) {
            Some(rejected) => Ok(Err(rejected)),
            None => match item {
                Some(item) => Ok(Ok(item)),
                None => Ok(Err(Outcome::RedirectRoot)),
            },
        }
    }
}

fn authorize_collection(
    actor: Option<&Actor>,
    action: ItemAction,
) -> std::result::Result<&Actor, Outcome> {
    match (Outcome::rejected(decide(actor, None, action)), actor) {
        (None, Some(actor)) => Ok(actor),
        (Some(rejected), _) => Err(rejected),
        (None, None) => Err(Outcome::RedirectSignIn),
    }
}

fn finish(
    action: ItemAction,
    actor: Option<&Actor>,
    item_id: Option<Uuid>,
    outcome: Outcome,
) -> Outcome {
    log_item_operation(
        &action.to_string(),
        action.is_mutation(),
        actor.map(|a| a.actor_id),
        item_id,
        outcome.label(),
    );
    outcome
}
