//! # Web API Request/Response Types
//!
//! JSON payloads for the items surface and the mapping from controller
//! [`Outcome`]s to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::PathsConfig;
use crate::controller::{Outcome, Page};
use crate::models::{Item, MAX_TEXT_LENGTH};

/// Submitted item parameters: `{"item": {"text": "..."}}`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ItemParams {
    #[serde(default)]
    pub item: ItemFields,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ItemFields {
    #[serde(default)]
    pub text: String,
}

impl ItemParams {
    pub fn text(&self) -> &str {
        &self.item.text
    }
}

/// Item as presented to clients
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ItemResponse {
    pub item_id: Uuid,
    pub text: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Item> for ItemResponse {
    fn from(item: Item) -> Self {
        Self {
            item_id: item.item_id,
            text: item.text,
            created_at: item.created_at.and_utc().to_rfc3339(),
            updated_at: item.updated_at.and_utc().to_rfc3339(),
        }
    }
}

/// The current actor's items, oldest first
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ItemListResponse {
    pub items: Vec<ItemResponse>,
    pub count: usize,
}

/// Description of a form field
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FormField {
    pub name: String,
    pub required: bool,
    pub max_length: Option<usize>,
}

/// New or edit item form
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ItemFormResponse {
    /// Where the form submits
    pub action: String,
    pub method: String,
    pub item: Option<ItemResponse>,
    pub fields: Vec<FormField>,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl ItemFormResponse {
    pub fn new_item() -> Self {
        Self {
            action: "/items".to_string(),
            method: "POST".to_string(),
            item: None,
            fields: vec![text_field()],
            errors: Vec::new(),
        }
    }

    pub fn edit_item(item: Item) -> Self {
        Self {
            action: format!("/items/{}", item.item_id),
            method: "PATCH".to_string(),
            item: Some(item.into()),
            fields: vec![text_field()],
            errors: Vec::new(),
        }
    }

    pub fn with_errors(mut self, errors: Vec<String>) -> Self {
        self.errors = errors;
        self
    }
}

fn text_field() -> FormField {
    FormField {
        name: "item[text]".to_string(),
        required: true,
        max_length: Some(MAX_TEXT_LENGTH),
    }
}

/// Submitted sign-in credentials: `{"user": {"email": "...", "password": "..."}}`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SignInParams {
    #[serde(default)]
    pub user: SignInFields,
}

#[derive(Clone, Default, Deserialize, Serialize)]
pub struct SignInFields {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl std::fmt::Debug for SignInFields {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignInFields")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Sign-in form shown to anonymous visitors
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SignInFormResponse {
    pub action: String,
    pub method: String,
    pub fields: Vec<FormField>,
}

impl SignInFormResponse {
    pub fn new(sign_in_path: &str) -> Self {
        Self {
            action: sign_in_path.to_string(),
            method: "POST".to_string(),
            fields: vec![
                FormField {
                    name: "user[email]".to_string(),
                    required: true,
                    max_length: None,
                },
                FormField {
                    name: "user[password]".to_string(),
                    required: true,
                    max_length: None,
                },
            ],
        }
    }
}

/// Basic health check response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

/// Readiness probe response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: String,
    pub item_count: u64,
}

fn page_body(page: Page) -> Response {
    match page {
        Page::ItemList(items) => {
            let items: Vec<ItemResponse> = items.into_iter().map(ItemResponse::from).collect();
            let count = items.len();
            Json(ItemListResponse { items, count }).into_response()
        }
        Page::NewItemForm => Json(ItemFormResponse::new_item()).into_response(),
        Page::EditItemForm(item) => Json(ItemFormResponse::edit_item(item)).into_response(),
    }
}

/// Turn a controller outcome into the HTTP response
///
/// Redirects are `303 See Other` so that browsers follow up with a GET after
/// POST, PATCH and DELETE.
pub fn render_outcome(outcome: Outcome, paths: &PathsConfig) -> Response {
    match outcome {
        Outcome::Render(page) => page_body(page),
        Outcome::Invalid { page, errors } => {
            let body = match page {
                Page::NewItemForm => Json(ItemFormResponse::new_item().with_errors(errors)),
                Page::EditItemForm(item) => {
                    Json(ItemFormResponse::edit_item(item).with_errors(errors))
                }
                list @ Page::ItemList(_) => {
                    return (StatusCode::UNPROCESSABLE_ENTITY, page_body(list)).into_response()
                }
            };
            (StatusCode::UNPROCESSABLE_ENTITY, body).into_response()
        }
        Outcome::RedirectRoot => Redirect::to(&paths.root).into_response(),
        Outcome::RedirectSignIn => Redirect::to(&paths.sign_in).into_response(),
    }
}
