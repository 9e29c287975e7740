//! # Item Handlers
//!
//! Thin adapters from HTTP to the [`ItemAccessController`]. Handlers parse the
//! path and body, hand the current actor to the controller and render whatever
//! outcome it returns. They never make authorization decisions themselves.
//!
//! [`ItemAccessController`]: crate::controller::ItemAccessController

use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use tracing::debug;
use uuid::Uuid;

use crate::authorization::ItemAction;
use crate::controller::Outcome;
use crate::session::CurrentActor;
use crate::web::errors::ApiResult;
use crate::web::extractors::RequestContext;
use crate::web::response_types::{render_outcome, ItemParams};
use crate::web::state::AppState;

/// List the current actor's items: GET / and GET /items
pub async fn index(State(state): State<AppState>, current: CurrentActor) -> ApiResult<Response> {
    let outcome = state.controller.list_own(current.actor()).await?;
    Ok(render_outcome(outcome, &state.config.paths))
}

/// New item form: GET /items/new
pub async fn new(State(state): State<AppState>, current: CurrentActor) -> ApiResult<Response> {
    let outcome = state.controller.show_new_form(current.actor()).await?;
    Ok(render_outcome(outcome, &state.config.paths))
}

/// Create an item: POST /items
///
/// A missing or unparseable body counts as empty text, so that the decision is
/// still made by the controller (sign-in redirect for anonymous requests, 422
/// for signed-in ones).
pub async fn create(
    State(state): State<AppState>,
    current: CurrentActor,
    context: RequestContext,
    params: Option<Json<ItemParams>>,
) -> ApiResult<Response> {
    let params = item_params(params, &context);
    let outcome = state
        .controller
        .create(current.actor(), params.text())
        .await?;
    Ok(render_outcome(outcome, &state.config.paths))
}

/// Edit form for one item: GET /items/:id/edit
pub async fn edit(
    State(state): State<AppState>,
    current: CurrentActor,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let outcome = match parse_item_id(&id) {
        Some(item_id) => state.controller.show_edit_form(current.actor(), item_id).await?,
        None => state.controller.unresolvable_item(current.actor(), ItemAction::Edit),
    };
    Ok(render_outcome(outcome, &state.config.paths))
}

/// Update one item: PATCH /items/:id (PUT accepted)
pub async fn update(
    State(state): State<AppState>,
    current: CurrentActor,
    context: RequestContext,
    Path(id): Path<String>,
    params: Option<Json<ItemParams>>,
) -> ApiResult<Response> {
    let params = item_params(params, &context);
    let outcome = match parse_item_id(&id) {
        Some(item_id) => {
            state
                .controller
                .update(current.actor(), item_id, params.text())
                .await?
        }
        None => state.controller.unresolvable_item(current.actor(), ItemAction::Update),
    };
    Ok(render_outcome(outcome, &state.config.paths))
}

/// Delete one item: DELETE /items/:id
pub async fn destroy(
    State(state): State<AppState>,
    current: CurrentActor,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let outcome: Outcome = match parse_item_id(&id) {
        Some(item_id) => state.controller.delete(current.actor(), item_id).await?,
        None => state.controller.unresolvable_item(current.actor(), ItemAction::Delete),
    };
    Ok(render_outcome(outcome, &state.config.paths))
}

fn parse_item_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw).ok()
}

fn item_params(params: Option<Json<ItemParams>>, context: &RequestContext) -> ItemParams {
    match params {
        Some(Json(params)) => params,
        None => {
            debug!(request_id = %context.request_id, "No usable item params in request body");
            ItemParams::default()
        }
    }
}
