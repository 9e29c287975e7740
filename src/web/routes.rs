//! # Web API Route Definitions
//!
//! Routes are grouped by whether they need the current actor resolved.

use axum::routing::{delete, get, patch};
use axum::Router;

use crate::web::handlers;
use crate::web::state::AppState;

/// Item routes, Rails resource style
///
/// - `GET /` and `GET /items` - the actor's items
/// - `GET /items/new` - new item form
/// - `POST /items` - create
/// - `GET /items/:id/edit` - edit form
/// - `PATCH /items/:id` (or `PUT`) - update
/// - `DELETE /items/:id` - delete
pub fn item_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::items::index))
        .route(
            "/items",
            get(handlers::items::index).post(handlers::items::create),
        )
        .route("/items/new", get(handlers::items::new))
        .route("/items/:id/edit", get(handlers::items::edit))
        .route(
            "/items/:id",
            patch(handlers::items::update)
                .put(handlers::items::update)
                .delete(handlers::items::destroy),
        )
}

/// Session routes, with the sign-in form mounted at `sign_in_path`
/// (`paths.sign_in`, `/users/sign_in` by default)
///
/// - `GET {sign_in_path}` - sign-in form
/// - `POST {sign_in_path}` - check credentials and open a session
/// - `DELETE /users/sign_out` - revoke the current session
pub fn session_routes(sign_in_path: &str) -> Router<AppState> {
    Router::new()
        .route(
            sign_in_path,
            get(handlers::sessions::new_session).post(handlers::sessions::create_session),
        )
        .route("/users/sign_out", delete(handlers::sessions::destroy_session))
}

/// Health routes, public
///
/// - `/health` - basic health check
/// - `/health/ready` - readiness probe against the item store
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::basic_health))
        .route("/health/ready", get(handlers::health::readiness_probe))
}
