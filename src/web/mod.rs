//! # Web API Module
//!
//! Axum HTTP surface for the items service.
//!
//! ## Core Components
//!
//! - [`routes`] - HTTP route definitions and organization
//! - [`handlers`] - Request handlers for items, sessions and health
//! - [`middleware`] - Session resolution and request IDs
//! - [`state`] - Shared application state
//! - [`response_types`] - JSON payloads and outcome rendering
//! - [`errors`] - Web-facing error type

pub mod errors;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response_types;
pub mod routes;
pub mod state;

use axum::Router;
use state::AppState;

pub use errors::{ApiError, ApiResult};

/// Create the main Axum application with all routes and middleware
///
/// Sets up:
/// - Public health routes
/// - Item and session routes behind the session middleware
/// - Request IDs, the request timeout and HTTP tracing for everything
pub fn create_app(app_state: AppState) -> Router {
    let request_timeout = app_state.config.server.request_timeout();

    // Public routes - no session lookup
    let public_routes = Router::new().merge(routes::health_routes());

    // Session-aware routes - the current actor is resolved for every request
    let session_routes = Router::new()
        .merge(routes::item_routes())
        .merge(routes::session_routes(&app_state.config.paths.sign_in))
        .layer(axum::middleware::from_fn_with_state(
            app_state.clone(),
            middleware::session::resolve_current_actor,
        ));

    Router::new()
        .merge(public_routes)
        .merge(session_routes)
        .layer(axum::middleware::from_fn(
            middleware::request_id::add_request_id,
        ))
        .layer(tower_http::timeout::TimeoutLayer::new(request_timeout))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(app_state)
}
