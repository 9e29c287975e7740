//! # Session Handlers
//!
//! The sign-in form, sign-in and sign-out. Credentials are checked by the
//! [`CredentialVerifier`](crate::session::CredentialVerifier) held in
//! [`AppState`]; sessions are opened and revoked through the
//! [`SessionProvider`](crate::session::SessionProvider).

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use tracing::{info, warn};

use crate::session::CurrentActor;
use crate::web::errors::{ApiError, ApiResult};
use crate::web::extractors::RequestContext;
use crate::web::middleware::session::{
    append_set_cookie, expired_session_cookie, session_cookie,
};
use crate::web::response_types::{SignInFormResponse, SignInParams};
use crate::web::state::AppState;

/// Sign-in page: GET /users/sign_in
///
/// Signed-in actors have nothing to do here and go back to the item list.
pub async fn new_session(State(state): State<AppState>, current: CurrentActor) -> Response {
    if current.is_authenticated() {
        return Redirect::to(&state.config.paths.root).into_response();
    }

    Json(SignInFormResponse::new(&state.config.paths.sign_in)).into_response()
}

/// Sign in: POST /users/sign_in
///
/// Valid credentials open a session and redirect to the item list with the
/// session cookie set. Anything else redirects back to the sign-in page. A body
/// that is not the expected JSON is a 400.
pub async fn create_session(
    State(state): State<AppState>,
    current: CurrentActor,
    context: RequestContext,
    params: Result<Json<SignInParams>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(params) = params.map_err(|rejection| {
        warn!(
            request_id = %context.request_id,
            error = %rejection.body_text(),
            "Rejected sign-in body"
        );
        ApiError::bad_request(rejection.body_text())
    })?;

    if current.is_authenticated() {
        return Ok(Redirect::to(&state.config.paths.root).into_response());
    }

    let credentials = &params.user;
    let Some(actor) = state
        .credentials
        .verify(&credentials.email, &credentials.password)
        .await
    else {
        warn!(
            request_id = %context.request_id,
            email = %credentials.email,
            "Sign-in failed"
        );
        return Ok(Redirect::to(&state.config.paths.sign_in).into_response());
    };

    let actor_id = actor.actor_id;
    let token = state.sessions.sign_in(actor).await;
    info!(
        request_id = %context.request_id,
        actor_id = %actor_id,
        "Session signed in"
    );

    let mut response = Redirect::to(&state.config.paths.root).into_response();
    append_set_cookie(&mut response, &session_cookie(&state.config.session, &token));
    Ok(response)
}

/// Sign out: DELETE /users/sign_out
pub async fn destroy_session(State(state): State<AppState>, current: CurrentActor) -> Response {
    let mut response = Redirect::to(&state.config.paths.root).into_response();

    if let Some(token) = &current.token {
        let revoked = state.sessions.sign_out(token).await;
        info!(
            actor_id = ?current.actor().map(|actor| actor.actor_id),
            revoked = revoked,
            "Session signed out"
        );
        append_set_cookie(&mut response, &expired_session_cookie(&state.config.session));
    }

    response
}
