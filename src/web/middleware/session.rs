//! # Session Middleware
//!
//! Resolves the session cookie into a [`CurrentActor`] and stores it in the
//! request extensions. Never rejects a request: an absent, unknown or expired
//! session simply resolves to the anonymous actor, and the controller decides
//! what anonymous requests may do.

use axum::extract::{Request, State};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use tracing::{debug, warn};

use crate::config::SessionConfig;
use crate::session::{CurrentActor, SessionToken};
use crate::web::state::AppState;

/// Resolve the current actor for every item and session route
pub async fn resolve_current_actor(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let cookie_name = &state.config.session.cookie_name;

    let current = match session_token(request.headers(), cookie_name) {
        Some(token) => match state.sessions.current_actor(&token).await {
            Some(actor) => {
                debug!(actor_id = %actor.actor_id, "Session resolved");
                CurrentActor::signed_in(actor, token)
            }
            None => {
                debug!("Session token unknown or expired");
                CurrentActor::anonymous()
            }
        },
        None => CurrentActor::anonymous(),
    };

    request.extensions_mut().insert(current);

    next.run(request).await
}

/// Pull the session token out of the `Cookie` headers
///
/// Multiple `Cookie` headers are all searched. Headers that are not valid
/// UTF-8 are skipped.
pub fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<SessionToken> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| match value.to_str() {
            Ok(cookies) => Some(cookies),
            Err(_) => {
                warn!("Cookie header contains non-UTF-8 bytes");
                None
            }
        })
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == cookie_name)
        .map(|(_, value)| value.trim_matches('"'))
        .filter(|value| !value.is_empty())
        .map(SessionToken::from)
}

/// `Set-Cookie` value that binds `token` to the client
pub fn session_cookie(config: &SessionConfig, token: &SessionToken) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        config.cookie_name, token, config.ttl_seconds
    );
    if config.secure_cookie {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that removes the session cookie from the client
pub fn expired_session_cookie(config: &SessionConfig) -> String {
    let mut cookie = format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        config.cookie_name
    );
    if config.secure_cookie {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Append a `Set-Cookie` header to `response`
pub fn append_set_cookie(response: &mut Response, cookie: &str) {
    match HeaderValue::from_str(cookie) {
        Ok(value) => {
            response.headers_mut().append(SET_COOKIE, value);
        }
        Err(e) => warn!(error = %e, "Refusing to emit malformed Set-Cookie header"),
    }
}
