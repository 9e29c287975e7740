//! # Custom Axum Extractors
//!
//! Extractors for values the middleware stack places in request extensions.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tracing::debug;

use crate::session::CurrentActor;
use crate::web::errors::ApiError;
use crate::web::middleware::request_id::RequestId;

/// Current actor extractor
///
/// Reads the [`CurrentActor`] inserted by the session middleware. A missing
/// extension means the route was mounted without that middleware, which is a
/// wiring bug rather than an anonymous request.
#[async_trait]
impl<S> FromRequestParts<S> for CurrentActor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let current = parts
            .extensions
            .get::<CurrentActor>()
            .cloned()
            .ok_or_else(|| ApiError::internal("session middleware not installed"))?;

        if let Some(actor) = current.actor() {
            debug!(actor_id = %actor.actor_id, "Extracted current actor");
        }

        Ok(current)
    }
}

/// Request context extractor
///
/// Extracts common request context information like the request ID.
pub struct RequestContext {
    pub request_id: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let request_id = parts
            .extensions
            .get::<RequestId>()
            .map(|id| id.as_str().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        Ok(Self { request_id })
    }
}
