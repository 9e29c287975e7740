//! # Health Check Handlers
//!
//! Health check endpoints for monitoring and load balancing.

use axum::extract::State;
use axum::Json;
use tracing::{debug, error};

use crate::web::errors::ApiError;
use crate::web::response_types::{HealthResponse, ReadinessResponse};
use crate::web::state::AppState;

/// Basic health check endpoint: GET /health
///
/// Returns OK whenever the process is serving requests.
pub async fn basic_health(_state: State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Readiness probe: GET /health/ready
///
/// Ready once the item store answers a count query.
pub async fn readiness_probe(
    State(state): State<AppState>,
) -> Result<Json<ReadinessResponse>, ApiError> {
    debug!("Performing readiness probe");

    match state.store().count().await {
        Ok(item_count) => Ok(Json(ReadinessResponse {
            status: "ready".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            item_count,
        })),
        Err(e) => {
            error!(error = %e, "Readiness probe failed: item store unavailable");
            Err(ApiError::ServiceUnavailable)
        }
    }
}
