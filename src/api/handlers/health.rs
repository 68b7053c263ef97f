//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health and the number of stored runs.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: Run store reachable
/// - **503 Service Unavailable**: Run store unreachable
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "analysis_runs": 3,
///   "checks": {
///     "database": { "status": "ok", "message": "Connected, 3 analysis runs" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let (analysis_runs, database) = match state.query_service.health().await {
        Ok(count) => (
            Some(count),
            CheckStatus {
                status: "ok".to_string(),
                message: Some(format!("Connected, {} analysis runs", count)),
            },
        ),
        Err(e) => (
            None,
            CheckStatus {
                status: "error".to_string(),
                message: Some(format!("Database error: {}", e)),
            },
        ),
    };

    let healthy = database.status == "ok";

    let response = HealthResponse {
        status: if healthy { "healthy" } else { "unhealthy" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        analysis_runs,
        checks: HealthChecks { database },
    };

    if healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}
