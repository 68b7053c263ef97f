//! Handlers for the run history.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::PathRejection, rejection::QueryRejection},
};
use validator::Validate;

use crate::api::dto::pagination::ListRunsParams;
use crate::api::dto::runs::{RunDetailResponse, RunListResponse, RunSummaryResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Lists stored runs, newest first.
///
/// # Endpoint
///
/// `GET /analyses`
///
/// # Query Parameters
///
/// - `limit` (optional): Page size, 1 to 100 (default: 10)
/// - `offset` (optional): Runs to skip (default: 0)
///
/// # Errors
///
/// Returns 400 Bad Request if pagination parameters are out of range.
/// Returns 404 Not Found if the page is empty.
pub async fn list_runs_handler(
    State(state): State<AppState>,
    params: Result<Query<ListRunsParams>, QueryRejection>,
) -> Result<Json<RunListResponse>, AppError> {
    let Query(params) = params?;
    params.validate()?;

    let (limit, offset) = (params.limit(), params.offset());
    let runs = state.query_service.list_runs(limit, offset).await?;

    Ok(Json(RunListResponse {
        limit,
        offset,
        items: runs.into_iter().map(RunSummaryResponse::from).collect(),
    }))
}

/// Returns the most recent run with all of its records.
///
/// # Endpoint
///
/// `GET /analyses/latest`
///
/// # Errors
///
/// Returns 404 Not Found if no run has been stored yet.
pub async fn latest_run_handler(
    State(state): State<AppState>,
) -> Result<Json<RunDetailResponse>, AppError> {
    let run = state.query_service.get_run(None).await?;
    Ok(Json(run.into()))
}

/// Returns one run with all of its records.
///
/// # Endpoint
///
/// `GET /analyses/{id}`
///
/// # Errors
///
/// Returns 400 Bad Request if `id` is not an integer.
/// Returns 404 Not Found if the run does not exist.
pub async fn run_handler(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<RunDetailResponse>, AppError> {
    let Path(id) = id?;
    let run = state.query_service.get_run(Some(id)).await?;
    Ok(Json(run.into()))
}
