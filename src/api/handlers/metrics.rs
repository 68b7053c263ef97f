//! Handlers for the `/metrics/*` endpoints.
//!
//! Each accepts an optional `analysis_id`; without it the latest run is used.
//! A missing run yields 404.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use validator::Validate;

use crate::api::dto::metrics::{
    AveragePerRegionResponse, ExceedingThresholdResponse, RegionHighestResponse,
    TotalSitesResponse,
};
use crate::api::dto::pagination::{RunSelector, ThresholdParams};
use crate::error::AppError;
use crate::state::AppState;

/// `GET /metrics/total-sites`
pub async fn total_sites_handler(
    State(state): State<AppState>,
    selector: Result<Query<RunSelector>, QueryRejection>,
) -> Result<Json<TotalSitesResponse>, AppError> {
    let Query(selector) = selector?;
    let metric = state.query_service.total_sites(selector.analysis_id).await?;
    Ok(Json(metric.into()))
}

/// `GET /metrics/region-highest`
pub async fn region_highest_handler(
    State(state): State<AppState>,
    selector: Result<Query<RunSelector>, QueryRejection>,
) -> Result<Json<RegionHighestResponse>, AppError> {
    let Query(selector) = selector?;
    let metric = state.query_service.top_region(selector.analysis_id).await?;
    Ok(Json(metric.into()))
}

/// `GET /metrics/average-per-region`
///
/// The average is rounded to two decimals.
pub async fn average_per_region_handler(
    State(state): State<AppState>,
    selector: Result<Query<RunSelector>, QueryRejection>,
) -> Result<Json<AveragePerRegionResponse>, AppError> {
    let Query(selector) = selector?;
    let metric = state
        .query_service
        .average_per_region(selector.analysis_id)
        .await?;
    Ok(Json(metric.into()))
}

/// Cities above the site threshold.
///
/// # Endpoint
///
/// `GET /metrics/cities-exceeding-threshold`
///
/// # Query Parameters
///
/// - `analysis_id` (optional): Run to read (default: latest)
/// - `threshold` (optional, >= 0): Keep only counts strictly above this value.
///   Applied to the subset stored with the run, so values at or below the
///   stored threshold change nothing.
///
/// # Errors
///
/// Returns 400 Bad Request if `threshold` is negative or not an integer.
pub async fn exceeding_threshold_handler(
    State(state): State<AppState>,
    params: Result<Query<ThresholdParams>, QueryRejection>,
) -> Result<Json<ExceedingThresholdResponse>, AppError> {
    let Query(params) = params?;
    params.validate()?;

    let metric = state
        .query_service
        .exceeding_threshold(params.analysis_id, params.threshold)
        .await?;

    Ok(Json(metric.into()))
}
