//! Handlers for city and region lookups.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
};

use crate::api::dto::city::CityResponse;
use crate::api::dto::pagination::RunSelector;
use crate::api::dto::region::RegionResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Sites recorded for one city.
///
/// # Endpoint
///
/// `GET /city/{name}?analysis_id=`
///
/// The name is matched ignoring case.
///
/// # Errors
///
/// Returns 404 Not Found if the run does not exist or has no such city.
pub async fn city_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    selector: Result<Query<RunSelector>, QueryRejection>,
) -> Result<Json<CityResponse>, AppError> {
    let Query(selector) = selector?;
    let metric = state.query_service.city(selector.analysis_id, &name).await?;
    Ok(Json(metric.into()))
}

/// Rollup of every city in one region.
///
/// # Endpoint
///
/// `GET /region/{name}?analysis_id=`
///
/// The name is matched ignoring case; cities are listed highest count first.
///
/// # Errors
///
/// Returns 404 Not Found if the run does not exist or has no city in that
/// region.
pub async fn region_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    selector: Result<Query<RunSelector>, QueryRejection>,
) -> Result<Json<RegionResponse>, AppError> {
    let Query(selector) = selector?;
    let metric = state
        .query_service
        .region(selector.analysis_id, &name)
        .await?;
    Ok(Json(metric.into()))
}
