//! Handler for the service index.

use axum::Json;

use crate::api::dto::index::{EndpointInfo, IndexResponse};

const ENDPOINTS: [(&str, &str); 10] = [
    ("/health", "Service and database health"),
    ("/analyses", "Run history, newest first (limit, offset)"),
    ("/analyses/latest", "Most recent run with all records"),
    ("/analyses/{id}", "One run with all records"),
    ("/metrics/total-sites", "Total galamsay sites"),
    ("/metrics/region-highest", "Region with the most sites"),
    ("/metrics/average-per-region", "Average sites per region"),
    (
        "/metrics/cities-exceeding-threshold",
        "Cities above the site threshold (threshold)",
    ),
    ("/city/{name}", "Sites recorded for one city"),
    ("/region/{name}", "Rollup of one region"),
];

/// Lists the available endpoints.
///
/// # Endpoint
///
/// `GET /`
pub async fn index_handler() -> Json<IndexResponse> {
    let endpoints = ENDPOINTS
        .iter()
        .map(|&(path, description)| EndpointInfo {
            method: "GET",
            path,
            description,
        })
        .collect();

    Json(IndexResponse {
        service: "Galamsay Analysis API",
        version: env!("CARGO_PKG_VERSION"),
        endpoints,
    })
}
