//! API route configuration.

use crate::api::handlers::{
    average_per_region_handler, city_handler, exceeding_threshold_handler, latest_run_handler,
    list_runs_handler, region_handler, region_highest_handler, run_handler, total_sites_handler,
};
use crate::state::AppState;
use axum::{Router, routing::get};

/// All query routes. Every endpoint is `GET`.
///
/// # Endpoints
///
/// - `/analyses`                            - Run history (paginated)
/// - `/analyses/latest`                     - Most recent run
/// - `/analyses/{id}`                       - One run
/// - `/metrics/total-sites`                 - Total sites
/// - `/metrics/region-highest`              - Top region
/// - `/metrics/average-per-region`          - Average per region
/// - `/metrics/cities-exceeding-threshold`  - Cities above the threshold
/// - `/city/{name}`                         - One city
/// - `/region/{name}`                       - One region rollup
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/analyses", get(list_runs_handler))
        .route("/analyses/latest", get(latest_run_handler))
        .route("/analyses/{id}", get(run_handler))
        .route("/metrics/total-sites", get(total_sites_handler))
        .route("/metrics/region-highest", get(region_highest_handler))
        .route(
            "/metrics/average-per-region",
            get(average_per_region_handler),
        )
        .route(
            "/metrics/cities-exceeding-threshold",
            get(exceeding_threshold_handler),
        )
        .route("/city/{name}", get(city_handler))
        .route("/region/{name}", get(region_handler))
}
