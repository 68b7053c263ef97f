//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod health;
pub mod index;
pub mod lookup;
pub mod metrics;
pub mod runs;

pub use health::health_handler;
pub use index::index_handler;
pub use lookup::{city_handler, region_handler};
pub use metrics::{
    average_per_region_handler, exceeding_threshold_handler, region_highest_handler,
    total_sites_handler,
};
pub use runs::{latest_run_handler, list_runs_handler, run_handler};
