//! DTO for the per-region rollup.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::round2;
use crate::application::services::RunMetric;
use crate::domain::entities::RegionRollup;

#[derive(Debug, Serialize)]
pub struct RegionResponse {
    pub region: String,
    pub total_sites: i64,
    pub number_of_cities: usize,
    pub average_per_city: f64,
    /// Highest count first.
    pub cities: Vec<RegionCity>,
    pub analysis_id: i64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct RegionCity {
    pub city: String,
    pub galamsay_sites: i64,
}

impl From<RunMetric<RegionRollup>> for RegionResponse {
    fn from(metric: RunMetric<RegionRollup>) -> Self {
        let rollup = metric.value;

        Self {
            region: rollup.region,
            total_sites: rollup.total_sites,
            number_of_cities: rollup.number_of_cities,
            average_per_city: round2(rollup.average_per_city),
            cities: rollup
                .cities
                .into_iter()
                .map(|r| RegionCity {
                    city: r.city,
                    galamsay_sites: r.site_count,
                })
                .collect(),
            analysis_id: metric.run_id,
            timestamp: metric.created_at,
        }
    }
}
