//! DTOs for the `/metrics/*` endpoints.
//!
//! Every response names the run it was computed from (`analysis_id`) and
//! when that run was created (`timestamp`).

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::round2;
use super::runs::ThresholdItem;
use crate::application::services::{ExceedingCities, RunMetric};

#[derive(Debug, Serialize)]
pub struct TotalSitesResponse {
    pub total_galamsay_sites: i64,
    pub analysis_id: i64,
    pub timestamp: DateTime<Utc>,
}

impl From<RunMetric<i64>> for TotalSitesResponse {
    fn from(metric: RunMetric<i64>) -> Self {
        Self {
            total_galamsay_sites: metric.value,
            analysis_id: metric.run_id,
            timestamp: metric.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RegionHighestResponse {
    pub region: String,
    pub galamsay_sites: i64,
    pub analysis_id: i64,
    pub timestamp: DateTime<Utc>,
}

impl From<RunMetric<(String, i64)>> for RegionHighestResponse {
    fn from(metric: RunMetric<(String, i64)>) -> Self {
        let (region, galamsay_sites) = metric.value;
        Self {
            region,
            galamsay_sites,
            analysis_id: metric.run_id,
            timestamp: metric.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AveragePerRegionResponse {
    pub average_sites_per_region: f64,
    pub analysis_id: i64,
    pub timestamp: DateTime<Utc>,
}

impl From<RunMetric<f64>> for AveragePerRegionResponse {
    fn from(metric: RunMetric<f64>) -> Self {
        Self {
            average_sites_per_region: round2(metric.value),
            analysis_id: metric.run_id,
            timestamp: metric.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ExceedingThresholdResponse {
    pub analysis_id: i64,
    pub timestamp: DateTime<Utc>,
    pub threshold: i64,
    pub items: Vec<ThresholdItem>,
}

impl From<RunMetric<ExceedingCities>> for ExceedingThresholdResponse {
    fn from(metric: RunMetric<ExceedingCities>) -> Self {
        Self {
            analysis_id: metric.run_id,
            timestamp: metric.created_at,
            threshold: metric.value.threshold,
            items: metric
                .value
                .items
                .into_iter()
                .map(ThresholdItem::from)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_is_rounded() {
        let response = AveragePerRegionResponse::from(RunMetric {
            run_id: 1,
            created_at: Utc::now(),
            value: 85.0 / 6.0,
        });

        assert_eq!(response.average_sites_per_region, 14.17);
    }
}
