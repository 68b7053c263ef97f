//! DTO for the single-city lookup.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::application::services::RunMetric;
use crate::domain::entities::CleanRecord;

#[derive(Debug, Serialize)]
pub struct CityResponse {
    pub city: String,
    pub region: String,
    pub galamsay_sites: i64,
    pub analysis_id: i64,
    pub timestamp: DateTime<Utc>,
}

impl From<RunMetric<CleanRecord>> for CityResponse {
    fn from(metric: RunMetric<CleanRecord>) -> Self {
        Self {
            city: metric.value.city,
            region: metric.value.region,
            galamsay_sites: metric.value.site_count,
            analysis_id: metric.run_id,
            timestamp: metric.created_at,
        }
    }
}
