//! DTOs for the run history endpoints.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::round2;
use crate::domain::entities::{AnalysisRun, CleanRecord, RunSummary, ThresholdRecord};
use crate::domain::aggregator::EXCEEDING_THRESHOLD;

/// Header of one stored run.
#[derive(Debug, Serialize)]
pub struct RunSummaryResponse {
    pub analysis_id: i64,
    pub timestamp: DateTime<Utc>,
    pub total_galamsay_sites: i64,
    pub region_with_highest_sites: String,
    pub highest_region_sites: i64,
    pub average_sites_per_region: f64,
    pub status: String,
}

impl From<RunSummary> for RunSummaryResponse {
    fn from(summary: RunSummary) -> Self {
        Self {
            analysis_id: summary.id,
            timestamp: summary.created_at,
            total_galamsay_sites: summary.total_sites,
            region_with_highest_sites: summary.top_region,
            highest_region_sites: summary.top_region_total,
            average_sites_per_region: round2(summary.average_per_region),
            status: summary.status,
        }
    }
}

/// One page of the run history.
#[derive(Debug, Serialize)]
pub struct RunListResponse {
    pub limit: i64,
    pub offset: i64,
    pub items: Vec<RunSummaryResponse>,
}

/// A cleaned record as exposed by the API.
#[derive(Debug, Serialize)]
pub struct CityItem {
    pub city: String,
    pub region: String,
    pub galamsay_sites: i64,
}

impl From<CleanRecord> for CityItem {
    fn from(record: CleanRecord) -> Self {
        Self {
            city: record.city,
            region: record.region,
            galamsay_sites: record.site_count,
        }
    }
}

/// An exceeding-threshold record with the threshold it was selected by.
#[derive(Debug, Serialize)]
pub struct ThresholdItem {
    pub city: String,
    pub region: String,
    pub galamsay_sites: i64,
    pub threshold: i64,
}

impl From<ThresholdRecord> for ThresholdItem {
    fn from(record: ThresholdRecord) -> Self {
        Self {
            city: record.city,
            region: record.region,
            galamsay_sites: record.site_count,
            threshold: record.threshold,
        }
    }
}

/// Full run: summary, every cleaned record and the exceeding subset.
#[derive(Debug, Serialize)]
pub struct RunDetailResponse {
    #[serde(flatten)]
    pub summary: RunSummaryResponse,
    pub city_data: Vec<CityItem>,
    pub cities_exceeding_threshold: Vec<ThresholdItem>,
}

impl From<AnalysisRun> for RunDetailResponse {
    fn from(run: AnalysisRun) -> Self {
        let summary = run.summary().into();
        let cities_exceeding_threshold = run
            .threshold_records(EXCEEDING_THRESHOLD)
            .into_iter()
            .map(ThresholdItem::from)
            .collect();

        Self {
            summary,
            city_data: run.result.records.into_iter().map(CityItem::from).collect(),
            cities_exceeding_threshold,
        }
    }
}
