//! Aggregation results and the persisted analysis run.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;

use super::record::CleanRecord;

/// Status recorded for every run written by the pipeline.
pub const RUN_STATUS_SUCCESS: &str = "success";

/// The region with the highest site total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopRegion {
    pub region: String,
    pub total: i64,
}

/// Regional statistics computed from one cleaned record set.
///
/// Produced once by [`crate::domain::aggregator::aggregate`] and never
/// modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub total_sites: i64,
    /// Site totals per region in first-encountered order.
    pub region_totals: IndexMap<String, i64>,
    pub top_region: TopRegion,
    pub average_per_region: f64,
    /// Records above the exceeding threshold, highest count first.
    pub exceeding_threshold: Vec<CleanRecord>,
    /// The full cleaned set in input order.
    pub records: Vec<CleanRecord>,
}

/// One persisted execution of the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisRun {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub status: String,
    pub result: AnalysisResult,
}

impl AnalysisRun {
    /// Header of this run without its child collections.
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            id: self.id,
            created_at: self.created_at,
            total_sites: self.result.total_sites,
            top_region: self.result.top_region.region.clone(),
            top_region_total: self.result.top_region.total,
            average_per_region: self.result.average_per_region,
            status: self.status.clone(),
        }
    }

    /// Exceeding-threshold records tagged with the threshold they were
    /// selected with.
    pub fn threshold_records(&self, threshold: i64) -> Vec<ThresholdRecord> {
        self.result
            .exceeding_threshold
            .iter()
            .map(|r| ThresholdRecord::from_record(r, threshold))
            .collect()
    }
}

/// Summary row of a stored run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub total_sites: i64,
    pub top_region: String,
    pub top_region_total: i64,
    pub average_per_region: f64,
    pub status: String,
}

/// A stored exceeding-threshold record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThresholdRecord {
    pub city: String,
    pub region: String,
    pub site_count: i64,
    pub threshold: i64,
}

impl ThresholdRecord {
    pub fn from_record(record: &CleanRecord, threshold: i64) -> Self {
        Self {
            city: record.city.clone(),
            region: record.region.clone(),
            site_count: record.site_count,
            threshold,
        }
    }
}

/// Per-region rollup over the records of one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionRollup {
    pub region: String,
    pub total_sites: i64,
    pub number_of_cities: usize,
    pub average_per_city: f64,
    /// Cities of the region, highest count first.
    pub cities: Vec<CleanRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_run() -> AnalysisRun {
        let kumasi = CleanRecord::new("Kumasi", "Ashanti", 25);
        let tamale = CleanRecord::new("Tamale", "Northern", 7);

        AnalysisRun {
            id: 4,
            created_at: Utc::now(),
            status: RUN_STATUS_SUCCESS.to_string(),
            result: AnalysisResult {
                total_sites: 32,
                region_totals: IndexMap::from([
                    ("Ashanti".to_string(), 25),
                    ("Northern".to_string(), 7),
                ]),
                top_region: TopRegion {
                    region: "Ashanti".to_string(),
                    total: 25,
                },
                average_per_region: 16.0,
                exceeding_threshold: vec![kumasi.clone()],
                records: vec![kumasi, tamale],
            },
        }
    }

    #[test]
    fn test_summary_copies_header_fields() {
        let run = sample_run();
        let summary = run.summary();

        assert_eq!(summary.id, 4);
        assert_eq!(summary.created_at, run.created_at);
        assert_eq!(summary.total_sites, 32);
        assert_eq!(summary.top_region, "Ashanti");
        assert_eq!(summary.top_region_total, 25);
        assert_eq!(summary.average_per_region, 16.0);
        assert_eq!(summary.status, "success");
    }

    #[test]
    fn test_threshold_records_carry_threshold() {
        let records = sample_run().threshold_records(10);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].city, "Kumasi");
        assert_eq!(records[0].site_count, 25);
        assert_eq!(records[0].threshold, 10);
    }
}
