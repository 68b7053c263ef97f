//! Whole-set aggregation over cleaned records.
//!
//! Grouping is keyed on the exact region string: `"Ashanti"` and `"ashanti"`
//! are two regions. Region totals keep first-encountered order, which is also
//! what breaks ties for the top region.

use indexmap::IndexMap;

use crate::domain::entities::{AnalysisResult, CleanRecord, RegionRollup, TopRegion};

/// Records with strictly more sites than this are reported as exceeding.
pub const EXCEEDING_THRESHOLD: i64 = 10;

/// Why a record set cannot be aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AggregateError {
    #[error("no cleaned records to aggregate")]
    Empty,

    #[error("site count total exceeds {}", i64::MAX)]
    Overflow,
}

/// Computes regional statistics for a non-empty record set.
///
/// # Errors
///
/// Returns [`AggregateError::Empty`] when `records` is empty and
/// [`AggregateError::Overflow`] when a total does not fit in `i64`.
pub fn aggregate(records: &[CleanRecord]) -> Result<AnalysisResult, AggregateError> {
    if records.is_empty() {
        return Err(AggregateError::Empty);
    }

    let total_sites = checked_total(records)?;
    let region_totals = region_totals(records)?;
    let top_region = top_region(&region_totals).ok_or(AggregateError::Empty)?;
    let average_per_region = average(total_sites, region_totals.len());
    let exceeding_threshold = exceeding(records, EXCEEDING_THRESHOLD);

    Ok(AnalysisResult {
        total_sites,
        region_totals,
        top_region,
        average_per_region,
        exceeding_threshold,
        records: records.to_vec(),
    })
}

/// Sums site counts per region in first-encountered order.
///
/// # Errors
///
/// Returns [`AggregateError::Overflow`] when a region total does not fit in
/// `i64`.
pub fn region_totals(records: &[CleanRecord]) -> Result<IndexMap<String, i64>, AggregateError> {
    let mut totals: IndexMap<String, i64> = IndexMap::new();

    for record in records {
        let total = totals.entry(record.region.clone()).or_default();
        *total = total
            .checked_add(record.site_count)
            .ok_or(AggregateError::Overflow)?;
    }

    Ok(totals)
}

/// Region with the highest total; the earliest region wins a tie.
pub fn top_region(totals: &IndexMap<String, i64>) -> Option<TopRegion> {
    let mut best: Option<(&String, i64)> = None;

    for (region, &total) in totals {
        match best {
            Some((_, best_total)) if total <= best_total => {}
            _ => best = Some((region, total)),
        }
    }

    best.map(|(region, total)| TopRegion {
        region: region.clone(),
        total,
    })
}

/// Records with more than `threshold` sites, highest first.
///
/// The sort is stable, so equal counts keep their input order.
pub fn exceeding(records: &[CleanRecord], threshold: i64) -> Vec<CleanRecord> {
    let mut selected: Vec<CleanRecord> = records
        .iter()
        .filter(|r| r.site_count > threshold)
        .cloned()
        .collect();

    selected.sort_by(|a, b| b.site_count.cmp(&a.site_count));
    selected
}

/// Rolls up the given records of one region.
///
/// Returns `Ok(None)` when `records` is empty.
///
/// # Errors
///
/// Returns [`AggregateError::Overflow`] when the region total does not fit
/// in `i64`.
pub fn rollup_region(
    region: &str,
    records: Vec<CleanRecord>,
) -> Result<Option<RegionRollup>, AggregateError> {
    if records.is_empty() {
        return Ok(None);
    }

    let total_sites = checked_total(&records)?;
    let number_of_cities = records.len();

    let mut cities = records;
    cities.sort_by(|a, b| b.site_count.cmp(&a.site_count));

    Ok(Some(RegionRollup {
        region: region.to_string(),
        total_sites,
        number_of_cities,
        average_per_city: average(total_sites, number_of_cities),
        cities,
    }))
}

fn checked_total(records: &[CleanRecord]) -> Result<i64, AggregateError> {
    records.iter().try_fold(0_i64, |total, r| {
        total
            .checked_add(r.site_count)
            .ok_or(AggregateError::Overflow)
    })
}

fn average(total: i64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        total as f64 / count as f64
    }
}
