//! Core domain entities.
//!
//! - [`RawRecord`] - One untyped input row
//! - [`CleanRecord`] - A row that passed every cleaning rule
//! - [`AnalysisResult`] - Regional statistics over a cleaned set
//! - [`AnalysisRun`] - A persisted, immutable snapshot of one result
//!
//! Entities are plain data; the rules that produce them live in
//! [`crate::domain::validator`] and [`crate::domain::aggregator`].

pub mod analysis;
pub mod record;

pub use analysis::{
    AnalysisResult, AnalysisRun, RUN_STATUS_SUCCESS, RegionRollup, RunSummary, ThresholdRecord,
    TopRegion,
};
pub use record::{
    CITY_COLUMN, CleanRecord, REGION_COLUMN, REQUIRED_COLUMNS, RawRecord, SITES_COLUMN,
};
