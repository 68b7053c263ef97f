//! Domain layer containing entities and the analysis rules.
//!
//! # Architecture
//!
//! - [`entities`] - Raw and cleaned records, results and runs
//! - [`validator`] - Per-record cleaning rules
//! - [`aggregator`] - Whole-set regional statistics
//! - [`repositories`] - Storage trait definitions
//!
//! # Pipeline Flow
//!
//! 1. Raw rows are read by [`crate::infrastructure::csv_source`]
//! 2. [`validator::clean_records`] keeps valid rows and logs the rest
//! 3. [`aggregator::aggregate`] computes the [`entities::AnalysisResult`]
//! 4. The result is stored via [`repositories::RunRepository::save`]
//!
//! The domain layer has no dependency on HTTP or SQL.

pub mod aggregator;
pub mod entities;
pub mod repositories;
pub mod validator;
