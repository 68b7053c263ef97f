//! Repository trait for persisted analysis runs.

use crate::domain::entities::{AnalysisResult, AnalysisRun, CleanRecord, RunSummary, ThresholdRecord};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for analysis runs.
///
/// Runs are append-only: a run is written once by [`RunRepository::save`] and
/// never updated afterwards. History is ordered by creation time, newest
/// first.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgRunRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryRunRepository`] - process-local store
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_run.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RunRepository: Send + Sync {
    /// Persists one aggregation result as a new run.
    ///
    /// The summary, every cleaned record and the exceeding-threshold subset
    /// are written atomically: either all of them become visible or none do.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn save(&self, result: &AnalysisResult) -> Result<AnalysisRun, AppError>;

    /// Returns the most recently created run with all of its records.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_latest(&self) -> Result<Option<AnalysisRun>, AppError>;

    /// Returns the run with the given id with all of its records.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<AnalysisRun>, AppError>;

    /// Lists run summaries, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list_recent(&self, limit: i64, offset: i64) -> Result<Vec<RunSummary>, AppError>;

    /// Summary of the most recently created run.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_latest_summary(&self) -> Result<Option<RunSummary>, AppError>;

    /// Summary of the run with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_summary(&self, id: i64) -> Result<Option<RunSummary>, AppError>;

    /// First record of the run whose city matches `city`, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_city(&self, run_id: i64, city: &str) -> Result<Option<CleanRecord>, AppError>;

    /// Records of the run whose region matches `region`, ignoring case, in
    /// input order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_region_records(
        &self,
        run_id: i64,
        region: &str,
    ) -> Result<Vec<CleanRecord>, AppError>;

    /// Stored exceeding-threshold records of the run, highest count first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn exceeding_records(&self, run_id: i64) -> Result<Vec<ThresholdRecord>, AppError>;

    /// Number of stored runs.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count(&self) -> Result<i64, AppError>;
}
