//! The analysis pipeline: load, clean, aggregate, persist.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use crate::domain::aggregator::{AggregateError, aggregate};
use crate::domain::entities::{AnalysisResult, AnalysisRun, RawRecord};
use crate::domain::repositories::RunRepository;
use crate::domain::validator::{CleanedBatch, Diagnostic, clean_records};
use crate::error::PipelineError;
use crate::infrastructure::csv_source;

/// Counts describing how much of the input survived cleaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QualityReport {
    pub total_rows: usize,
    pub valid: usize,
    pub rejected: usize,
    pub warnings: usize,
}

/// Output of the pure part of the pipeline, ready to be persisted.
#[derive(Debug, Clone)]
pub struct PreparedAnalysis {
    pub batch: CleanedBatch,
    pub result: AnalysisResult,
    pub report: QualityReport,
}

impl PreparedAnalysis {
    /// First `limit` rejections and warnings in input order.
    pub fn samples(&self, limit: usize) -> &[Diagnostic] {
        self.batch.diagnostics.samples(limit)
    }
}

/// Runs the analysis pipeline against a [`RunRepository`].
///
/// [`PipelineService::prepare`] and [`PipelineService::prepare_file`] never
/// touch storage, so a dry run needs no database.
pub struct PipelineService<R: RunRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: RunRepository + ?Sized> PipelineService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Reads `path` and prepares its records.
    ///
    /// # Errors
    ///
    /// Input errors from [`csv_source::read_raw_records`] and
    /// [`PipelineError::EmptyResult`] from [`Self::prepare`].
    pub fn prepare_file(&self, path: &Path) -> Result<PreparedAnalysis, PipelineError> {
        let raw = csv_source::read_raw_records(path)?;

        tracing::info!(path = %path.display(), rows = raw.len(), "Input loaded");

        self.prepare(raw)
    }

    /// Cleans and aggregates raw records.
    ///
    /// Every rejection and warning is logged; the totals are logged once the
    /// full pass is done.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::EmptyResult`] if no record survives cleaning
    /// and [`PipelineError::Overflow`] if the site counts cannot be summed.
    pub fn prepare(&self, raw: Vec<RawRecord>) -> Result<PreparedAnalysis, PipelineError> {
        let total_rows = raw.len();
        let batch = clean_records(raw);

        for diagnostic in batch.diagnostics.entries() {
            match diagnostic {
                Diagnostic::Rejected(r) => {
                    tracing::warn!(line = r.raw_input.line, kind = %r.kind, "{}", r.message)
                }
                Diagnostic::Warning(w) => tracing::warn!(line = w.line, "{}", w.message),
            }
        }

        let report = QualityReport {
            total_rows,
            valid: batch.records.len(),
            rejected: batch.diagnostics.rejected_count(),
            warnings: batch.diagnostics.warning_count(),
        };

        metrics::counter!("galamsay_records_accepted_total").increment(report.valid as u64);
        metrics::counter!("galamsay_records_rejected_total").increment(report.rejected as u64);
        metrics::counter!("galamsay_outlier_warnings_total").increment(report.warnings as u64);

        tracing::info!(
            total = report.total_rows,
            valid = report.valid,
            rejected = report.rejected,
            warnings = report.warnings,
            "Records cleaned"
        );

        let result = aggregate(&batch.records).map_err(|e| match e {
            AggregateError::Empty => PipelineError::EmptyResult {
                rejected: report.rejected,
            },
            AggregateError::Overflow => PipelineError::Overflow,
        })?;

        tracing::info!(
            total_sites = result.total_sites,
            regions = result.region_totals.len(),
            top_region = %result.top_region.region,
            "Aggregation complete"
        );

        Ok(PreparedAnalysis {
            batch,
            result,
            report,
        })
    }

    /// Stores a prepared analysis as a new run.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Persistence`] if the write fails; nothing is
    /// stored in that case.
    pub async fn persist(&self, prepared: &PreparedAnalysis) -> Result<AnalysisRun, PipelineError> {
        let run = self
            .repository
            .save(&prepared.result)
            .await
            .map_err(PipelineError::Persistence)?;

        metrics::counter!("galamsay_runs_saved_total").increment(1);

        Ok(run)
    }

    /// Full pipeline: read, clean, aggregate and store.
    ///
    /// # Errors
    ///
    /// Any [`PipelineError`]; a failure at one stage skips every later stage.
    pub async fn run(&self, path: &Path) -> Result<(AnalysisRun, PreparedAnalysis), PipelineError> {
        let prepared = self.prepare_file(path)?;
        let run = self.persist(&prepared).await?;

        tracing::info!(run_id = run.id, "Analysis run completed");

        Ok((run, prepared))
    }
}
