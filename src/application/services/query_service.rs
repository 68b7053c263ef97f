//! Read-only queries over stored analysis runs.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::domain::aggregator::{EXCEEDING_THRESHOLD, rollup_region};
use crate::domain::entities::{AnalysisRun, CleanRecord, RegionRollup, RunSummary, ThresholdRecord};
use crate::domain::repositories::RunRepository;
use crate::error::AppError;

/// A value resolved against one specific run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunMetric<T> {
    pub run_id: i64,
    pub created_at: DateTime<Utc>,
    pub value: T,
}

impl<T> RunMetric<T> {
    fn of(summary: &RunSummary, value: T) -> Self {
        Self {
            run_id: summary.id,
            created_at: summary.created_at,
            value,
        }
    }
}

/// Exceeding-threshold records of one run after optional re-filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct ExceedingCities {
    /// Threshold the items actually satisfy.
    pub threshold: i64,
    pub items: Vec<ThresholdRecord>,
}

/// Query façade used by the HTTP handlers and the admin CLI.
///
/// Every accessor takes an optional run id; `None` resolves to the most
/// recently created run. A missing run, city or region is reported as
/// [`AppError::NotFound`].
pub struct QueryService<R: RunRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: RunRepository + ?Sized> QueryService<R> {
    /// Creates a new query service.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Lists run summaries, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the requested page is empty.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn list_runs(&self, limit: i64, offset: i64) -> Result<Vec<RunSummary>, AppError> {
        let runs = self.repository.list_recent(limit, offset).await?;

        if runs.is_empty() {
            return Err(AppError::not_found(
                "No analysis runs found",
                json!({ "limit": limit, "offset": offset }),
            ));
        }

        Ok(runs)
    }

    /// Full detail of one run.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the run does not exist.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn get_run(&self, run_id: Option<i64>) -> Result<AnalysisRun, AppError> {
        let run = match run_id {
            Some(id) => self.repository.find_by_id(id).await?,
            None => self.repository.find_latest().await?,
        };

        run.ok_or_else(|| missing_run(run_id))
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the run does not exist.
    pub async fn total_sites(&self, run_id: Option<i64>) -> Result<RunMetric<i64>, AppError> {
        let summary = self.resolve(run_id).await?;
        Ok(RunMetric::of(&summary, summary.total_sites))
    }

    /// Region with the highest total and that total.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the run does not exist.
    pub async fn top_region(
        &self,
        run_id: Option<i64>,
    ) -> Result<RunMetric<(String, i64)>, AppError> {
        let summary = self.resolve(run_id).await?;
        let value = (summary.top_region.clone(), summary.top_region_total);
        Ok(RunMetric::of(&summary, value))
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the run does not exist.
    pub async fn average_per_region(&self, run_id: Option<i64>) -> Result<RunMetric<f64>, AppError> {
        let summary = self.resolve(run_id).await?;
        Ok(RunMetric::of(&summary, summary.average_per_region))
    }

    /// Stored exceeding-threshold records, optionally narrowed to counts
    /// strictly above `threshold`.
    ///
    /// Only the stored subset is filtered, so a threshold at or below
    /// [`EXCEEDING_THRESHOLD`] returns the stored records unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the run does not exist.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn exceeding_threshold(
        &self,
        run_id: Option<i64>,
        threshold: Option<i64>,
    ) -> Result<RunMetric<ExceedingCities>, AppError> {
        let summary = self.resolve(run_id).await?;
        let mut items = self.repository.exceeding_records(summary.id).await?;

        let effective = match threshold {
            Some(t) if t > EXCEEDING_THRESHOLD => {
                items.retain(|r| r.site_count > t);
                t
            }
            _ => EXCEEDING_THRESHOLD,
        };

        Ok(RunMetric::of(
            &summary,
            ExceedingCities {
                threshold: effective,
                items,
            },
        ))
    }

    /// Looks up one city by name, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the run does not exist or has no
    /// such city.
    pub async fn city(
        &self,
        run_id: Option<i64>,
        name: &str,
    ) -> Result<RunMetric<CleanRecord>, AppError> {
        let summary = self.resolve(run_id).await?;

        let record = self
            .repository
            .find_city(summary.id, name)
            .await?
            .ok_or_else(|| {
                AppError::not_found(
                    format!("City '{}' not found in analysis", name),
                    json!({ "city": name, "analysis_id": summary.id }),
                )
            })?;

        Ok(RunMetric::of(&summary, record))
    }

    /// Rolls up every city of one region, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the run does not exist or has no
    /// city in that region.
    pub async fn region(
        &self,
        run_id: Option<i64>,
        name: &str,
    ) -> Result<RunMetric<RegionRollup>, AppError> {
        let summary = self.resolve(run_id).await?;
        let records = self.repository.find_region_records(summary.id, name).await?;

        let rollup = rollup_region(name, records)
            .map_err(|e| {
                AppError::internal(
                    e.to_string(),
                    json!({ "region": name, "analysis_id": summary.id }),
                )
            })?
            .ok_or_else(|| {
                AppError::not_found(
                    format!("Region '{}' not found in analysis", name),
                    json!({ "region": name, "analysis_id": summary.id }),
                )
            })?;

        Ok(RunMetric::of(&summary, rollup))
    }

    /// Number of stored runs. Any error means the store is unreachable.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn health(&self) -> Result<i64, AppError> {
        self.repository.count().await
    }

    async fn resolve(&self, run_id: Option<i64>) -> Result<RunSummary, AppError> {
        let summary = match run_id {
            Some(id) => self.repository.find_summary(id).await?,
            None => self.repository.find_latest_summary().await?,
        };

        summary.ok_or_else(|| missing_run(run_id))
    }
}

fn missing_run(run_id: Option<i64>) -> AppError {
    match run_id {
        Some(id) => AppError::not_found(
            format!("Analysis run with ID {} not found", id),
            json!({ "analysis_id": id }),
        ),
        None => AppError::not_found("No analysis runs found", json!({})),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockRunRepository;
    use mockall::predicate::eq;

    fn summary(id: i64) -> RunSummary {
        RunSummary {
            id,
            created_at: Utc::now(),
            total_sites: 85,
            top_region: "Ashanti".to_string(),
            top_region_total: 35,
            average_per_region: 17.0,
            status: "success".to_string(),
        }
    }

    fn threshold_record(city: &str, region: &str, sites: i64) -> ThresholdRecord {
        ThresholdRecord {
            city: city.to_string(),
            region: region.to_string(),
            site_count: sites,
            threshold: EXCEEDING_THRESHOLD,
        }
    }

    fn service(mock: MockRunRepository) -> QueryService<MockRunRepository> {
        QueryService::new(Arc::new(mock))
    }

    #[tokio::test]
    async fn test_list_runs_empty_is_not_found() {
        let mut mock = MockRunRepository::new();
        mock.expect_list_recent()
            .with(eq(10), eq(0))
            .times(1)
            .returning(|_, _| Ok(vec![]));

        let err = service(mock).list_runs(10, 0).await.unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "No analysis runs found");
    }

    #[tokio::test]
    async fn test_total_sites_resolves_latest() {
        let mut mock = MockRunRepository::new();
        mock.expect_find_latest_summary()
            .times(1)
            .returning(|| Ok(Some(summary(3))));
        mock.expect_find_summary().never();

        let metric = service(mock).total_sites(None).await.unwrap();

        assert_eq!(metric.run_id, 3);
        assert_eq!(metric.value, 85);
    }

    #[tokio::test]
    async fn test_explicit_missing_run_is_not_found() {
        let mut mock = MockRunRepository::new();
        mock.expect_find_summary()
            .with(eq(7))
            .times(1)
            .returning(|_| Ok(None));

        let err = service(mock).top_region(Some(7)).await.unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Analysis run with ID 7 not found");
    }

    #[tokio::test]
    async fn test_no_runs_at_all_is_not_found() {
        let mut mock = MockRunRepository::new();
        mock.expect_find_latest_summary().returning(|| Ok(None));

        let err = service(mock).average_per_region(None).await.unwrap_err();

        assert_eq!(err.to_string(), "No analysis runs found");
    }

    #[tokio::test]
    async fn test_get_run_by_id_missing() {
        let mut mock = MockRunRepository::new();
        mock.expect_find_by_id().with(eq(42)).returning(|_| Ok(None));

        let err = service(mock).get_run(Some(42)).await.unwrap_err();

        assert_eq!(err.to_string(), "Analysis run with ID 42 not found");
    }

    #[tokio::test]
    async fn test_exceeding_threshold_refilters_stored_subset() {
        let mut mock = MockRunRepository::new();
        mock.expect_find_latest_summary()
            .returning(|| Ok(Some(summary(1))));
        mock.expect_exceeding_records().with(eq(1)).returning(|_| {
            Ok(vec![
                threshold_record("Kumasi", "Ashanti", 25),
                threshold_record("Accra", "Greater Accra", 20),
                threshold_record("Takoradi", "Western", 18),
            ])
        });

        let metric = service(mock).exceeding_threshold(None, Some(19)).await.unwrap();

        assert_eq!(metric.value.threshold, 19);
        let cities: Vec<&str> = metric.value.items.iter().map(|r| r.city.as_str()).collect();
        assert_eq!(cities, ["Kumasi", "Accra"]);
    }

    #[tokio::test]
    async fn test_low_threshold_leaves_stored_subset() {
        let mut mock = MockRunRepository::new();
        mock.expect_find_latest_summary()
            .returning(|| Ok(Some(summary(1))));
        mock.expect_exceeding_records()
            .returning(|_| Ok(vec![threshold_record("Kumasi", "Ashanti", 25)]));

        let metric = service(mock).exceeding_threshold(None, Some(2)).await.unwrap();

        assert_eq!(metric.value.threshold, EXCEEDING_THRESHOLD);
        assert_eq!(metric.value.items.len(), 1);
    }

    #[tokio::test]
    async fn test_city_not_found_message() {
        let mut mock = MockRunRepository::new();
        mock.expect_find_latest_summary()
            .returning(|| Ok(Some(summary(1))));
        mock.expect_find_city()
            .times(1)
            .returning(|_, _| Ok(None));

        let err = service(mock).city(None, "Foo").await.unwrap_err();

        assert_eq!(err.to_string(), "City 'Foo' not found in analysis");
    }

    #[tokio::test]
    async fn test_region_rollup() {
        let mut mock = MockRunRepository::new();
        mock.expect_find_summary()
            .with(eq(2))
            .returning(|_| Ok(Some(summary(2))));
        mock.expect_find_region_records().returning(|_, _| {
            Ok(vec![
                CleanRecord::new("Obuasi", "Ashanti", 10),
                CleanRecord::new("Kumasi", "Ashanti", 25),
            ])
        });

        let metric = service(mock).region(Some(2), "ashanti").await.unwrap();

        assert_eq!(metric.run_id, 2);
        assert_eq!(metric.value.region, "ashanti");
        assert_eq!(metric.value.total_sites, 35);
        assert_eq!(metric.value.number_of_cities, 2);
        assert_eq!(metric.value.average_per_city, 17.5);
        assert_eq!(metric.value.cities[0].city, "Kumasi");
    }

    #[tokio::test]
    async fn test_region_not_found() {
        let mut mock = MockRunRepository::new();
        mock.expect_find_latest_summary()
            .returning(|| Ok(Some(summary(1))));
        mock.expect_find_region_records()
            .returning(|_, _| Ok(vec![]));

        let err = service(mock).region(None, "Volta").await.unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Region 'Volta' not found in analysis");
    }

    #[tokio::test]
    async fn test_region_total_overflow_is_internal() {
        let mut mock = MockRunRepository::new();
        mock.expect_find_latest_summary()
            .returning(|| Ok(Some(summary(1))));
        mock.expect_find_region_records().returning(|_, _| {
            Ok(vec![
                CleanRecord::new("Kumasi", "Ashanti", i64::MAX),
                CleanRecord::new("Obuasi", "ashanti", 1),
            ])
        });

        let err = service(mock).region(None, "ashanti").await.unwrap_err();

        assert!(matches!(err, AppError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_health_propagates_store_error() {
        let mut mock = MockRunRepository::new();
        mock.expect_count()
            .returning(|| Err(AppError::internal("Database error", json!({}))));

        assert!(service(mock).health().await.is_err());
    }
}
