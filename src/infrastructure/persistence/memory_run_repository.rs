//! Process-local run repository.
//!
//! Mirrors [`super::PgRunRepository`] semantics without a database: useful
//! for dry runs and for exercising the HTTP layer in tests.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::aggregator::EXCEEDING_THRESHOLD;
use crate::domain::entities::{
    AnalysisResult, AnalysisRun, CleanRecord, RUN_STATUS_SUCCESS, RunSummary, ThresholdRecord,
};
use crate::domain::repositories::RunRepository;
use crate::error::AppError;

#[derive(Debug, Default)]
struct Store {
    runs: Vec<AnalysisRun>,
    last_id: i64,
}

impl Store {
    fn latest(&self) -> Option<&AnalysisRun> {
        self.runs.iter().max_by_key(|r| (r.created_at, r.id))
    }

    fn by_id(&self, id: i64) -> Option<&AnalysisRun> {
        self.runs.iter().find(|r| r.id == id)
    }
}

/// In-memory repository backed by a `RwLock`.
#[derive(Debug, Default)]
pub struct InMemoryRunRepository {
    store: RwLock<Store>,
}

impl InMemoryRunRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Store>, AppError> {
        self.store
            .read()
            .map_err(|_| AppError::internal("Run store lock poisoned", json!({})))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Store>, AppError> {
        self.store
            .write()
            .map_err(|_| AppError::internal("Run store lock poisoned", json!({})))
    }
}

fn matches_ignoring_case(stored: &str, wanted: &str) -> bool {
    stored.to_lowercase() == wanted.to_lowercase()
}

#[async_trait]
impl RunRepository for InMemoryRunRepository {
    async fn save(&self, result: &AnalysisResult) -> Result<AnalysisRun, AppError> {
        let mut store = self.write()?;

        store.last_id += 1;
        let run = AnalysisRun {
            id: store.last_id,
            created_at: Utc::now(),
            status: RUN_STATUS_SUCCESS.to_string(),
            result: result.clone(),
        };
        store.runs.push(run.clone());

        tracing::debug!(run_id = run.id, "Analysis run stored in memory");

        Ok(run)
    }

    async fn find_latest(&self) -> Result<Option<AnalysisRun>, AppError> {
        Ok(self.read()?.latest().cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<AnalysisRun>, AppError> {
        Ok(self.read()?.by_id(id).cloned())
    }

    async fn list_recent(&self, limit: i64, offset: i64) -> Result<Vec<RunSummary>, AppError> {
        let store = self.read()?;

        let mut summaries: Vec<RunSummary> = store.runs.iter().map(AnalysisRun::summary).collect();
        summaries.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));

        Ok(summaries
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn find_latest_summary(&self) -> Result<Option<RunSummary>, AppError> {
        Ok(self.read()?.latest().map(AnalysisRun::summary))
    }

    async fn find_summary(&self, id: i64) -> Result<Option<RunSummary>, AppError> {
        Ok(self.read()?.by_id(id).map(AnalysisRun::summary))
    }

    async fn find_city(&self, run_id: i64, city: &str) -> Result<Option<CleanRecord>, AppError> {
        let store = self.read()?;

        Ok(store.by_id(run_id).and_then(|run| {
            run.result
                .records
                .iter()
                .find(|r| matches_ignoring_case(&r.city, city))
                .cloned()
        }))
    }

    async fn find_region_records(
        &self,
        run_id: i64,
        region: &str,
    ) -> Result<Vec<CleanRecord>, AppError> {
        let store = self.read()?;

        Ok(store
            .by_id(run_id)
            .map(|run| {
                run.result
                    .records
                    .iter()
                    .filter(|r| matches_ignoring_case(&r.region, region))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn exceeding_records(&self, run_id: i64) -> Result<Vec<ThresholdRecord>, AppError> {
        let store = self.read()?;

        Ok(store
            .by_id(run_id)
            .map(|run| run.threshold_records(EXCEEDING_THRESHOLD))
            .unwrap_or_default())
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.read()?.runs.len() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregator::aggregate;

    fn result_for(records: &[CleanRecord]) -> AnalysisResult {
        aggregate(records).unwrap()
    }

    fn sample() -> AnalysisResult {
        result_for(&[
            CleanRecord::new("Kumasi", "Ashanti", 25),
            CleanRecord::new("Accra", "Greater Accra", 20),
            CleanRecord::new("Obuasi", "Ashanti", 10),
        ])
    }

    #[tokio::test]
    async fn test_save_assigns_increasing_ids() {
        let repo = InMemoryRunRepository::new();

        let first = repo.save(&sample()).await.unwrap();
        let second = repo.save(&sample()).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(first.status, "success");
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_find_latest_and_by_id() {
        let repo = InMemoryRunRepository::new();
        assert!(repo.find_latest().await.unwrap().is_none());

        repo.save(&sample()).await.unwrap();
        let second = repo
            .save(&result_for(&[CleanRecord::new("Wa", "Upper West", 3)]))
            .await
            .unwrap();

        let latest = repo.find_latest().await.unwrap().unwrap();
        assert_eq!(latest.id, second.id);
        assert_eq!(latest.result.total_sites, 3);

        let first = repo.find_by_id(1).await.unwrap().unwrap();
        assert_eq!(first.result, sample());

        assert!(repo.find_by_id(99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_recent_is_newest_first_and_paginated() {
        let repo = InMemoryRunRepository::new();
        for _ in 0..3 {
            repo.save(&sample()).await.unwrap();
        }

        let ids: Vec<i64> = repo
            .list_recent(10, 0)
            .await
            .unwrap()
            .iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, [3, 2, 1]);

        let page: Vec<i64> = repo
            .list_recent(1, 1)
            .await
            .unwrap()
            .iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(page, [2]);

        assert!(repo.list_recent(10, 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_city_and_region_lookups_ignore_case() {
        let repo = InMemoryRunRepository::new();
        let run = repo.save(&sample()).await.unwrap();

        let city = repo.find_city(run.id, "KUMASI").await.unwrap().unwrap();
        assert_eq!(city, CleanRecord::new("Kumasi", "Ashanti", 25));
        assert!(repo.find_city(run.id, "Tema").await.unwrap().is_none());

        let region = repo.find_region_records(run.id, "ashanti").await.unwrap();
        let cities: Vec<&str> = region.iter().map(|r| r.city.as_str()).collect();
        assert_eq!(cities, ["Kumasi", "Obuasi"]);

        assert!(repo.find_region_records(42, "ashanti").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_exceeding_records_carry_threshold() {
        let repo = InMemoryRunRepository::new();
        let run = repo.save(&sample()).await.unwrap();

        let records = repo.exceeding_records(run.id).await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].city, "Kumasi");
        assert_eq!(records[1].city, "Accra");
        assert!(records.iter().all(|r| r.threshold == EXCEEDING_THRESHOLD));
    }
}
