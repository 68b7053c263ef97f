#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use serde_json::json;
use std::sync::Arc;

use galamsay_analysis::domain::aggregator::aggregate;
use galamsay_analysis::domain::entities::{
    AnalysisResult, AnalysisRun, CleanRecord, RunSummary, ThresholdRecord,
};
use galamsay_analysis::domain::repositories::RunRepository;
use galamsay_analysis::error::AppError;
use galamsay_analysis::infrastructure::persistence::InMemoryRunRepository;
use galamsay_analysis::routes::router;
use galamsay_analysis::state::AppState;

pub const CSV_HEADER: &str = "City,Region,Number_of_Galamsay_Sites";

/// Kumasi..Obuasi reference set: total 85, top Ashanti (35), average 17.0.
pub fn reference_records() -> Vec<CleanRecord> {
    vec![
        CleanRecord::new("Kumasi", "Ashanti", 25),
        CleanRecord::new("Accra", "Greater Accra", 20),
        CleanRecord::new("Takoradi", "Western", 18),
        CleanRecord::new("Tamale", "Northern", 7),
        CleanRecord::new("Bolgatanga", "Upper East", 5),
        CleanRecord::new("Obuasi", "Ashanti", 10),
    ]
}

pub fn reference_csv() -> String {
    let mut csv = format!("{CSV_HEADER}\n");
    for r in reference_records() {
        csv.push_str(&format!("{},{},{}\n", r.city, r.region, r.site_count));
    }
    csv
}

pub fn result_for(records: &[CleanRecord]) -> AnalysisResult {
    aggregate(records).unwrap()
}

pub fn create_test_state() -> (AppState, Arc<InMemoryRunRepository>) {
    let repo = Arc::new(InMemoryRunRepository::new());
    let state = AppState::new(repo.clone());
    (state, repo)
}

pub async fn seed_run(repo: &InMemoryRunRepository, records: &[CleanRecord]) -> AnalysisRun {
    repo.save(&result_for(records)).await.unwrap()
}

pub fn test_server(state: AppState) -> TestServer {
    TestServer::new(router(state)).unwrap()
}

/// Server over an empty in-memory store.
pub fn empty_server() -> TestServer {
    let (state, _repo) = create_test_state();
    test_server(state)
}

/// Server with the reference run stored as run 1.
pub async fn reference_server() -> (TestServer, Arc<InMemoryRunRepository>) {
    let (state, repo) = create_test_state();
    seed_run(&repo, &reference_records()).await;
    (test_server(state), repo)
}

/// Repository whose every call fails, standing in for an unreachable database.
pub struct UnreachableRunRepository;

fn unreachable() -> AppError {
    AppError::internal("Database error", json!({}))
}

#[async_trait]
impl RunRepository for UnreachableRunRepository {
    async fn save(&self, _result: &AnalysisResult) -> Result<AnalysisRun, AppError> {
        Err(unreachable())
    }

    async fn find_latest(&self) -> Result<Option<AnalysisRun>, AppError> {
        Err(unreachable())
    }

    async fn find_by_id(&self, _id: i64) -> Result<Option<AnalysisRun>, AppError> {
        Err(unreachable())
    }

    async fn list_recent(&self, _limit: i64, _offset: i64) -> Result<Vec<RunSummary>, AppError> {
        Err(unreachable())
    }

    async fn find_latest_summary(&self) -> Result<Option<RunSummary>, AppError> {
        Err(unreachable())
    }

    async fn find_summary(&self, _id: i64) -> Result<Option<RunSummary>, AppError> {
        Err(unreachable())
    }

    async fn find_city(&self, _run_id: i64, _city: &str) -> Result<Option<CleanRecord>, AppError> {
        Err(unreachable())
    }

    async fn find_region_records(
        &self,
        _run_id: i64,
        _region: &str,
    ) -> Result<Vec<CleanRecord>, AppError> {
        Err(unreachable())
    }

    async fn exceeding_records(&self, _run_id: i64) -> Result<Vec<ThresholdRecord>, AppError> {
        Err(unreachable())
    }

    async fn count(&self) -> Result<i64, AppError> {
        Err(unreachable())
    }
}
