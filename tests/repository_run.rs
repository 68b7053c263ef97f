//! PostgreSQL repository tests.
//!
//! Each test gets a fresh database with migrations applied. Run with
//! `DATABASE_URL` pointing at a server and `cargo test -- --ignored`.

mod common;

use sqlx::PgPool;
use std::sync::Arc;

use galamsay_analysis::domain::aggregator::EXCEEDING_THRESHOLD;
use galamsay_analysis::domain::entities::CleanRecord;
use galamsay_analysis::domain::repositories::RunRepository;
use galamsay_analysis::infrastructure::persistence::PgRunRepository;

fn repo(pool: PgPool) -> PgRunRepository {
    PgRunRepository::new(Arc::new(pool))
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_save_and_read_back(pool: PgPool) {
    let repo = repo(pool);
    let result = common::result_for(&common::reference_records());

    let saved = repo.save(&result).await.unwrap();
    assert_eq!(saved.status, "success");

    let loaded = repo.find_by_id(saved.id).await.unwrap().unwrap();

    assert_eq!(loaded.id, saved.id);
    assert_eq!(loaded.result, result);
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_latest_and_listing_order(pool: PgPool) {
    let repo = repo(pool);

    let first = repo
        .save(&common::result_for(&common::reference_records()))
        .await
        .unwrap();
    let second = repo
        .save(&common::result_for(&[CleanRecord::new("Wa", "Upper West", 4)]))
        .await
        .unwrap();

    let latest = repo.find_latest().await.unwrap().unwrap();
    assert_eq!(latest.id, second.id);

    let ids: Vec<i64> = repo
        .list_recent(10, 0)
        .await
        .unwrap()
        .iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(ids, [second.id, first.id]);

    let summary = repo.find_summary(first.id).await.unwrap().unwrap();
    assert_eq!(summary.total_sites, 85);
    assert_eq!(summary.top_region, "Ashanti");

    assert_eq!(repo.count().await.unwrap(), 2);
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_lookups_ignore_case(pool: PgPool) {
    let repo = repo(pool);
    let run = repo
        .save(&common::result_for(&common::reference_records()))
        .await
        .unwrap();

    let city = repo.find_city(run.id, "tAkOrAdI").await.unwrap().unwrap();
    assert_eq!(city, CleanRecord::new("Takoradi", "Western", 18));

    let region = repo.find_region_records(run.id, "ASHANTI").await.unwrap();
    assert_eq!(region.len(), 2);

    assert!(repo.find_city(run.id, "Foo").await.unwrap().is_none());
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_exceeding_records_keep_order(pool: PgPool) {
    let repo = repo(pool);
    let run = repo
        .save(&common::result_for(&common::reference_records()))
        .await
        .unwrap();

    let records = repo.exceeding_records(run.id).await.unwrap();

    let cities: Vec<&str> = records.iter().map(|r| r.city.as_str()).collect();
    assert_eq!(cities, ["Kumasi", "Accra", "Takoradi"]);
    assert!(records.iter().all(|r| r.threshold == EXCEEDING_THRESHOLD));
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_missing_run(pool: PgPool) {
    let repo = repo(pool);

    assert!(repo.find_latest().await.unwrap().is_none());
    assert!(repo.find_by_id(1).await.unwrap().is_none());
    assert!(repo.list_recent(10, 0).await.unwrap().is_empty());
}
