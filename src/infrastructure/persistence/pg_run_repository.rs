//! PostgreSQL implementation of the run repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::aggregator::{EXCEEDING_THRESHOLD, region_totals};
use crate::domain::entities::{
    AnalysisResult, AnalysisRun, CleanRecord, RUN_STATUS_SUCCESS, RunSummary, ThresholdRecord,
    TopRegion,
};
use crate::domain::repositories::RunRepository;
use crate::error::AppError;

const RUN_COLUMNS: &str =
    "id, created_at, total_sites, top_region, top_region_total, average_per_region, status";

/// A row from the `analysis_runs` table.
#[derive(Debug, Clone, sqlx::FromRow)]
struct RunRow {
    id: i64,
    created_at: DateTime<Utc>,
    total_sites: i64,
    top_region: String,
    top_region_total: i64,
    average_per_region: f64,
    status: String,
}

impl From<RunRow> for RunSummary {
    fn from(row: RunRow) -> Self {
        RunSummary {
            id: row.id,
            created_at: row.created_at,
            total_sites: row.total_sites,
            top_region: row.top_region,
            top_region_total: row.top_region_total,
            average_per_region: row.average_per_region,
            status: row.status,
        }
    }
}

/// A row from the `city_data` table.
#[derive(Debug, Clone, sqlx::FromRow)]
struct CityRow {
    city: String,
    region: String,
    galamsay_sites: i64,
}

impl From<CityRow> for CleanRecord {
    fn from(row: CityRow) -> Self {
        CleanRecord::new(row.city, row.region, row.galamsay_sites)
    }
}

/// A row from the `cities_exceeding_threshold` table.
#[derive(Debug, Clone, sqlx::FromRow)]
struct ThresholdRow {
    city: String,
    region: String,
    galamsay_sites: i64,
    threshold: i64,
}

impl From<ThresholdRow> for ThresholdRecord {
    fn from(row: ThresholdRow) -> Self {
        ThresholdRecord {
            city: row.city,
            region: row.region,
            site_count: row.galamsay_sites,
            threshold: row.threshold,
        }
    }
}

/// PostgreSQL repository for analysis runs.
///
/// A run is stored as one `analysis_runs` row plus its `city_data` and
/// `cities_exceeding_threshold` children. Child rows carry their position so
/// input order and sort order survive the round trip.
pub struct PgRunRepository {
    pool: Arc<PgPool>,
}

impl PgRunRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    async fn fetch_run_row(&self, id: Option<i64>) -> Result<Option<RunRow>, AppError> {
        let row = match id {
            Some(id) => {
                sqlx::query_as::<_, RunRow>(&format!(
                    "SELECT {RUN_COLUMNS} FROM analysis_runs WHERE id = $1"
                ))
                .bind(id)
                .fetch_optional(self.pool.as_ref())
                .await?
            }
            None => {
                sqlx::query_as::<_, RunRow>(&format!(
                    "SELECT {RUN_COLUMNS} FROM analysis_runs \
                     ORDER BY created_at DESC, id DESC LIMIT 1"
                ))
                .fetch_optional(self.pool.as_ref())
                .await?
            }
        };

        Ok(row)
    }

    async fn city_records(&self, run_id: i64) -> Result<Vec<CleanRecord>, AppError> {
        let rows = sqlx::query_as::<_, CityRow>(
            "SELECT city, region, galamsay_sites FROM city_data \
             WHERE analysis_run_id = $1 ORDER BY position",
        )
        .bind(run_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(CleanRecord::from).collect())
    }

    /// Rebuilds the full run from its summary row and child rows.
    async fn load_run(&self, row: RunRow) -> Result<AnalysisRun, AppError> {
        let records = self.city_records(row.id).await?;
        let exceeding = self.exceeding_records(row.id).await?;

        let result = AnalysisResult {
            total_sites: row.total_sites,
            region_totals: region_totals(&records),
            top_region: TopRegion {
                region: row.top_region,
                total: row.top_region_total,
            },
            average_per_region: row.average_per_region,
            exceeding_threshold: exceeding
                .into_iter()
                .map(|r| CleanRecord::new(r.city, r.region, r.site_count))
                .collect(),
            records,
        };

        Ok(AnalysisRun {
            id: row.id,
            created_at: row.created_at,
            status: row.status,
            result,
        })
    }
}

#[async_trait]
impl RunRepository for PgRunRepository {
    async fn save(&self, result: &AnalysisResult) -> Result<AnalysisRun, AppError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, RunRow>(&format!(
            "INSERT INTO analysis_runs \
                 (total_sites, top_region, top_region_total, average_per_region, status) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {RUN_COLUMNS}"
        ))
        .bind(result.total_sites)
        .bind(&result.top_region.region)
        .bind(result.top_region.total)
        .bind(result.average_per_region)
        .bind(RUN_STATUS_SUCCESS)
        .fetch_one(&mut *tx)
        .await?;

        for (position, record) in result.records.iter().enumerate() {
            sqlx::query(
                "INSERT INTO city_data \
                     (analysis_run_id, position, city, region, galamsay_sites) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(row.id)
            .bind(position as i64)
            .bind(&record.city)
            .bind(&record.region)
            .bind(record.site_count)
            .execute(&mut *tx)
            .await?;
        }

        for (position, record) in result.exceeding_threshold.iter().enumerate() {
            sqlx::query(
                "INSERT INTO cities_exceeding_threshold \
                     (analysis_run_id, position, city, region, galamsay_sites, threshold) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(row.id)
            .bind(position as i64)
            .bind(&record.city)
            .bind(&record.region)
            .bind(record.site_count)
            .bind(EXCEEDING_THRESHOLD)
            .execute(&mut *tx)
            .await?;
        }

        // Dropping `tx` on any early return above rolls the whole run back.
        tx.commit().await?;

        tracing::info!(
            run_id = row.id,
            records = result.records.len(),
            exceeding = result.exceeding_threshold.len(),
            "Analysis run saved"
        );

        Ok(AnalysisRun {
            id: row.id,
            created_at: row.created_at,
            status: row.status,
            result: result.clone(),
        })
    }

    async fn find_latest(&self) -> Result<Option<AnalysisRun>, AppError> {
        match self.fetch_run_row(None).await? {
            Some(row) => Ok(Some(self.load_run(row).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<AnalysisRun>, AppError> {
        match self.fetch_run_row(Some(id)).await? {
            Some(row) => Ok(Some(self.load_run(row).await?)),
            None => Ok(None),
        }
    }

    async fn list_recent(&self, limit: i64, offset: i64) -> Result<Vec<RunSummary>, AppError> {
        let rows = sqlx::query_as::<_, RunRow>(&format!(
            "SELECT {RUN_COLUMNS} FROM analysis_runs \
             ORDER BY created_at DESC, id DESC \
             LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(RunSummary::from).collect())
    }

    async fn find_latest_summary(&self) -> Result<Option<RunSummary>, AppError> {
        Ok(self.fetch_run_row(None).await?.map(RunSummary::from))
    }

    async fn find_summary(&self, id: i64) -> Result<Option<RunSummary>, AppError> {
        Ok(self.fetch_run_row(Some(id)).await?.map(RunSummary::from))
    }

    async fn find_city(&self, run_id: i64, city: &str) -> Result<Option<CleanRecord>, AppError> {
        let row = sqlx::query_as::<_, CityRow>(
            "SELECT city, region, galamsay_sites FROM city_data \
             WHERE analysis_run_id = $1 AND lower(city) = lower($2) \
             ORDER BY position LIMIT 1",
        )
        .bind(run_id)
        .bind(city)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(CleanRecord::from))
    }

    async fn find_region_records(
        &self,
        run_id: i64,
        region: &str,
    ) -> Result<Vec<CleanRecord>, AppError> {
        let rows = sqlx::query_as::<_, CityRow>(
            "SELECT city, region, galamsay_sites FROM city_data \
             WHERE analysis_run_id = $1 AND lower(region) = lower($2) \
             ORDER BY position",
        )
        .bind(run_id)
        .bind(region)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(CleanRecord::from).collect())
    }

    async fn exceeding_records(&self, run_id: i64) -> Result<Vec<ThresholdRecord>, AppError> {
        let rows = sqlx::query_as::<_, ThresholdRow>(
            "SELECT city, region, galamsay_sites, threshold FROM cities_exceeding_threshold \
             WHERE analysis_run_id = $1 ORDER BY position",
        )
        .bind(run_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(ThresholdRecord::from).collect())
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM analysis_runs")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
