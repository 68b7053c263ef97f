//! Operator CLI for galamsay-analysis.
//!
//! Runs the analysis pipeline and inspects stored runs without going through
//! the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Analyze a CSV file and store the run
//! cargo run --bin admin -- analyze --csv data/galamsay_data.csv
//!
//! # Preview the result without a database
//! cargo run --bin admin -- analyze --dry-run
//!
//! # Stored runs
//! cargo run --bin admin -- runs list --limit 5
//! cargo run --bin admin -- runs show 3
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (or `DB_*`): PostgreSQL connection, not needed for `--dry-run`
//! - `CSV_PATH`: default input file for `analyze`

use galamsay_analysis::application::services::{PipelineService, PreparedAnalysis, QueryService};
use galamsay_analysis::config::{self, Config};
use galamsay_analysis::domain::aggregator::EXCEEDING_THRESHOLD;
use galamsay_analysis::domain::repositories::RunRepository;
use galamsay_analysis::infrastructure::persistence::{
    self, InMemoryRunRepository, MIGRATOR, PgRunRepository,
};
use galamsay_analysis::logging;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;

/// CLI tool for galamsay-analysis.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Load, clean, aggregate and store one CSV file
    Analyze {
        /// Input file (defaults to CSV_PATH, then galamsay_data.csv)
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Print the result without storing it
        #[arg(long)]
        dry_run: bool,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,

        /// Number of rejections and warnings to print
        #[arg(long, default_value_t = 10)]
        samples: usize,
    },

    /// Inspect stored runs
    Runs {
        #[command(subcommand)]
        action: RunsAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum RunsAction {
    /// List stored runs, newest first
    List {
        #[arg(long, default_value_t = 10)]
        limit: i64,

        #[arg(long, default_value_t = 0)]
        offset: i64,
    },

    /// Show one run (latest when ID is omitted)
    Show { id: Option<i64> },
}

#[derive(Subcommand)]
enum DbAction {
    /// Check database connection and count stored runs
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    logging::init("warn", &config::log_format_from_env());

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            csv,
            dry_run,
            yes,
            samples,
        } => {
            let path = csv.unwrap_or_else(config::csv_path_from_env);
            analyze(path, dry_run, yes, samples).await?
        }
        Commands::Runs { action } => {
            let repo = connect_repository().await?;
            handle_runs_action(action, repo).await?
        }
        Commands::Db { action } => handle_db_action(action).await?,
    }

    Ok(())
}

/// Connects to PostgreSQL and applies pending migrations.
async fn connect_repository() -> Result<Arc<PgRunRepository>> {
    let config = config::load_from_env()?;
    let pool = connect(&config).await?;
    Ok(Arc::new(PgRunRepository::new(Arc::new(pool))))
}

async fn connect(config: &Config) -> Result<sqlx::PgPool> {
    let pool = persistence::connect(config)
        .await
        .context("Failed to connect to database")?;

    MIGRATOR
        .run(&pool)
        .await
        .context("Failed to apply migrations")?;

    Ok(pool)
}

/// Runs the pipeline over `path`.
///
/// # Flow
///
/// 1. Read, clean and aggregate the file
/// 2. Print the result and the data-quality report
/// 3. Stop here on `--dry-run`
/// 4. Confirm (unless `--yes` or stdin is not a terminal)
/// 5. Connect and store the run
async fn analyze(path: PathBuf, dry_run: bool, yes: bool, samples: usize) -> Result<()> {
    println!("{}", "🔬 Galamsay Analysis".bright_blue().bold());
    println!("  Input: {}", path.display().to_string().cyan());
    println!();

    // Preparation needs no database.
    let prepared = PipelineService::new(Arc::new(InMemoryRunRepository::new()))
        .prepare_file(&path)?;
    print_prepared(&prepared, samples);

    if dry_run {
        println!("{}", "ℹ️  Dry run, nothing stored".yellow());
        return Ok(());
    }

    if !yes && std::io::stdin().is_terminal() {
        let confirmed = Confirm::new()
            .with_prompt("Store this analysis run?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let pipeline = PipelineService::new(connect_repository().await?);
    let run = pipeline.persist(&prepared).await?;

    println!();
    println!(
        "{} {}",
        "✅ Analysis run stored with ID".green().bold(),
        run.id.to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Prints the aggregated result followed by the data-quality report.
fn print_prepared(prepared: &PreparedAnalysis, samples: usize) {
    let result = &prepared.result;

    println!("{}", "Results:".bright_white().bold());
    println!(
        "  Total galamsay sites:    {}",
        result.total_sites.to_string().bright_green().bold()
    );
    println!(
        "  Region with most sites:  {} ({})",
        result.top_region.region.cyan(),
        result.top_region.total
    );
    println!(
        "  Average per region:      {:.2}",
        result.average_per_region
    );
    println!();

    println!("{}", "Sites per region:".bright_white().bold());
    for (region, total) in &result.region_totals {
        println!("  {:<20} {}", region.cyan(), total);
    }
    println!();

    println!(
        "{}",
        format!("Cities with more than {} sites:", EXCEEDING_THRESHOLD)
            .bright_white()
            .bold()
    );
    if result.exceeding_threshold.is_empty() {
        println!("  {}", "none".bright_black());
    }
    for record in &result.exceeding_threshold {
        println!(
            "  {:<20} {:<20} {}",
            record.city.cyan(),
            record.region,
            record.site_count
        );
    }
    println!();

    let report = &prepared.report;
    println!("{}", "Data quality:".bright_white().bold());
    println!("  Rows read: {}", report.total_rows);
    println!("  Valid:     {}", report.valid.to_string().green());
    println!("  Rejected:  {}", report.rejected.to_string().red());
    println!("  Warnings:  {}", report.warnings.to_string().yellow());

    let shown = prepared.samples(samples);
    if !shown.is_empty() {
        println!();
        for diagnostic in shown {
            let line = diagnostic.to_string();
            if diagnostic.is_warning() {
                println!("  {}", line.yellow());
            } else {
                println!("  {}", line.red());
            }
        }

        let hidden = prepared.batch.diagnostics.len() - shown.len();
        if hidden > 0 {
            println!("  {}", format!("... and {} more", hidden).bright_black());
        }
    }
    println!();
}

/// Dispatches run inspection commands.
async fn handle_runs_action(action: RunsAction, repo: Arc<PgRunRepository>) -> Result<()> {
    let queries = QueryService::new(repo);

    match action {
        RunsAction::List { limit, offset } => {
            println!("{}", "📋 Analysis Runs".bright_blue().bold());
            println!();

            let runs = match queries.list_runs(limit, offset).await {
                Ok(runs) => runs,
                Err(e) if e.is_not_found() => {
                    println!("{}", "  No analysis runs found".yellow());
                    println!();
                    println!(
                        "  Create one with: {} admin analyze",
                        "cargo run --bin".bright_cyan()
                    );
                    return Ok(());
                }
                Err(e) => return Err(e.into()),
            };

            println!(
                "  {:<5} {:<20} {:<8} {:<20} {:<8}",
                "ID".bright_white().bold(),
                "Created".bright_white().bold(),
                "Sites".bright_white().bold(),
                "Top region".bright_white().bold(),
                "Average".bright_white().bold()
            );
            println!("  {}", "─".repeat(65).bright_black());

            for run in &runs {
                println!(
                    "  {:<5} {:<20} {:<8} {:<20} {:.2}",
                    run.id.to_string().bright_black(),
                    run.created_at
                        .format("%Y-%m-%d %H:%M")
                        .to_string()
                        .bright_black(),
                    run.total_sites,
                    run.top_region.cyan(),
                    run.average_per_region
                );
            }

            println!();
            println!("  Shown: {}", runs.len().to_string().bright_white().bold());
            println!();
        }
        RunsAction::Show { id } => {
            let run = queries.get_run(id).await?;

            println!(
                "{} {}",
                "🔎 Analysis Run".bright_blue().bold(),
                run.id.to_string().bright_white().bold()
            );
            println!(
                "  Created: {}",
                run.created_at.format("%Y-%m-%d %H:%M:%S UTC")
            );
            println!("  Status:  {}", run.status.green());
            println!("  Records: {}", run.result.records.len());
            println!();

            let result = &run.result;
            println!(
                "  Total galamsay sites:    {}",
                result.total_sites.to_string().bright_green().bold()
            );
            println!(
                "  Region with most sites:  {} ({})",
                result.top_region.region.cyan(),
                result.top_region.total
            );
            println!(
                "  Average per region:      {:.2}",
                result.average_per_region
            );
            println!();

            for record in &result.exceeding_threshold {
                println!(
                    "  {:<20} {:<20} {}",
                    record.city.cyan(),
                    record.region,
                    record.site_count
                );
            }
            println!();
        }
    }

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            let repo = connect_repository().await?;
            let count = repo.count().await?;

            println!("{}", "✅ Database connection OK".green().bold());
            println!(
                "  Stored analysis runs: {}",
                count.to_string().bright_white().bold()
            );
        }
    }

    Ok(())
}
