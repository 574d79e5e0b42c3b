//! jobdeck CLI - exercises the interaction pipeline against a local store
//!
//! Composition root: wires the pool, migrations and DI, then runs one deck
//! operation per invocation. The deck itself is persistent (QUEUED rows), so
//! repeated invocations behave like one ongoing session.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use tabled::{Table, Tabled};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use jobdeck_core::application::{JobDeck, JobQueryService, MaintenanceRunner};
use jobdeck_core::domain::{Job, JobFilters, UserProfile};
use jobdeck_core::port::id_provider::UuidProvider;
use jobdeck_core::port::time_provider::SystemTimeProvider;
use jobdeck_core::port::{JobCatalog, MaintenanceConfig};
use jobdeck_infra_sqlite::{
    create_pool, run_migrations, SqliteDeckMaintenance, SqliteInteractionStore, SqliteJobCatalog,
};

const DEFAULT_DB_PATH: &str = "jobdeck.db";

#[derive(Parser)]
#[command(name = "jobdeck")]
#[command(about = "Swipe-to-apply job deck over a local store", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the SQLite database
    #[arg(long, env = "JOBDECK_DB_PATH", default_value = DEFAULT_DB_PATH)]
    db: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Import postings from a JSON file (ingestion side)
    Import {
        /// JSON file containing an array of jobs
        file: PathBuf,
    },

    /// Show the current deck for a user
    Deck {
        #[arg(short, long)]
        user: String,
    },

    /// Pull recommended jobs into an empty queue
    Pull {
        #[arg(short, long)]
        user: String,

        /// Optional profile JSON (target countries, location)
        #[arg(long)]
        profile: Option<PathBuf>,
    },

    /// Swipe right: apply to a job in the deck
    Apply {
        #[arg(short, long)]
        user: String,
        job_id: String,
    },

    /// Swipe left: pass on a job in the deck
    Pass {
        #[arg(short, long)]
        user: String,
        job_id: String,
    },

    /// Clear the queue and refill it under the given filters
    Refresh {
        #[arg(short, long)]
        user: String,

        #[arg(long)]
        location: Option<String>,

        #[arg(long)]
        industry: Option<String>,

        #[arg(long)]
        remote: Option<bool>,
    },

    /// List jobs the user has applied to
    Applied {
        #[arg(short, long)]
        user: String,
    },

    /// List jobs the user has passed on
    Passed {
        #[arg(short, long)]
        user: String,
    },

    /// Search the catalog
    Search {
        term: String,

        #[arg(long)]
        location: Option<String>,

        #[arg(long)]
        industry: Option<String>,

        #[arg(long)]
        remote: Option<bool>,

        #[arg(short, long, default_value = "20")]
        limit: i64,

        #[arg(short, long, default_value = "0")]
        offset: i64,
    },

    /// List distinct facet values for filter UIs
    Facets,

    /// Run store maintenance (expiry sweep, GC, VACUUM)
    Maintenance {
        /// Retention for PASSED/EXPIRED rows, in days
        #[arg(long, default_value = "30")]
        retention_days: i64,
    },
}

#[derive(Tabled)]
struct JobLine {
    id: String,
    title: String,
    employer: String,
    location: String,
    posted: String,
}

impl JobLine {
    fn from_job(job: &Job) -> Self {
        let posted = chrono::DateTime::from_timestamp_millis(job.posted_at)
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        Self {
            id: job.id.clone(),
            title: job.title.clone(),
            employer: job.employer.clone(),
            location: if job.remote {
                format!("{} (remote)", job.location)
            } else {
                job.location.clone()
            },
            posted,
        }
    }
}

fn init_logging() {
    let log_format = std::env::var("JOBDECK_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("jobdeck=info"))
        .expect("Failed to create env filter");

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .init();
        }
    }
}

fn print_jobs(jobs: &[&Job]) {
    if jobs.is_empty() {
        println!("{}", "(no jobs)".dimmed());
        return;
    }
    let lines: Vec<JobLine> = jobs.iter().map(|j| JobLine::from_job(j)).collect();
    println!("{}", Table::new(lines));
}

fn report_deck(deck: &JobDeck) {
    let state = deck.state();
    if let Some(err) = &state.error {
        eprintln!("{} {}", "error:".red().bold(), err);
    }
    print_jobs(&state.current_jobs());
    if state.has_more {
        println!("{}", "more jobs available".dimmed());
    }
}

fn load_profile(user: &str, path: Option<&PathBuf>) -> Result<UserProfile> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read profile {}", path.display()))?;
            serde_json::from_str(&raw).context("Invalid profile JSON")
        }
        None => Ok(UserProfile::new(user)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();

    let pool = create_pool(&cli.db)
        .await
        .map_err(|e| anyhow::anyhow!("DB pool creation failed: {}", e))?;
    run_migrations(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;

    // DI wiring
    let time_provider = Arc::new(SystemTimeProvider);
    let id_provider = Arc::new(UuidProvider);
    let store = Arc::new(SqliteInteractionStore::new(
        pool.clone(),
        time_provider.clone(),
        id_provider,
    ));
    let catalog = Arc::new(SqliteJobCatalog::new(pool.clone(), time_provider.clone()));

    match cli.command {
        Commands::Import { file } => {
            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let jobs: Vec<Job> = serde_json::from_str(&raw).context("Invalid jobs JSON")?;

            let mut imported = 0usize;
            for job in &jobs {
                match catalog.insert_job(job).await {
                    Ok(()) => imported += 1,
                    Err(e) => eprintln!("{} {}: {}", "skipped".yellow(), job.id, e),
                }
            }
            println!("{} {} postings", "imported".green().bold(), imported);
        }

        Commands::Deck { user } => {
            let mut deck = JobDeck::new(store, &user);
            deck.fetch_queued_jobs().await;
            report_deck(&deck);
        }

        Commands::Pull { user, profile } => {
            let profile = load_profile(&user, profile.as_ref())?;
            let mut deck = JobDeck::new(store, &user).with_profile(profile);
            deck.fetch_recommended_jobs().await;
            report_deck(&deck);
        }

        Commands::Apply { user, job_id } => {
            let mut deck = JobDeck::new(store, &user);
            deck.fetch_queued_jobs().await;
            deck.mark_applied(&job_id).await;
            match deck.state().error.as_deref() {
                Some(err) => eprintln!("{} {}", "error:".red().bold(), err),
                None => println!("{} {}", "applied".green().bold(), job_id),
            }
        }

        Commands::Pass { user, job_id } => {
            let mut deck = JobDeck::new(store, &user);
            deck.fetch_queued_jobs().await;
            deck.mark_passed(&job_id).await;
            match deck.state().error.as_deref() {
                Some(err) => eprintln!("{} {}", "error:".red().bold(), err),
                None => println!("{} {}", "passed".yellow().bold(), job_id),
            }
        }

        Commands::Refresh {
            user,
            location,
            industry,
            remote,
        } => {
            let mut deck = JobDeck::new(store, &user);
            deck.set_filters(JobFilters {
                location,
                industry,
                remote,
                ..JobFilters::default()
            });
            deck.refresh_queue().await;
            report_deck(&deck);
        }

        Commands::Applied { user } => {
            let mut deck = JobDeck::new(store, &user);
            let jobs = deck.applied_jobs().await;
            print_jobs(&jobs.iter().collect::<Vec<_>>());
        }

        Commands::Passed { user } => {
            let mut deck = JobDeck::new(store, &user);
            let jobs = deck.passed_jobs().await;
            print_jobs(&jobs.iter().collect::<Vec<_>>());
        }

        Commands::Search {
            term,
            location,
            industry,
            remote,
            limit,
            offset,
        } => {
            let service = JobQueryService::new(catalog);
            let filters = JobFilters {
                location,
                industry,
                remote,
                ..JobFilters::default()
            };
            let page = service
                .search_jobs(&term, filters, Some(limit), Some(offset))
                .await?;
            print_jobs(&page.jobs.iter().collect::<Vec<_>>());
            println!(
                "{} of {} total{}",
                page.jobs.len(),
                page.total_count,
                if page.has_more { ", more available" } else { "" }
            );
        }

        Commands::Facets => {
            let service = JobQueryService::new(catalog);
            let options = service.filter_options().await?;
            println!("{} {:?}", "industries:".bold(), options.industries);
            println!("{} {:?}", "locations:".bold(), options.locations);
            println!("{} {:?}", "employment:".bold(), options.employment_types);
            println!("{} {:?}", "experience:".bold(), options.experiences);
            println!("{} {:?}", "education:".bold(), options.educations);
        }

        Commands::Maintenance { retention_days } => {
            let maintenance = Arc::new(SqliteDeckMaintenance::new(
                pool.clone(),
                time_provider.clone(),
            ));
            let config = MaintenanceConfig {
                interaction_retention_days: retention_days,
                ..MaintenanceConfig::default()
            };
            let runner = MaintenanceRunner::new(maintenance, config);
            let stats = runner.run_now().await?;
            println!(
                "db {:.1} MB, {} jobs, {} interactions ({} expired)",
                stats.db_size_mb,
                stats.job_count,
                stats.interaction_count,
                stats.expired_interaction_count
            );
        }
    }

    Ok(())
}
