//! Sync commands for one repository or every active one.
//!
//! Jobs go through the dispatcher so the configured retry policy and the
//! per-repository leases apply to interactive runs too.

use std::sync::Arc;

use clap::Subcommand;
use repomirror::github::GitHubClient;
use repomirror::{
    ApiRateLimiter, Dispatcher, JobOutcome, RepositoryModel, SyncJob, connect_and_migrate, store,
};
use sea_orm::DatabaseConnection;

use crate::commands::repo::parse_full_name;
use crate::config::Config;
use crate::progress::progress_callback;

/// Sync subcommands.
#[derive(Subcommand)]
pub enum SyncAction {
    /// Refresh repository metadata (description, stars, default branch, ...)
    Metadata {
        /// Repository as owner/name
        repository: String,
    },
    /// Mirror issues, their authors and assignees
    Issues {
        /// Repository as owner/name
        repository: String,

        /// Issue state to fetch: all, open or closed
        #[arg(short, long, default_value = "all")]
        state: String,

        /// Only fetch issues updated at or after this time (overrides the checkpoint)
        #[arg(long)]
        since: Option<String>,

        /// Ignore the checkpoint and fetch everything
        #[arg(short, long)]
        full: bool,
    },
    /// Mirror commits and link them to the issues they close
    Commits {
        /// Repository as owner/name
        repository: String,

        /// Only fetch commits at or after this time (overrides the checkpoint)
        #[arg(long)]
        since: Option<String>,

        /// Only fetch commits at or before this time
        #[arg(long)]
        until: Option<String>,

        /// Branch, tag or SHA to list commits from (default branch if omitted)
        #[arg(long)]
        sha: Option<String>,

        /// Ignore the checkpoint and fetch everything
        #[arg(short, long)]
        full: bool,
    },
    /// Sync metadata, issues and commits for every active repository
    All {
        /// Ignore checkpoints and fetch everything
        #[arg(short, long)]
        full: bool,

        /// Jobs to run at once (default from config)
        #[arg(short, long)]
        concurrency: Option<usize>,
    },
}

fn build_dispatcher(
    config: &Config,
    db: Arc<DatabaseConnection>,
) -> Result<Dispatcher, Box<dyn std::error::Error>> {
    let token = config.github_token();
    if token.is_none() {
        tracing::warn!("No GitHub token configured; unauthenticated requests are heavily rate limited");
    }

    let limiter = match config.github.requests_per_second {
        0 => None,
        rps => Some(ApiRateLimiter::new(rps)),
    };
    let client = GitHubClient::new(&config.github.api_url, token, limiter)?;

    Ok(Dispatcher::new(db, Arc::new(client))
        .with_policy(config.sync.retry_policy())
        .with_options(config.sync.options())
        .with_progress(progress_callback()))
}

async fn resolve(
    db: &DatabaseConnection,
    repository: &str,
) -> Result<RepositoryModel, Box<dyn std::error::Error>> {
    let coords = parse_full_name(repository)?;
    Ok(store::repos::get_by_full_name(db, &coords.full_name()).await?)
}

fn report(outcome: &JobOutcome) -> Result<(), Box<dyn std::error::Error>> {
    if outcome.is_success() {
        println!("{}", outcome);
        Ok(())
    } else {
        Err(outcome.message.clone().into())
    }
}

/// The jobs of one `sync all` run, split into two phases.
///
/// Commits are linked to issues by number, so issues must be in place
/// before any commit of the same repository is reconciled.
fn sync_all_phases(repos: &[RepositoryModel], full: bool) -> (Vec<SyncJob>, Vec<SyncJob>) {
    let full_sync = |job: SyncJob| if full { job.with_full_sync() } else { job };

    let first = repos
        .iter()
        .flat_map(|repo| [SyncJob::metadata(repo.id), full_sync(SyncJob::issues(repo.id))])
        .collect();
    let second = repos
        .iter()
        .map(|repo| full_sync(SyncJob::commits(repo.id)))
        .collect();
    (first, second)
}

pub(crate) async fn handle_sync(
    action: SyncAction,
    config: &Config,
    database_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = Arc::new(connect_and_migrate(database_url).await?);
    let dispatcher = build_dispatcher(config, Arc::clone(&db))?;

    match action {
        SyncAction::Metadata { repository } => {
            let repo = resolve(&db, &repository).await?;
            report(&dispatcher.run(SyncJob::metadata(repo.id)).await)?;
        }
        SyncAction::Issues {
            repository,
            state,
            since,
            full,
        } => {
            let repo = resolve(&db, &repository).await?;
            let job = SyncJob::Issues {
                repository_id: repo.id,
                state,
                since,
                full_sync: full,
            };
            report(&dispatcher.run(job).await)?;
        }
        SyncAction::Commits {
            repository,
            since,
            until,
            sha,
            full,
        } => {
            let repo = resolve(&db, &repository).await?;
            let job = SyncJob::Commits {
                repository_id: repo.id,
                since,
                until,
                sha,
                full_sync: full,
            };
            report(&dispatcher.run(job).await)?;
        }
        SyncAction::All { full, concurrency } => {
            let repos = store::repos::list_active(&db).await?;
            if repos.is_empty() {
                println!("No active repositories to sync.");
                return Ok(());
            }

            let concurrency = concurrency.unwrap_or(config.sync.concurrency);
            tracing::info!(repositories = repos.len(), concurrency, full, "Syncing all active repositories");

            let (first, second) = sync_all_phases(&repos, full);
            let mut outcomes = dispatcher.run_all(first, concurrency).await;
            outcomes.extend(dispatcher.run_all(second, concurrency).await);

            let failed: Vec<&JobOutcome> = outcomes.iter().filter(|o| !o.is_success()).collect();
            for outcome in &outcomes {
                if outcome.is_success() {
                    println!("{}", outcome);
                } else {
                    eprintln!("{}", outcome);
                }
            }
            println!(
                "{} of {} job(s) succeeded",
                outcomes.len() - failed.len(),
                outcomes.len()
            );

            if !failed.is_empty() {
                return Err(format!("{} sync job(s) failed", failed.len()).into());
            }
        }
    }

    Ok(())
}
