//! Job dispatch: retries, per-repository leases and a bounded worker pool.
//!
//! Jobs carry only primitive arguments so they can be queued or serialized
//! anywhere. Every run reloads the repository from the store.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex};

use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use uuid::Uuid;

use crate::platform::PlatformClient;
use crate::retry::{RetryPolicy, with_retry};
use crate::sync::{
    CommitSyncRequest, IssueSyncRequest, ProgressCallback, SyncError, SyncOptions, SyncProgress,
    default_issue_state, emit, sync_commits, sync_issues, sync_metadata,
};

/// A unit of sync work for one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SyncJob {
    Metadata {
        repository_id: Uuid,
    },
    Issues {
        repository_id: Uuid,
        #[serde(default = "default_issue_state")]
        state: String,
        #[serde(default)]
        since: Option<String>,
        #[serde(default)]
        full_sync: bool,
    },
    Commits {
        repository_id: Uuid,
        #[serde(default)]
        since: Option<String>,
        #[serde(default)]
        until: Option<String>,
        /// Branch, tag or SHA to list commits from instead of the default branch.
        #[serde(default)]
        sha: Option<String>,
        #[serde(default)]
        full_sync: bool,
    },
}

impl SyncJob {
    pub fn metadata(repository_id: Uuid) -> Self {
        SyncJob::Metadata { repository_id }
    }

    /// Incremental issue sync over all states.
    pub fn issues(repository_id: Uuid) -> Self {
        SyncJob::Issues {
            repository_id,
            state: default_issue_state(),
            since: None,
            full_sync: false,
        }
    }

    /// Incremental commit sync.
    pub fn commits(repository_id: Uuid) -> Self {
        SyncJob::Commits {
            repository_id,
            since: None,
            until: None,
            sha: None,
            full_sync: false,
        }
    }

    pub fn repository_id(&self) -> Uuid {
        match self {
            SyncJob::Metadata { repository_id }
            | SyncJob::Issues { repository_id, .. }
            | SyncJob::Commits { repository_id, .. } => *repository_id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SyncJob::Metadata { .. } => "metadata",
            SyncJob::Issues { .. } => "issues",
            SyncJob::Commits { .. } => "commits",
        }
    }

    /// Same job with the full-sync override switched on.
    #[must_use]
    pub fn with_full_sync(mut self) -> Self {
        match &mut self {
            SyncJob::Metadata { .. } => {}
            SyncJob::Issues { full_sync, .. } | SyncJob::Commits { full_sync, .. } => {
                *full_sync = true;
            }
        }
        self
    }
}

impl fmt::Display for SyncJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} sync of {}", self.kind(), self.repository_id())
    }
}

/// How a dispatched job ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Succeeded,
    /// The repository row does not exist (any more).
    NotFound,
    /// The request arguments were rejected; retrying cannot help.
    Rejected,
    /// The same repository and kind is already being synced.
    Busy,
    /// Still failing after every retry.
    Failed,
}

/// Result of one dispatched job, with a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobOutcome {
    pub job: SyncJob,
    pub status: JobStatus,
    pub attempts: u32,
    pub message: String,
}

impl JobOutcome {
    pub fn is_success(&self) -> bool {
        self.status == JobStatus::Succeeded
    }
}

impl fmt::Display for JobOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

type LeaseKey = (Uuid, &'static str);

/// Held while a job runs; releases its `(repository, kind)` slot on drop.
struct Lease {
    leases: Arc<Mutex<HashSet<LeaseKey>>>,
    key: LeaseKey,
}

impl Drop for Lease {
    fn drop(&mut self) {
        self.leases
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&self.key);
    }
}

/// Runs sync jobs against one database and one platform client.
#[derive(Clone)]
pub struct Dispatcher {
    db: Arc<DatabaseConnection>,
    client: Arc<dyn PlatformClient>,
    policy: RetryPolicy,
    options: SyncOptions,
    leases: Arc<Mutex<HashSet<LeaseKey>>>,
    on_progress: Option<Arc<ProgressCallback>>,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("policy", &self.policy)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    pub fn new(db: Arc<DatabaseConnection>, client: Arc<dyn PlatformClient>) -> Self {
        Self {
            db,
            client,
            policy: RetryPolicy::default(),
            options: SyncOptions::default(),
            leases: Arc::new(Mutex::new(HashSet::new())),
            on_progress: None,
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: SyncOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_progress(mut self, on_progress: ProgressCallback) -> Self {
        self.on_progress = Some(Arc::new(on_progress));
        self
    }

    fn try_lease(&self, job: &SyncJob) -> Option<Lease> {
        let key = (job.repository_id(), job.kind());
        let mut held = self.leases.lock().unwrap_or_else(|e| e.into_inner());
        if !held.insert(key) {
            return None;
        }
        Some(Lease {
            leases: Arc::clone(&self.leases),
            key,
        })
    }

    async fn run_once(&self, job: &SyncJob) -> Result<String, SyncError> {
        let on_progress = self.on_progress.as_deref();
        let client = self.client.as_ref();
        let db = self.db.as_ref();

        match job {
            SyncJob::Metadata { repository_id } => {
                let repo = sync_metadata(db, client, *repository_id, on_progress).await?;
                Ok(format!("Synced metadata for {}", repo.full_name))
            }
            SyncJob::Issues {
                repository_id,
                state,
                since,
                full_sync,
            } => {
                let request = IssueSyncRequest {
                    state: state.clone(),
                    since: since.clone(),
                    full_sync: *full_sync,
                };
                let report = sync_issues(
                    db,
                    client,
                    *repository_id,
                    &request,
                    &self.options,
                    on_progress,
                )
                .await?;
                Ok(format!("Synced {}", report.summary()))
            }
            SyncJob::Commits {
                repository_id,
                since,
                until,
                sha,
                full_sync,
            } => {
                let request = CommitSyncRequest {
                    since: since.clone(),
                    until: until.clone(),
                    sha: sha.clone(),
                    full_sync: *full_sync,
                };
                let report = sync_commits(
                    db,
                    client,
                    *repository_id,
                    &request,
                    &self.options,
                    on_progress,
                )
                .await?;
                Ok(format!("Synced {}", report.summary()))
            }
        }
    }

    /// Run one job to completion, retrying transient failures.
    ///
    /// A second job for a repository and kind that is already running is
    /// refused with [`JobStatus::Busy`] instead of waiting.
    pub async fn run(&self, job: SyncJob) -> JobOutcome {
        let Some(_lease) = self.try_lease(&job) else {
            tracing::warn!(job = %job, "Sync already running, refusing job");
            return JobOutcome {
                message: format!("{} is already running", job),
                job,
                status: JobStatus::Busy,
                attempts: 0,
            };
        };

        let label = job.to_string();
        let on_progress = self.on_progress.as_deref();
        let (result, attempts) = with_retry(
            || self.run_once(&job),
            self.policy,
            SyncError::is_retryable,
            |err, attempt, delay| {
                tracing::warn!(
                    job = %label,
                    attempt,
                    delay_secs = delay.as_secs(),
                    error = %err,
                    "Sync job failed, retrying"
                );
                emit(
                    on_progress,
                    SyncProgress::RetryScheduled {
                        job: label.clone(),
                        attempt,
                        delay_secs: delay.as_secs(),
                        error: err.to_string(),
                    },
                );
            },
        )
        .await;

        let (status, message) = settle(result, &label, attempts);

        JobOutcome {
            job,
            status,
            attempts,
            message,
        }
    }

    /// Run jobs on at most `concurrency` workers. Outcomes come back in the
    /// order the jobs were given.
    pub async fn run_all(&self, jobs: Vec<SyncJob>, concurrency: usize) -> Vec<JobOutcome> {
        let concurrency = std::cmp::max(1, concurrency);
        let semaphore = Arc::new(Semaphore::new(concurrency));
        let mut join_set: JoinSet<(usize, JobOutcome)> = JoinSet::new();
        let mut slots: Vec<Option<JobOutcome>> = vec![None; jobs.len()];

        for (index, job) in jobs.iter().cloned().enumerate() {
            let dispatcher = self.clone();
            let semaphore = Arc::clone(&semaphore);

            join_set.spawn(async move {
                let _permit = match semaphore.acquire().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        return (
                            index,
                            JobOutcome {
                                message: format!("{} not started: worker pool closed", job),
                                job,
                                status: JobStatus::Failed,
                                attempts: 0,
                            },
                        );
                    }
                };
                (index, dispatcher.run(job).await)
            });
        }

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, outcome)) => slots[index] = Some(outcome),
                Err(err) => tracing::error!(error = %err, "Sync worker task failed"),
            }
        }

        slots
            .into_iter()
            .zip(jobs)
            .map(|(slot, job)| {
                slot.unwrap_or_else(|| JobOutcome {
                    message: format!("{} aborted: worker task failed", job),
                    job,
                    status: JobStatus::Failed,
                    attempts: 0,
                })
            })
            .collect()
    }
}

/// Final status and message for a finished run.
fn settle(result: Result<String, SyncError>, label: &str, attempts: u32) -> (JobStatus, String) {
    match result {
        Ok(message) => (JobStatus::Succeeded, message),
        Err(err) if err.is_not_found() => (JobStatus::NotFound, err.to_string()),
        Err(err) if !err.is_retryable() => (JobStatus::Rejected, err.to_string()),
        Err(err) => {
            tracing::error!(job = %label, attempts, error = %err, "Sync job gave up");
            (
                JobStatus::Failed,
                format!("{} failed after {} attempt(s): {}", label, attempts, err),
            )
        }
    }
}
