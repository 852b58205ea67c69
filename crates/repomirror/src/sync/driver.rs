//! Page-by-page synchronization of one collection.

use std::collections::HashSet;

use chrono::Utc;
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::entity::repository::Model as RepositoryModel;
use crate::platform::{FilterParams, PAGE_SIZE, PlatformClient, RepoCoordinates, ResourceKind};
use crate::store::{self, Checkpoint, StoreError};

use super::error::SyncError;
use super::progress::{ProgressCallback, SyncProgress, emit};
use super::reconcile::{ReconcileError, Reconciler, Upserted, is_pull_request};
use super::types::{SyncOptions, SyncReport};

fn checkpoint_for(kind: ResourceKind) -> Checkpoint {
    match kind {
        ResourceKind::Issues => Checkpoint::Issues,
        ResourceKind::Commits => Checkpoint::Commits,
    }
}

/// Fetch and reconcile pages until the collection is exhausted.
///
/// Pages are requested strictly in sequence starting at 1. Each non-empty
/// page is reconciled inside its own transaction; records whose natural key
/// was already stored in this run are skipped. A short page (fewer than
/// [`PAGE_SIZE`] records) is taken as the last one.
///
/// A fetch error stops the run at that page: earlier pages stay committed
/// and the checkpoint keeps its previous value. Only after exhaustion is the
/// checkpoint advanced to the current time.
pub async fn drive(
    db: &DatabaseConnection,
    client: &dyn PlatformClient,
    repository: &RepositoryModel,
    reconciler: &dyn Reconciler,
    filter: &FilterParams,
    options: &SyncOptions,
    on_progress: Option<&ProgressCallback>,
) -> Result<SyncReport, SyncError> {
    let kind = reconciler.kind();
    let coords = RepoCoordinates::new(&repository.owner, &repository.name);
    let full_name = repository.full_name.clone();

    let mut report = SyncReport::new(kind);
    let mut seen: HashSet<String> = HashSet::new();
    let mut page: u32 = 1;

    tracing::info!(
        repository = %full_name,
        %kind,
        since = ?filter.since,
        until = ?filter.until,
        "Starting sync"
    );
    emit(
        on_progress,
        SyncProgress::SyncStarted {
            repository: full_name.clone(),
            kind,
            since: filter.since,
            until: filter.until,
        },
    );

    loop {
        let records = match client
            .fetch_page(kind, &coords, filter, page, PAGE_SIZE)
            .await
        {
            Ok(records) => records,
            Err(source) => {
                tracing::warn!(
                    repository = %full_name,
                    %kind,
                    page,
                    error = %source,
                    "Fetch failed, stopping run"
                );
                emit(
                    on_progress,
                    SyncProgress::SyncFailed {
                        repository: full_name.clone(),
                        kind,
                        page,
                        error: source.to_string(),
                    },
                );
                return Err(SyncError::Fetch { kind, page, source });
            }
        };

        if records.is_empty() {
            break;
        }

        let count = records.len();
        report.pages += 1;
        report.fetched += count;
        emit(
            on_progress,
            SyncProgress::PageFetched {
                repository: full_name.clone(),
                kind,
                page,
                count,
            },
        );

        let (created_before, updated_before) = (report.created, report.updated);
        let txn = db.begin().await?;
        for record in records {
            if kind == ResourceKind::Issues
                && !options.include_pull_requests
                && is_pull_request(&record)
            {
                report.pull_requests_skipped += 1;
                continue;
            }

            let Some(key) = reconciler.natural_key(&record) else {
                report.invalid += 1;
                skip_record(on_progress, &full_name, kind, page, "record has no natural key");
                continue;
            };
            if seen.contains(&key) {
                report.duplicates += 1;
                continue;
            }

            match reconciler.reconcile(&txn, repository.id, record).await {
                Ok(Upserted::Created) => {
                    report.created += 1;
                    seen.insert(key);
                }
                Ok(Upserted::Updated) => {
                    report.updated += 1;
                    seen.insert(key);
                }
                // A later well-formed copy of the same key must still land.
                Err(err @ ReconcileError::Parse { .. }) => {
                    report.invalid += 1;
                    skip_record(on_progress, &full_name, kind, page, &err.to_string());
                }
                // Dropping the transaction rolls the page back.
                Err(ReconcileError::Database(err)) => return Err(err.into()),
            }
        }
        txn.commit().await?;

        tracing::debug!(
            repository = %full_name,
            %kind,
            page,
            count,
            "Committed page"
        );
        emit(
            on_progress,
            SyncProgress::PageCommitted {
                repository: full_name.clone(),
                kind,
                page,
                created: report.created - created_before,
                updated: report.updated - updated_before,
            },
        );

        if count < PAGE_SIZE as usize {
            break;
        }
        page += 1;
    }

    let now = Utc::now();
    store::repos::advance_checkpoint(db, repository.id, checkpoint_for(kind), now)
        .await
        .map_err(|err| match err {
            StoreError::NotFound { .. } => SyncError::RepositoryNotFound(repository.id),
            other => other.into(),
        })?;
    report.checkpoint = Some(now);

    tracing::info!(
        repository = %full_name,
        %kind,
        pages = report.pages,
        created = report.created,
        updated = report.updated,
        duplicates = report.duplicates,
        invalid = report.invalid,
        "Sync complete"
    );
    emit(
        on_progress,
        SyncProgress::SyncComplete {
            repository: full_name,
            kind,
            pages: report.pages,
            created: report.created,
            updated: report.updated,
            checkpoint: now,
        },
    );

    Ok(report)
}

fn skip_record(
    on_progress: Option<&ProgressCallback>,
    repository: &str,
    kind: ResourceKind,
    page: u32,
    reason: &str,
) {
    tracing::warn!(repository, %kind, page, reason, "Skipping malformed record");
    emit(
        on_progress,
        SyncProgress::RecordSkipped {
            repository: repository.to_string(),
            kind,
            page,
            reason: reason.to_string(),
        },
    );
}
