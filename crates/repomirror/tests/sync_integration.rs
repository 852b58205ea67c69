//! Integration tests for the sync engine against an in-memory database.
//!
//! Key scenarios tested:
//! - Re-running a sync updates rows in place, users included
//! - Checkpoints move only after a run reaches the end of the collection
//! - Short pages end pagination
//! - Assignee sets and commit-issue links are replaced, not appended
//! - Pull requests and malformed records are skipped without aborting

#![cfg(all(feature = "sqlite", feature = "migrate"))]

mod common;

use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};
use repomirror::platform::{IssueStateFilter, PAGE_SIZE, ResourceKind};
use repomirror::store;
use repomirror::sync::{
    CommitSyncRequest, IssueSyncRequest, ProgressCallback, SyncError, SyncOptions, SyncProgress,
    sync_commits, sync_issues, sync_metadata,
};
use repomirror::IssueModel;
use serde_json::json;
use uuid::Uuid;

use common::{
    StubClient, commit, create_repo, issue, issue_page, issue_with_assignees, pull_request,
    setup_db,
};

fn all_issues() -> IssueSyncRequest {
    IssueSyncRequest::default()
}

// ─── Idempotence ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn resyncing_the_same_issues_updates_in_place() {
    let db = setup_db().await;
    let repo = create_repo(&db, "octocat", "hello-world").await;
    let client = StubClient::new().with_pages(
        ResourceKind::Issues,
        vec![vec![issue(10, 1, "First"), issue(11, 2, "Second")]],
    );

    let first = sync_issues(&db, &client, repo.id, &all_issues(), &SyncOptions::default(), None)
        .await
        .expect("first sync");
    assert_eq!(first.created, 2);
    assert_eq!(first.updated, 0);
    let after_first = stored_issues(&db, repo.id).await;

    let second = sync_issues(
        &db,
        &client,
        repo.id,
        &IssueSyncRequest {
            full_sync: true,
            ..all_issues()
        },
        &SyncOptions::default(),
        None,
    )
    .await
    .expect("second sync");
    assert_eq!(second.created, 0);
    assert_eq!(second.updated, 2);

    assert_eq!(store::repos::count_issues(&db, repo.id).await.unwrap(), 2);
    assert_eq!(stored_issues(&db, repo.id).await, after_first);
    // The same author appears on both issues and both runs.
    assert_eq!(store::users::count(&db).await.unwrap(), 1);
}

/// Stored issues ordered by number, with the per-write `synced_at` blanked.
async fn stored_issues(db: &sea_orm::DatabaseConnection, repository_id: Uuid) -> Vec<IssueModel> {
    let epoch = Utc.timestamp_opt(0, 0).unwrap().fixed_offset();
    let mut issues = store::issues::list_for_repository(db, repository_id)
        .await
        .unwrap();
    issues.sort_by_key(|issue| issue.number);
    for issue in &mut issues {
        issue.synced_at = epoch;
    }
    issues
}

#[tokio::test]
async fn changed_login_and_avatar_update_the_existing_user() {
    let db = setup_db().await;
    let repo = create_repo(&db, "octocat", "hello-world").await;
    let client = StubClient::new().with_pages(ResourceKind::Issues, vec![vec![issue(10, 1, "First")]]);
    sync_issues(&db, &client, repo.id, &all_issues(), &SyncOptions::default(), None)
        .await
        .expect("first sync");
    let original = store::users::find_by_external_id(&db, "1")
        .await
        .unwrap()
        .expect("author stored");
    assert_eq!(original.username, "octocat");

    let mut renamed = issue(10, 1, "First");
    renamed["user"]["login"] = json!("mona");
    renamed["user"]["avatar_url"] = json!("https://avatars.example/mona-new");
    let client = StubClient::new().with_pages(ResourceKind::Issues, vec![vec![renamed]]);
    sync_issues(
        &db,
        &client,
        repo.id,
        &IssueSyncRequest {
            full_sync: true,
            ..all_issues()
        },
        &SyncOptions::default(),
        None,
    )
    .await
    .expect("second sync");

    assert_eq!(store::users::count(&db).await.unwrap(), 1);
    let updated = store::users::find_by_external_id(&db, "1")
        .await
        .unwrap()
        .expect("author still stored");
    assert_eq!(updated.id, original.id);
    assert_eq!(updated.username, "mona");
    assert_eq!(
        updated.avatar_url.as_deref(),
        Some("https://avatars.example/mona-new")
    );
    let stored = store::issues::find_by_number(&db, repo.id, 1)
        .await
        .unwrap()
        .expect("issue stored");
    assert_eq!(stored.author_id, Some(original.id));
}

#[tokio::test]
async fn duplicate_records_within_a_run_are_counted_once() {
    let db = setup_db().await;
    let repo = create_repo(&db, "octocat", "hello-world").await;
    let client = StubClient::new().with_pages(
        ResourceKind::Issues,
        vec![vec![issue(10, 1, "First"), issue(10, 1, "First again")]],
    );

    let report = sync_issues(&db, &client, repo.id, &all_issues(), &SyncOptions::default(), None)
        .await
        .expect("sync");

    assert_eq!(report.created, 1);
    assert_eq!(report.duplicates, 1);
    let stored = store::issues::find_by_number(&db, repo.id, 1)
        .await
        .unwrap()
        .expect("issue stored");
    assert_eq!(stored.title, "First");
}

// ─── Checkpoints ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn successful_run_stamps_the_checkpoint() {
    let db = setup_db().await;
    let repo = create_repo(&db, "octocat", "hello-world").await;
    let client = StubClient::new().with_pages(ResourceKind::Issues, vec![issue_page(1, 3)]);

    let before = Utc::now();
    let report = sync_issues(&db, &client, repo.id, &all_issues(), &SyncOptions::default(), None)
        .await
        .expect("sync");

    let reloaded = store::repos::find_by_id(&db, repo.id).await.unwrap().unwrap();
    let checkpoint = reloaded.issues_checkpoint().expect("checkpoint set");
    assert!(checkpoint >= before - chrono::Duration::seconds(1));
    assert_eq!(report.checkpoint.map(|c| c.timestamp()), Some(checkpoint.timestamp()));
    assert!(reloaded.commits_checkpoint().is_none());
}

#[tokio::test]
async fn fetch_failure_keeps_committed_pages_but_not_the_checkpoint() {
    let db = setup_db().await;
    let repo = create_repo(&db, "octocat", "hello-world").await;
    let client = StubClient::new()
        .with_pages(ResourceKind::Issues, vec![issue_page(1, PAGE_SIZE as usize)])
        .failing_at(ResourceKind::Issues, 2);

    let err = sync_issues(&db, &client, repo.id, &all_issues(), &SyncOptions::default(), None)
        .await
        .expect_err("page 2 fails");

    assert!(matches!(
        err,
        SyncError::Fetch {
            kind: ResourceKind::Issues,
            page: 2,
            ..
        }
    ));
    assert!(err.is_retryable());
    assert_eq!(
        store::repos::count_issues(&db, repo.id).await.unwrap(),
        PAGE_SIZE as u64
    );
    let reloaded = store::repos::find_by_id(&db, repo.id).await.unwrap().unwrap();
    assert!(reloaded.last_sync_issues_at.is_none());
}

#[tokio::test]
async fn incremental_run_starts_from_the_checkpoint() {
    let db = setup_db().await;
    let repo = create_repo(&db, "octocat", "hello-world").await;
    let checkpoint = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    store::repos::advance_checkpoint(&db, repo.id, store::Checkpoint::Issues, checkpoint)
        .await
        .unwrap();

    let client = StubClient::new();
    sync_issues(&db, &client, repo.id, &all_issues(), &SyncOptions::default(), None)
        .await
        .expect("sync");

    let calls = client.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].filter.since, Some(checkpoint));
    assert_eq!(calls[0].filter.state, Some(IssueStateFilter::All));
    assert_eq!(calls[0].repo.full_name(), "octocat/hello-world");
}

#[tokio::test]
async fn full_sync_ignores_the_checkpoint() {
    let db = setup_db().await;
    let repo = create_repo(&db, "octocat", "hello-world").await;
    let checkpoint = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    store::repos::advance_checkpoint(&db, repo.id, store::Checkpoint::Commits, checkpoint)
        .await
        .unwrap();

    let client = StubClient::new();
    let request = CommitSyncRequest {
        since: Some("2024-04-01T00:00:00Z".to_string()),
        until: Some("2024-06-01".to_string()),
        full_sync: true,
        ..CommitSyncRequest::default()
    };
    sync_commits(&db, &client, repo.id, &request, &SyncOptions::default(), None)
        .await
        .expect("sync");

    let calls = client.calls();
    assert_eq!(calls[0].kind, ResourceKind::Commits);
    assert_eq!(calls[0].filter.since, None);
    assert_eq!(
        calls[0].filter.until,
        Some(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap())
    );
    assert_eq!(calls[0].filter.state, None);
}

#[tokio::test]
async fn explicit_since_beats_the_checkpoint() {
    let db = setup_db().await;
    let repo = create_repo(&db, "octocat", "hello-world").await;
    store::repos::advance_checkpoint(
        &db,
        repo.id,
        store::Checkpoint::Issues,
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
    )
    .await
    .unwrap();

    let client = StubClient::new();
    let request = IssueSyncRequest {
        state: "closed".to_string(),
        since: Some("2023-01-01T00:00:00+02:00".to_string()),
        full_sync: false,
    };
    sync_issues(&db, &client, repo.id, &request, &SyncOptions::default(), None)
        .await
        .expect("sync");

    let calls = client.calls();
    assert_eq!(
        calls[0].filter.since,
        Some(Utc.with_ymd_and_hms(2022, 12, 31, 22, 0, 0).unwrap())
    );
    assert_eq!(calls[0].filter.state, Some(IssueStateFilter::Closed));
}

// ─── Pagination ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn short_page_ends_pagination() {
    let db = setup_db().await;
    let repo = create_repo(&db, "octocat", "hello-world").await;
    let client = StubClient::new().with_pages(
        ResourceKind::Issues,
        vec![issue_page(1, 100), issue_page(101, 100), issue_page(201, 37)],
    );

    let report = sync_issues(&db, &client, repo.id, &all_issues(), &SyncOptions::default(), None)
        .await
        .expect("sync");

    let pages: Vec<u32> = client.calls().iter().map(|c| c.page).collect();
    assert_eq!(pages, vec![1, 2, 3]);
    assert!(client.calls().iter().all(|c| c.per_page == PAGE_SIZE));
    assert_eq!(report.pages, 3);
    assert_eq!(report.created, 237);
    assert_eq!(store::repos::count_issues(&db, repo.id).await.unwrap(), 237);
}

#[tokio::test]
async fn full_last_page_needs_one_more_empty_fetch() {
    let db = setup_db().await;
    let repo = create_repo(&db, "octocat", "hello-world").await;
    let client = StubClient::new().with_pages(
        ResourceKind::Issues,
        vec![issue_page(1, 100), issue_page(101, 100)],
    );

    let report = sync_issues(&db, &client, repo.id, &all_issues(), &SyncOptions::default(), None)
        .await
        .expect("sync");

    assert_eq!(client.calls().len(), 3);
    assert_eq!(report.pages, 2);
}

#[tokio::test]
async fn progress_events_follow_the_run() {
    let db = setup_db().await;
    let repo = create_repo(&db, "octocat", "hello-world").await;
    let client = StubClient::new().with_pages(ResourceKind::Issues, vec![issue_page(1, 2)]);

    let events: Arc<Mutex<Vec<SyncProgress>>> = Arc::new(Mutex::new(Vec::new()));
    let events_capture = Arc::clone(&events);
    let callback: ProgressCallback = Box::new(move |event| {
        events_capture
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event);
    });

    sync_issues(
        &db,
        &client,
        repo.id,
        &all_issues(),
        &SyncOptions::default(),
        Some(&callback),
    )
    .await
    .expect("sync");

    let events = events.lock().unwrap_or_else(|e| e.into_inner());
    assert!(matches!(events.first(), Some(SyncProgress::SyncStarted { .. })));
    assert!(events.iter().any(|e| matches!(
        e,
        SyncProgress::PageCommitted {
            page: 1,
            created: 2,
            ..
        }
    )));
    assert!(matches!(
        events.last(),
        Some(SyncProgress::SyncComplete { created: 2, .. })
    ));
}

// ─── Reconciliation ────────────────────────────────────────────────────────────

#[tokio::test]
async fn assignee_set_is_replaced() {
    let db = setup_db().await;
    let repo = create_repo(&db, "octocat", "hello-world").await;

    let first = StubClient::new().with_pages(
        ResourceKind::Issues,
        vec![vec![issue_with_assignees(10, 1, &[(21, "alice"), (22, "bob")])]],
    );
    sync_issues(&db, &first, repo.id, &all_issues(), &SyncOptions::default(), None)
        .await
        .expect("first sync");

    let second = StubClient::new().with_pages(
        ResourceKind::Issues,
        vec![vec![issue_with_assignees(10, 1, &[(22, "bob"), (23, "carol")])]],
    );
    sync_issues(&db, &second, repo.id, &all_issues(), &SyncOptions::default(), None)
        .await
        .expect("second sync");

    let stored = store::issues::find_by_number(&db, repo.id, 1)
        .await
        .unwrap()
        .expect("issue");
    let names: Vec<String> = store::issues::assignees_of(&db, stored.id)
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.username)
        .collect();
    assert_eq!(names, vec!["bob", "carol"]);
}

#[tokio::test]
async fn pull_requests_are_skipped_unless_requested() {
    let db = setup_db().await;
    let repo = create_repo(&db, "octocat", "hello-world").await;
    let page = vec![issue(10, 1, "Bug"), pull_request(11, 2)];

    let client = StubClient::new().with_pages(ResourceKind::Issues, vec![page.clone()]);
    let report = sync_issues(&db, &client, repo.id, &all_issues(), &SyncOptions::default(), None)
        .await
        .expect("sync");
    assert_eq!(report.created, 1);
    assert_eq!(report.pull_requests_skipped, 1);
    assert!(
        store::issues::find_by_number(&db, repo.id, 2)
            .await
            .unwrap()
            .is_none()
    );

    let client = StubClient::new().with_pages(ResourceKind::Issues, vec![page]);
    let options = SyncOptions {
        include_pull_requests: true,
    };
    sync_issues(&db, &client, repo.id, &all_issues(), &options, None)
        .await
        .expect("sync with pull requests");
    let pr = store::issues::find_by_number(&db, repo.id, 2)
        .await
        .unwrap()
        .expect("pull request stored");
    assert!(pr.is_pull_request);
}

#[tokio::test]
async fn malformed_record_is_skipped_and_the_page_continues() {
    let db = setup_db().await;
    let repo = create_repo(&db, "octocat", "hello-world").await;

    let mut bad_timestamp = issue(11, 2, "Bad");
    bad_timestamp["created_at"] = serde_json::json!("yesterday");
    let mut no_id = issue(12, 3, "No id");
    no_id.as_object_mut().unwrap().remove("id");

    let client = StubClient::new().with_pages(
        ResourceKind::Issues,
        vec![vec![issue(10, 1, "Good"), bad_timestamp, no_id, issue(13, 4, "Also good")]],
    );
    let report = sync_issues(&db, &client, repo.id, &all_issues(), &SyncOptions::default(), None)
        .await
        .expect("sync");

    assert_eq!(report.created, 2);
    assert_eq!(report.invalid, 2);
    assert_eq!(store::repos::count_issues(&db, repo.id).await.unwrap(), 2);
    let reloaded = store::repos::find_by_id(&db, repo.id).await.unwrap().unwrap();
    assert!(reloaded.last_sync_issues_at.is_some());
}

#[tokio::test]
async fn malformed_copy_does_not_hide_a_later_valid_copy() {
    let db = setup_db().await;
    let repo = create_repo(&db, "octocat", "hello-world").await;

    let mut bad_timestamp = issue(10, 1, "Broken");
    bad_timestamp["created_at"] = json!("yesterday");
    let client = StubClient::new().with_pages(
        ResourceKind::Issues,
        vec![vec![bad_timestamp, issue(10, 1, "Fixed upstream")]],
    );
    let report = sync_issues(&db, &client, repo.id, &all_issues(), &SyncOptions::default(), None)
        .await
        .expect("sync");

    assert_eq!(report.invalid, 1);
    assert_eq!(report.duplicates, 0);
    assert_eq!(report.created, 1);
    let stored = store::issues::find_by_number(&db, repo.id, 1)
        .await
        .unwrap()
        .expect("valid copy stored");
    assert_eq!(stored.title, "Fixed upstream");
}

#[tokio::test]
async fn commit_sync_forwards_the_starting_ref() {
    let db = setup_db().await;
    let repo = create_repo(&db, "octocat", "hello-world").await;
    let client = StubClient::new();

    let request = CommitSyncRequest {
        sha: Some("release-1.x".to_string()),
        ..CommitSyncRequest::default()
    };
    sync_commits(&db, &client, repo.id, &request, &SyncOptions::default(), None)
        .await
        .expect("sync");

    let calls = client.calls();
    assert_eq!(calls[0].kind, ResourceKind::Commits);
    assert_eq!(calls[0].filter.sha.as_deref(), Some("release-1.x"));
}

#[tokio::test]
async fn commits_store_stats_parents_and_verification() {
    let db = setup_db().await;
    let repo = create_repo(&db, "octocat", "hello-world").await;
    let sha = "6dcb09b5b57875f334f61aebed695e2e4193db5e";
    let client = StubClient::new().with_pages(
        ResourceKind::Commits,
        vec![vec![commit(sha, "Update README")]],
    );

    sync_commits(
        &db,
        &client,
        repo.id,
        &CommitSyncRequest::default(),
        &SyncOptions::default(),
        None,
    )
    .await
    .expect("sync");

    let stored = store::commits::find_by_sha(&db, repo.id, sha)
        .await
        .unwrap()
        .expect("commit");
    assert_eq!(stored.short_sha, "6dcb09b");
    assert_eq!(stored.total_changes, 12);
    assert_eq!(stored.verification_status, "verified");
    assert!(!stored.is_merge_commit());
    assert!(stored.author_id.is_some());
    assert!(stored.committer_id.is_none());
}

// ─── Issue links ───────────────────────────────────────────────────────────────

async fn seed_issues(db: &sea_orm::DatabaseConnection, repository_id: Uuid) {
    let client = StubClient::new().with_pages(
        ResourceKind::Issues,
        vec![vec![issue(103, 3, "Three"), issue(104, 4, "Four"), issue(107, 7, "Seven")]],
    );
    sync_issues(db, &client, repository_id, &all_issues(), &SyncOptions::default(), None)
        .await
        .expect("seed issues");
}

#[tokio::test]
async fn commit_links_follow_the_latest_message() {
    let db = setup_db().await;
    let repo = create_repo(&db, "octocat", "hello-world").await;
    seed_issues(&db, repo.id).await;
    let sha = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";

    let first = StubClient::new()
        .with_pages(ResourceKind::Commits, vec![vec![commit(sha, "Fixes #3")]]);
    sync_commits(&db, &first, repo.id, &CommitSyncRequest::default(), &SyncOptions::default(), None)
        .await
        .expect("first sync");
    let stored = store::commits::find_by_sha(&db, repo.id, sha).await.unwrap().unwrap();
    assert_eq!(store::commits::linked_issue_numbers(&db, stored.id).await.unwrap(), vec![3]);

    let amended = StubClient::new()
        .with_pages(ResourceKind::Commits, vec![vec![commit(sha, "Fixes #4")]]);
    let request = CommitSyncRequest {
        full_sync: true,
        ..CommitSyncRequest::default()
    };
    sync_commits(&db, &amended, repo.id, &request, &SyncOptions::default(), None)
        .await
        .expect("second sync");
    assert_eq!(store::commits::linked_issue_numbers(&db, stored.id).await.unwrap(), vec![4]);
}

#[tokio::test]
async fn repeated_references_link_once() {
    let db = setup_db().await;
    let repo = create_repo(&db, "octocat", "hello-world").await;
    seed_issues(&db, repo.id).await;
    let sha = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

    let client = StubClient::new().with_pages(
        ResourceKind::Commits,
        vec![vec![commit(sha, "fixes #7 and closes #7, resolves #99")]],
    );
    sync_commits(&db, &client, repo.id, &CommitSyncRequest::default(), &SyncOptions::default(), None)
        .await
        .expect("sync");

    let stored = store::commits::find_by_sha(&db, repo.id, sha).await.unwrap().unwrap();
    assert_eq!(store::commits::linked_issue_numbers(&db, stored.id).await.unwrap(), vec![7]);
}

#[tokio::test]
async fn links_stay_within_the_repository() {
    let db = setup_db().await;
    let other = create_repo(&db, "octocat", "other").await;
    seed_issues(&db, other.id).await;
    let repo = create_repo(&db, "octocat", "hello-world").await;
    let sha = "cccccccccccccccccccccccccccccccccccccccc";

    let client = StubClient::new()
        .with_pages(ResourceKind::Commits, vec![vec![commit(sha, "Closes #3")]]);
    sync_commits(&db, &client, repo.id, &CommitSyncRequest::default(), &SyncOptions::default(), None)
        .await
        .expect("sync");

    let stored = store::commits::find_by_sha(&db, repo.id, sha).await.unwrap().unwrap();
    assert!(store::commits::linked_issue_numbers(&db, stored.id).await.unwrap().is_empty());
}

// ─── Users ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn deleting_a_user_clears_references_but_keeps_issues() {
    let db = setup_db().await;
    let repo = create_repo(&db, "octocat", "hello-world").await;
    let client = StubClient::new().with_pages(
        ResourceKind::Issues,
        vec![vec![issue_with_assignees(10, 1, &[(1, "octocat")])]],
    );
    sync_issues(&db, &client, repo.id, &all_issues(), &SyncOptions::default(), None)
        .await
        .expect("sync");

    let author = store::users::find_by_external_id(&db, "1")
        .await
        .unwrap()
        .expect("author stored");
    assert_eq!(store::users::delete(&db, author.id).await.unwrap(), 1);

    let stored = store::issues::find_by_number(&db, repo.id, 1)
        .await
        .unwrap()
        .expect("issue survives");
    assert!(stored.author_id.is_none());
    assert!(store::issues::assignees_of(&db, stored.id).await.unwrap().is_empty());
}

// ─── Missing repositories and bad requests ───────────────────────────────────────

#[tokio::test]
async fn unknown_repository_is_reported_without_fetching() {
    let db = setup_db().await;
    let client = StubClient::new();
    let missing = Uuid::new_v4();

    let err = sync_issues(&db, &client, missing, &all_issues(), &SyncOptions::default(), None)
        .await
        .expect_err("missing repository");
    assert!(matches!(err, SyncError::RepositoryNotFound(id) if id == missing));
    assert!(!err.is_retryable());
    assert!(client.calls().is_empty());

    let err = sync_metadata(&db, &client, missing, None)
        .await
        .expect_err("missing repository");
    assert!(matches!(err, SyncError::RepositoryNotFound(_)));
}

#[tokio::test]
async fn unknown_state_is_rejected() {
    let db = setup_db().await;
    let repo = create_repo(&db, "octocat", "hello-world").await;
    let client = StubClient::new();
    let request = IssueSyncRequest {
        state: "merged".to_string(),
        ..all_issues()
    };

    let err = sync_issues(&db, &client, repo.id, &request, &SyncOptions::default(), None)
        .await
        .expect_err("bad state");
    assert!(matches!(err, SyncError::InvalidRequest(_)));
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn metadata_sync_refreshes_repository_fields() {
    let db = setup_db().await;
    let repo = create_repo(&db, "octocat", "hello-world").await;
    let client = StubClient::new();

    let updated = sync_metadata(&db, &client, repo.id, None)
        .await
        .expect("metadata");

    assert_eq!(updated.external_id.as_deref(), Some("1296269"));
    assert_eq!(updated.default_branch, "trunk");
    assert_eq!(updated.stars_count, 80);
    assert!(updated.last_sync_metadata_at.is_some());
    assert!(updated.last_sync_issues_at.is_none());
}
