//! Shared fixtures for integration tests: an in-memory database and a
//! scripted platform client.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use repomirror::entity::repository::Model as RepositoryModel;
use repomirror::platform::{
    ApiError, ExternalId, FilterParams, PlatformClient, RawRepository, RepoCoordinates,
    ResourceKind,
};
use repomirror::{PlatformType, connect_and_migrate, store};
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};
use tokio::sync::Notify;

pub async fn setup_db() -> DatabaseConnection {
    connect_and_migrate("sqlite::memory:")
        .await
        .expect("Failed to create test database")
}

pub async fn create_repo(db: &DatabaseConnection, owner: &str, name: &str) -> RepositoryModel {
    store::repos::create(db, PlatformType::GitHub, owner, name)
        .await
        .expect("Failed to create repository")
}

/// One `fetch_page` call as the client saw it.
#[derive(Debug, Clone)]
pub struct FetchCall {
    pub kind: ResourceKind,
    pub repo: RepoCoordinates,
    pub filter: FilterParams,
    pub page: u32,
    pub per_page: u32,
}

/// Serves pre-scripted pages. Pages past the end of a script are empty.
#[derive(Default)]
pub struct StubClient {
    pages: HashMap<ResourceKind, Vec<Vec<Value>>>,
    fail_at: Option<(ResourceKind, u32)>,
    /// Number of leading fetches that fail before the script is served.
    failures_before_success: Mutex<u32>,
    gate: Option<Arc<Notify>>,
    calls: Mutex<Vec<FetchCall>>,
}

impl StubClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pages(mut self, kind: ResourceKind, pages: Vec<Vec<Value>>) -> Self {
        self.pages.insert(kind, pages);
        self
    }

    /// Fail every fetch of `page` for `kind` with a 502.
    pub fn failing_at(mut self, kind: ResourceKind, page: u32) -> Self {
        self.fail_at = Some((kind, page));
        self
    }

    pub fn flaky(self, failures: u32) -> Self {
        *self
            .failures_before_success
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = failures;
        self
    }

    /// Block every fetch until `gate` is notified.
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn calls(&self) -> Vec<FetchCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn bad_gateway() -> ApiError {
        ApiError::Remote {
            status: 502,
            body: "bad gateway".to_string(),
        }
    }
}

#[async_trait]
impl PlatformClient for StubClient {
    fn platform_type(&self) -> PlatformType {
        PlatformType::GitHub
    }

    async fn get_repository(&self, repo: &RepoCoordinates) -> Result<RawRepository, ApiError> {
        Ok(RawRepository {
            id: ExternalId::Int(1296269),
            description: Some(format!("Mirror of {}", repo)),
            language: Some("Rust".to_string()),
            stargazers_count: 80,
            forks_count: 9,
            open_issues_count: 3,
            default_branch: Some("trunk".to_string()),
            private: false,
            archived: false,
            html_url: Some(format!("https://github.com/{}", repo)),
            clone_url: Some(format!("https://github.com/{}.git", repo)),
            ssh_url: Some(format!("git@github.com:{}.git", repo)),
        })
    }

    async fn fetch_page(
        &self,
        kind: ResourceKind,
        repo: &RepoCoordinates,
        filter: &FilterParams,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Value>, ApiError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(FetchCall {
                kind,
                repo: repo.clone(),
                filter: filter.clone(),
                page,
                per_page,
            });

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        {
            let mut failures = self
                .failures_before_success
                .lock()
                .unwrap_or_else(|e| e.into_inner());
            if *failures > 0 {
                *failures -= 1;
                return Err(Self::bad_gateway());
            }
        }

        if self.fail_at == Some((kind, page)) {
            return Err(Self::bad_gateway());
        }

        Ok(self
            .pages
            .get(&kind)
            .and_then(|pages| pages.get(page as usize - 1))
            .cloned()
            .unwrap_or_default())
    }
}

// ─── Payload builders ────────────────────────────────────────────────────────

pub fn user(id: i64, login: &str) -> Value {
    json!({
        "id": id,
        "login": login,
        "avatar_url": format!("https://avatars.example/{}", id),
        "html_url": format!("https://github.com/{}", login),
        "type": "User",
    })
}

pub fn issue(id: i64, number: i32, title: &str) -> Value {
    json!({
        "id": id,
        "number": number,
        "title": title,
        "body": null,
        "state": "open",
        "created_at": "2024-01-02T03:04:05Z",
        "updated_at": "2024-01-03T03:04:05Z",
        "closed_at": null,
        "user": user(1, "octocat"),
        "assignees": [],
        "labels": [{"name": "bug"}],
        "milestone": null,
        "comments": 2,
        "html_url": format!("https://github.com/octocat/hello-world/issues/{}", number),
    })
}

pub fn issue_with_assignees(id: i64, number: i32, assignees: &[(i64, &str)]) -> Value {
    let mut record = issue(id, number, "Assigned");
    record["assignees"] = Value::Array(
        assignees
            .iter()
            .map(|(id, login)| user(*id, login))
            .collect(),
    );
    record
}

pub fn pull_request(id: i64, number: i32) -> Value {
    let mut record = issue(id, number, "A pull request");
    record["pull_request"] = json!({"url": "https://api.github.com/pulls/1"});
    record
}

pub fn commit(sha: &str, message: &str) -> Value {
    json!({
        "sha": sha,
        "commit": {
            "message": message,
            "author": {"name": "Mona", "email": "mona@example.com", "date": "2024-02-01T10:00:00Z"},
            "committer": {"name": "GitHub", "email": "noreply@github.com", "date": "2024-02-01T10:05:00Z"},
            "verification": {"verified": true, "reason": "valid"},
        },
        "author": user(1, "octocat"),
        "committer": null,
        "stats": {"additions": 10, "deletions": 2, "total": 12},
        "parents": [{"sha": "0000000000000000000000000000000000000001"}],
        "html_url": format!("https://github.com/octocat/hello-world/commit/{}", sha),
    })
}

/// `count` distinct issues with ids and numbers starting at `first`.
pub fn issue_page(first: i64, count: usize) -> Vec<Value> {
    (0..count as i64)
        .map(|offset| issue(first + offset, (first + offset) as i32, "Generated"))
        .collect()
}
