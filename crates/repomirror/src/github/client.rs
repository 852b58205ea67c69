use std::sync::Arc;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::Utc;
use url::Url;

use crate::entity::platform_type::PlatformType;
use crate::http::reqwest_transport::ReqwestTransport;
use crate::http::{HttpHeaders, HttpRequest, HttpResponse, HttpTransport};
use crate::platform::{
    ApiError, ApiRateLimiter, FilterParams, PlatformClient, RawRepository, RepoCoordinates,
    ResourceKind, format_api_timestamp, parse_rate_limit_headers,
};

/// Public GitHub API root.
pub const GITHUB_API_URL: &str = "https://api.github.com";

const ACCEPT: &str = "application/vnd.github.v3+json";
const USER_AGENT: &str = concat!("repomirror/", env!("CARGO_PKG_VERSION"));

/// GitHub REST API client.
///
/// Presents a bearer token when one is configured and backs off when the
/// remaining quota drops below the low-water mark.
#[derive(Clone)]
pub struct GitHubClient {
    transport: Arc<dyn HttpTransport>,
    base_url: Url,
    token: Option<String>,
    /// Optional proactive pacing on top of the header-driven back-off.
    rate_limiter: Option<ApiRateLimiter>,
}

impl GitHubClient {
    /// Create a client for `api_url` (e.g. `https://api.github.com` or a
    /// GitHub Enterprise `https://ghe.example.com/api/v3`).
    pub fn new(
        api_url: &str,
        token: Option<String>,
        rate_limiter: Option<ApiRateLimiter>,
    ) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::with_timeout(StdDuration::from_secs(30))?;
        Self::new_with_transport(api_url, token, rate_limiter, Arc::new(transport))
    }

    pub fn new_with_transport(
        api_url: &str,
        token: Option<String>,
        rate_limiter: Option<ApiRateLimiter>,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, ApiError> {
        // A trailing slash keeps any path prefix when segments are appended.
        let base_url = Url::parse(&format!("{}/", api_url.trim_end_matches('/')))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase));
        }

        Ok(Self {
            transport,
            base_url,
            token: token.filter(|t| !t.trim().is_empty()),
            rate_limiter,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// `{base}/repos/{owner}/{name}[/{kind}]`
    fn repo_url(&self, repo: &RepoCoordinates, kind: Option<ResourceKind>) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ApiError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?;
            segments
                .pop_if_empty()
                .extend(["repos", repo.owner.as_str(), repo.name.as_str()]);
            if let Some(kind) = kind {
                segments.push(kind.as_str());
            }
        }
        Ok(url)
    }

    fn headers(&self) -> HttpHeaders {
        let mut headers = vec![
            ("Accept".to_string(), ACCEPT.to_string()),
            ("User-Agent".to_string(), USER_AGENT.to_string()),
        ];
        if let Some(token) = &self.token {
            headers.push(("Authorization".to_string(), format!("Bearer {}", token)));
        }
        headers
    }

    /// Sleep until the quota resets when the response says it is nearly
    /// spent. Runs before the status check so a failing page still waits.
    async fn respect_rate_limit(&self, response: &HttpResponse) {
        let Some(info) = parse_rate_limit_headers(&response.headers) else {
            return;
        };
        if let Some(delay) = info.backoff_delay(Utc::now()) {
            tracing::warn!(
                remaining = info.remaining,
                limit = ?info.limit,
                reset_at = %info.reset_at,
                sleep_secs = delay.as_secs(),
                "GitHub rate limit nearly exhausted, sleeping until reset"
            );
            tokio::time::sleep(delay).await;
        }
    }

    /// Make an authenticated GET request and decode the JSON body.
    async fn get_json(&self, url: Url) -> Result<serde_json::Value, ApiError> {
        if let Some(limiter) = &self.rate_limiter {
            limiter.wait().await;
        }

        tracing::debug!(url = %url, "GET");
        let request = HttpRequest {
            url: url.into(),
            headers: self.headers(),
        };

        let response = self.transport.send(request).await?;

        self.respect_rate_limit(&response).await;

        if !response.is_success() {
            return Err(ApiError::Remote {
                status: response.status,
                body: String::from_utf8_lossy(&response.body).to_string(),
            });
        }

        Ok(serde_json::from_slice(&response.body)?)
    }
}

#[async_trait]
impl PlatformClient for GitHubClient {
    fn platform_type(&self) -> PlatformType {
        PlatformType::GitHub
    }

    async fn get_repository(&self, repo: &RepoCoordinates) -> Result<RawRepository, ApiError> {
        let url = self.repo_url(repo, None)?;
        let value = self.get_json(url).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn fetch_page(
        &self,
        kind: ResourceKind,
        repo: &RepoCoordinates,
        filter: &FilterParams,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<serde_json::Value>, ApiError> {
        let mut url = self.repo_url(repo, Some(kind))?;
        {
            let mut query = url.query_pairs_mut();
            if kind == ResourceKind::Issues {
                query.append_pair("state", filter.state.unwrap_or_default().as_str());
            }
            if let Some(since) = filter.since {
                query.append_pair("since", &format_api_timestamp(since));
            }
            if kind == ResourceKind::Commits {
                if let Some(until) = filter.until {
                    query.append_pair("until", &format_api_timestamp(until));
                }
                if let Some(sha) = &filter.sha {
                    query.append_pair("sha", sha);
                }
            }
            query
                .append_pair("direction", "asc")
                .append_pair("page", &page.to_string())
                .append_pair("per_page", &per_page.to_string());
        }

        match self.get_json(url).await? {
            serde_json::Value::Array(records) => Ok(records),
            other => Err(ApiError::Decode(format!(
                "expected a JSON array of {}, got {}",
                kind,
                json_type_name(&other)
            ))),
        }
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
