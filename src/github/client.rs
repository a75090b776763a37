//! GitHub API client for release discovery.
//!
//! Fetches release listings and raw release assets.

use super::types::Release;
use super::GitHubError;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Default API endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Default User-Agent sent upstream (GitHub rejects requests without one).
pub const DEFAULT_USER_AGENT: &str = concat!("xbmc-release-repo/", env!("CARGO_PKG_VERSION"));

/// Releases requested per listing call.
const RELEASES_PER_PAGE: u32 = 100;

/// Settings for [`ReleaseClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// API base URL, without trailing slash.
    pub api_base: String,
    /// User-Agent header value.
    pub user_agent: String,
    /// Timeout applied to every request.
    pub timeout: Duration,
    /// Optional API token for higher rate limits.
    pub token: Option<String>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
            token: None,
        }
    }
}

/// GitHub API client for release discovery.
#[derive(Debug, Clone)]
pub struct ReleaseClient {
    /// HTTP client.
    client: reqwest::Client,
    /// API base URL.
    api_base: String,
    /// Bearer token, if any.
    token: Option<String>,
}

impl ReleaseClient {
    /// Creates a new client.
    ///
    /// # Errors
    /// Returns error if the underlying HTTP client cannot be built.
    pub fn new(options: ClientOptions) -> Result<Self, GitHubError> {
        let client = reqwest::Client::builder()
            .user_agent(options.user_agent)
            .timeout(options.timeout)
            .build()
            .map_err(|e| GitHubError::Network(e.to_string()))?;

        Ok(Self {
            client,
            api_base: options.api_base.trim_end_matches('/').to_string(),
            token: options.token,
        })
    }

    /// Returns the API base URL.
    #[must_use]
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Fetches the releases of `repository` ("owner/name"), newest first.
    pub async fn fetch_releases(&self, repository: &str) -> Result<Vec<Release>, GitHubError> {
        validate_repository(repository)?;

        let url = format!(
            "{}/repos/{}/releases?per_page={}",
            self.api_base, repository, RELEASES_PER_PAGE
        );

        debug!("[GITHUB] fetch_releases: GET {}", url);
        let start = Instant::now();

        let mut request = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github.v3+json");
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            warn!("[GITHUB] HTTP request failed: {}", e);
            GitHubError::Network(e.to_string())
        })?;

        let status = response.status();
        debug!("[GITHUB] Response: {} in {:?}", status, start.elapsed());

        if status == reqwest::StatusCode::NOT_FOUND {
            warn!("[GITHUB] Repository not found: {}", repository);
            return Err(GitHubError::RepositoryNotFound(repository.to_string()));
        }

        if status == reqwest::StatusCode::FORBIDDEN {
            // Check for rate limit
            let exhausted = response
                .headers()
                .get("x-ratelimit-remaining")
                .and_then(|v| v.to_str().ok())
                .is_some_and(|v| v == "0");
            if exhausted {
                warn!("[GITHUB] GitHub rate limit exceeded!");
                return Err(GitHubError::RateLimitExceeded);
            }
        }

        if !status.is_success() {
            warn!("[GITHUB] GitHub API error: {}", status);
            return Err(GitHubError::Status { url, status: status.as_u16() });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| GitHubError::Network(format!("Failed to read response: {}", e)))?;

        let releases: Vec<Release> = serde_json::from_slice(&body).map_err(|e| {
            warn!("[GITHUB] Failed to parse JSON: {}", e);
            GitHubError::Decode(e.to_string())
        })?;

        info!(
            "[GITHUB] {} has {} releases ({:?})",
            repository,
            releases.len(),
            start.elapsed()
        );
        Ok(releases)
    }

    /// Fetches raw text content from a URL.
    ///
    /// The body is returned unchanged (a leading BOM is kept). Bodies that
    /// are not valid UTF-8 fail with `Decode`.
    pub async fn fetch_text(&self, url: &str) -> Result<String, GitHubError> {
        debug!("[GITHUB] fetch_text: GET {}", url);
        let start = Instant::now();

        let response = self.client.get(url).send().await.map_err(|e| {
            warn!("[GITHUB] HTTP request failed: {}", e);
            GitHubError::Network(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!("[GITHUB] Failed to fetch content: {}", status);
            return Err(GitHubError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| GitHubError::Network(format!("Failed to read content: {}", e)))?;

        let content = String::from_utf8(body.to_vec()).map_err(|e| {
            warn!("[GITHUB] {} is not valid UTF-8: {}", url, e);
            GitHubError::Decode(format!("{} is not valid UTF-8: {}", url, e))
        })?;

        debug!("[GITHUB] Downloaded {} bytes in {:?}", content.len(), start.elapsed());
        Ok(content)
    }
}

/// Checks that a repository name has the "owner/name" form.
pub fn validate_repository(repository: &str) -> Result<(), GitHubError> {
    match repository.split_once('/') {
        Some((owner, name))
            if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
        {
            Ok(())
        }
        _ => Err(GitHubError::InvalidRepository(repository.to_string())),
    }
}
