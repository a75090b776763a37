//! GitHub release source.
//!
//! - **types**: Release API payloads (`Release`, `ReleaseAsset`)
//! - **client**: HTTP client for release listings and raw assets

mod client;
mod types;

use thiserror::Error;

pub use client::{
    validate_repository, ClientOptions, ReleaseClient, DEFAULT_API_BASE, DEFAULT_USER_AGENT,
};
pub use types::{Release, ReleaseAsset};

#[cfg(test)]
pub(crate) use types::fixtures;

/// GitHub API error types.
#[derive(Debug, Clone, Error)]
pub enum GitHubError {
    /// Repository name is not in "owner/name" form.
    #[error("Invalid repository name '{0}' (expected owner/name)")]
    InvalidRepository(String),

    /// Network error during an API call.
    #[error("Network error: {0}")]
    Network(String),

    /// Upstream answered with a non-success status.
    #[error("GET {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// Repository not found.
    #[error("Repository '{0}' not found")]
    RepositoryNotFound(String),

    /// GitHub API rate limit exceeded.
    #[error("GitHub API rate limit exceeded")]
    RateLimitExceeded,

    /// Response body could not be decoded.
    #[error("Failed to decode response: {0}")]
    Decode(String),
}
