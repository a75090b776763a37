//! Release API payload types.
//!
//! Mirrors the subset of the GitHub `releases` response that the
//! repository needs. Nullable upstream strings decode as `None`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One uploaded file attached to a release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseAsset {
    /// API URL of the asset.
    pub url: String,
    /// Asset identifier.
    pub id: u64,
    /// File name (e.g., "plugin.video.foo-1.0.0.zip").
    pub name: String,
    /// Optional display label.
    #[serde(default)]
    pub label: Option<String>,
    /// MIME type reported by the uploader.
    pub content_type: String,
    /// Upload state ("uploaded", "open").
    pub state: String,
    /// Size in bytes.
    pub size: u64,
    /// Number of downloads.
    pub download_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One published release of a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    /// API URL of the release.
    pub url: String,
    /// Web page of the release; the base for asset download URLs.
    pub html_url: String,
    /// API URL listing the release assets.
    pub assets_url: String,
    /// Upload endpoint template (e.g., ".../assets{?name,label}").
    pub upload_url: String,
    /// Release identifier.
    pub id: u64,
    /// Git tag the release points at.
    pub tag_name: String,
    /// Branch or commit the tag was created from.
    pub target_commitish: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Free-text release notes, served as the changelog.
    #[serde(default)]
    pub body: Option<String>,
    pub draft: bool,
    pub prerelease: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    /// Assets in upstream order.
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

impl Release {
    /// Returns the release notes, or an empty string when there are none.
    #[must_use]
    pub fn body_text(&self) -> &str {
        self.body.as_deref().unwrap_or("")
    }
}
