//! Request classification and error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::addons::{AddonError, SyncError, FANART_FILENAME, ICON_FILENAME, PACKAGE_SUFFIX};

/// Prefix of changelog file names.
const CHANGELOG_PREFIX: &str = "changelog-";

/// Suffix of changelog file names.
const CHANGELOG_SUFFIX: &str = ".txt";

/// A file requested under `/{addon_id}/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddonFile {
    /// `changelog-{version}.txt`; the version is not used for filtering.
    Changelog { version: String },
    /// `icon.png`.
    Icon,
    /// `fanart.jpg`.
    Fanart,
    /// `{file}.zip`.
    Package(String),
}

impl AddonFile {
    /// Classifies a requested file name.
    #[must_use]
    pub fn parse(file: &str) -> Option<Self> {
        if file == ICON_FILENAME {
            return Some(Self::Icon);
        }
        if file == FANART_FILENAME {
            return Some(Self::Fanart);
        }

        if let Some(version) = file
            .strip_prefix(CHANGELOG_PREFIX)
            .and_then(|rest| rest.strip_suffix(CHANGELOG_SUFFIX))
            .filter(|v| !v.is_empty())
        {
            return Some(Self::Changelog {
                version: version.to_string(),
            });
        }

        file.strip_suffix(PACKAGE_SUFFIX)
            .filter(|base| !base.is_empty())
            .map(|_| Self::Package(file.to_string()))
    }
}

/// Error response with a plain-text body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    /// Creates a new error response.
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Creates a 404 response.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }
}

impl From<AddonError> for ApiError {
    fn from(e: AddonError) -> Self {
        match e {
            AddonError::NotFound(_) | AddonError::NoReleases(_) => {
                debug!("[HTTP] {}", e);
                Self::not_found(e.to_string())
            }
            other => Self::new(StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        }
    }
}

impl From<SyncError> for ApiError {
    fn from(e: SyncError) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}
