//! Asset download URL resolution.

use crate::github::Release;

/// Computes the download URL of `filename` in `release`.
///
/// Drops everything after the last `/` of the release page URL and appends
/// `download/<tag>/<filename>`. The URL is not validated.
#[must_use]
pub fn asset_download_url(release: &Release, filename: &str) -> String {
    let base = match release.html_url.rfind('/') {
        Some(idx) => &release.html_url[..=idx],
        None => "",
    };
    format!("{}download/{}/{}", base, release.tag_name, filename)
}
