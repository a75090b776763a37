//! Integration tests for synchronization against a mock GitHub.
//!
//! These tests verify:
//! - Descriptor extraction from the newest release
//! - All-or-nothing publication
//! - Partial mode
//! - Upstream failure mapping

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod helpers;

use helpers::mock_github::{descriptor, MockGitHub, MockRepo};
use pretty_assertions::assert_eq;
use xbmc_release_repo::addons::{AddonError, Registry, SyncError, SyncMode};
use std::sync::Arc;
use xbmc_release_repo::github::{GitHubError, ReleaseClient};

async fn mock_with_two_repos() -> MockGitHub {
    let github = MockGitHub::start().await;
    github.set_repo(
        "steeve/xbmctorrent",
        MockRepo::new(
            "plugin.video.xbmctorrent",
            &[("v0.4.1", "fixed streaming\n"), ("v0.4.0", "first\n")],
            &["plugin.video.xbmctorrent-0.4.1.zip", "addon.xml", "icon.png"],
        ),
    );
    github.set_repo(
        "steeve/pulsar",
        MockRepo::new("plugin.video.pulsar", &[("v1.0.0", "hello")], &["plugin.video.pulsar-1.0.0.zip"]),
    );
    github
}

#[tokio::test]
async fn test_fetch_addon_builds_record() {
    let github = mock_with_two_repos().await;
    let sync = github.synchronizer(&["steeve/xbmctorrent"], SyncMode::AllOrNothing);

    let addon = sync.fetch_addon("steeve/xbmctorrent").await.unwrap();
    assert_eq!(addon.id, "plugin.video.xbmctorrent");
    assert_eq!(addon.version, "1.0.0");
    assert_eq!(addon.provider.as_deref(), Some("tests"));
    assert_eq!(addon.releases.len(), 2);
    assert_eq!(addon.current_release().unwrap().tag_name, "v0.4.1");
    assert!(!addon.xml_body.contains("<?xml"));
    assert!(addon.xml_body.starts_with("<addon id=\"plugin.video.xbmctorrent\""));
    assert!(addon.xml_body.ends_with("</addon>\n"));
    assert_eq!(addon.changelog(), "fixed streaming\nfirst\n");
}

#[tokio::test]
async fn test_synchronize_publishes_all_addons() {
    let github = mock_with_two_repos().await;
    let sync = github.synchronizer(&["steeve/xbmctorrent", "steeve/pulsar"], SyncMode::AllOrNothing);
    let registry = Registry::new();

    let report = sync.synchronize(&registry).await.unwrap();
    assert_eq!(report.addons, 2);
    assert!(report.failed.is_empty());

    let catalog = registry.snapshot();
    assert_eq!(catalog.ids(), vec!["plugin.video.pulsar", "plugin.video.xbmctorrent"]);
    let packages: Vec<(&str, &str)> = catalog
        .package_filenames()
        .into_iter()
        .map(|(addon, file)| (addon.id.as_str(), file))
        .collect();
    assert_eq!(
        packages,
        vec![
            ("plugin.video.pulsar", "plugin.video.pulsar-1.0.0.zip"),
            ("plugin.video.xbmctorrent", "plugin.video.xbmctorrent-0.4.1.zip")
        ]
    );
}

#[tokio::test]
async fn test_failed_repository_keeps_previous_catalog() {
    let github = mock_with_two_repos().await;
    let sync = github.synchronizer(&["steeve/xbmctorrent", "steeve/pulsar"], SyncMode::AllOrNothing);
    let registry = Registry::new();
    sync.synchronize(&registry).await.unwrap();
    let before = registry.snapshot();

    // Second repository now fails; the new xbmctorrent release must not leak in.
    github.update_repo("steeve/xbmctorrent", |repo| {
        repo.releases.insert(0, ("v0.5.0".to_string(), "new".to_string()));
    });
    github.update_repo("steeve/pulsar", |repo| repo.fail_listing = true);

    let err = sync.synchronize(&registry).await.unwrap_err();
    assert!(matches!(
        err,
        SyncError::Repository { ref repository, source: AddonError::GitHub(GitHubError::Status { status: 500, .. }) }
            if repository == "steeve/pulsar"
    ));

    let after = registry.snapshot();
    assert!(Arc::ptr_eq(&before, &after));
    assert_eq!(
        after
            .get("plugin.video.xbmctorrent")
            .unwrap()
            .current_release()
            .unwrap()
            .tag_name,
        "v0.4.1"
    );
    assert!(after.get("plugin.video.pulsar").is_ok());
}

#[tokio::test]
async fn test_failure_before_first_sync_leaves_registry_empty() {
    let github = mock_with_two_repos().await;
    let sync = github.synchronizer(&["steeve/xbmctorrent", "steeve/missing"], SyncMode::AllOrNothing);
    let registry = Registry::new();

    let err = sync.synchronize(&registry).await.unwrap_err();
    assert!(matches!(
        err,
        SyncError::Repository { source: AddonError::GitHub(GitHubError::RepositoryNotFound(_)), .. }
    ));
    assert!(!registry.is_populated());
    assert!(registry.snapshot().get("plugin.video.xbmctorrent").is_err());
}

#[tokio::test]
async fn test_partial_mode_skips_failures() {
    let github = mock_with_two_repos().await;
    github.update_repo("steeve/pulsar", |repo| repo.fail_descriptor = true);
    let sync = github.synchronizer(&["steeve/xbmctorrent", "steeve/pulsar"], SyncMode::Partial);
    let registry = Registry::new();

    let report = sync.synchronize(&registry).await.unwrap();
    assert_eq!(report.addons, 1);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, "steeve/pulsar");
    assert_eq!(registry.snapshot().ids(), vec!["plugin.video.xbmctorrent"]);
}

#[tokio::test]
async fn test_empty_release_set() {
    let github = MockGitHub::start().await;
    github.set_repo("o/empty", MockRepo::new("plugin.empty", &[], &[]));
    let sync = github.synchronizer(&["o/empty"], SyncMode::AllOrNothing);

    let err = sync.fetch_addon("o/empty").await.unwrap_err();
    assert!(matches!(err, AddonError::EmptyReleaseSet(ref repo) if repo == "o/empty"));
}

#[tokio::test]
async fn test_malformed_descriptor() {
    let github = MockGitHub::start().await;
    let mut repo = MockRepo::new("plugin.x", &[("v1", "")], &[]);
    repo.descriptor = b"<?xml version=\"1.0\"?>\n<html>oops</html>".to_vec();
    github.set_repo("o/x", repo);
    let sync = github.synchronizer(&["o/x"], SyncMode::AllOrNothing);

    let err = sync.fetch_addon("o/x").await.unwrap_err();
    assert!(matches!(err, AddonError::Descriptor(_)));
}

#[tokio::test]
async fn test_descriptor_version_comes_from_markup() {
    let github = MockGitHub::start().await;
    let mut repo = MockRepo::new("plugin.x", &[("v9", "")], &[]);
    repo.descriptor = descriptor("plugin.x", "9.9.9").into_bytes();
    github.set_repo("o/x", repo);
    let sync = github.synchronizer(&["o/x"], SyncMode::AllOrNothing);

    let addon = sync.fetch_addon("o/x").await.unwrap();
    assert_eq!(addon.version, "9.9.9");
}

#[tokio::test]
async fn test_rate_limited_listing_keeps_previous_catalog() {
    let github = mock_with_two_repos().await;
    let sync = github.synchronizer(&["steeve/xbmctorrent", "steeve/pulsar"], SyncMode::AllOrNothing);
    let registry = Registry::new();
    sync.synchronize(&registry).await.unwrap();
    let before = registry.snapshot();

    github.update_repo("steeve/pulsar", |repo| repo.rate_limited = true);

    let err = sync.synchronize(&registry).await.unwrap_err();
    assert!(matches!(
        err,
        SyncError::Repository { ref repository, source: AddonError::GitHub(GitHubError::RateLimitExceeded) }
            if repository == "steeve/pulsar"
    ));
    assert!(Arc::ptr_eq(&before, &registry.snapshot()));
}

#[tokio::test]
async fn test_listing_that_is_not_json_keeps_previous_catalog() {
    let github = mock_with_two_repos().await;
    let sync = github.synchronizer(&["steeve/xbmctorrent", "steeve/pulsar"], SyncMode::AllOrNothing);
    let registry = Registry::new();
    sync.synchronize(&registry).await.unwrap();
    let before = registry.snapshot();

    github.update_repo("steeve/xbmctorrent", |repo| repo.malformed_listing = true);

    let err = sync.synchronize(&registry).await.unwrap_err();
    assert!(matches!(
        err,
        SyncError::Repository { ref repository, source: AddonError::GitHub(GitHubError::Decode(_)) }
            if repository == "steeve/xbmctorrent"
    ));
    assert!(Arc::ptr_eq(&before, &registry.snapshot()));
}

#[tokio::test]
async fn test_descriptor_with_invalid_utf8_is_rejected() {
    let github = MockGitHub::start().await;
    let mut repo = MockRepo::new("plugin.x", &[("v1", "")], &[]);
    repo.descriptor = b"<addon id=\"plugin.x\" version=\"1\" name=\"caf\xe9\"/>".to_vec();
    github.set_repo("o/x", repo);
    let sync = github.synchronizer(&["o/x"], SyncMode::AllOrNothing);

    let err = sync.fetch_addon("o/x").await.unwrap_err();
    assert!(matches!(err, AddonError::GitHub(GitHubError::Decode(_))));
}

#[tokio::test]
async fn test_fetch_text_keeps_bytes_verbatim() {
    let github = MockGitHub::start().await;
    let raw = "\u{feff}<addon id=\"plugin.x\" version=\"1\" name=\"caf\u{e9}\"/>";
    let mut repo = MockRepo::new("plugin.x", &[("v1", "")], &[]);
    repo.descriptor = raw.as_bytes().to_vec();
    github.set_repo("o/x", repo);

    let client = ReleaseClient::new(github.client_options()).unwrap();
    let text = client
        .fetch_text(&github.download_url("o/x", "v1", "addon.xml"))
        .await
        .unwrap();
    assert_eq!(text, raw);
}
