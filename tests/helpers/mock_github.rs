//! In-process stand-in for the GitHub release API.
//!
//! Serves `/repos/{owner}/{name}/releases` and the release download URLs
//! derived from the `html_url` it hands out, so the whole synchronization
//! path runs against 127.0.0.1.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

use xbmc_release_repo::addons::{Registry, SyncMode, Synchronizer};
use xbmc_release_repo::github::{ClientOptions, ReleaseClient};
use xbmc_release_repo::server::{AppState, RepoServer};

/// How a mock repository answers.
#[derive(Debug, Clone, Default)]
pub struct MockRepo {
    /// Releases as (tag, body), newest first.
    pub releases: Vec<(String, String)>,
    /// Asset names attached to the newest release.
    pub assets: Vec<String>,
    /// `addon.xml` bytes served for every release of this repository.
    pub descriptor: Vec<u8>,
    /// Answer the release listing with HTTP 500.
    pub fail_listing: bool,
    /// Answer the release listing with an exhausted rate limit (HTTP 403).
    pub rate_limited: bool,
    /// Answer the release listing with a body that is not JSON.
    pub malformed_listing: bool,
    /// Answer the descriptor download with HTTP 404.
    pub fail_descriptor: bool,
}

impl MockRepo {
    /// A repository whose descriptor declares `addon_id`.
    pub fn new(addon_id: &str, releases: &[(&str, &str)], assets: &[&str]) -> Self {
        Self {
            releases: releases
                .iter()
                .map(|(tag, body)| ((*tag).to_string(), (*body).to_string()))
                .collect(),
            assets: assets.iter().map(|a| (*a).to_string()).collect(),
            descriptor: descriptor(addon_id, "1.0.0").into_bytes(),
            ..Self::default()
        }
    }
}

/// A typical `addon.xml` for `id`.
pub fn descriptor(id: &str, version: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
         <addon id=\"{id}\" name=\"{id}\" version=\"{version}\" provider-name=\"tests\">\n  \
         <extension point=\"xbmc.python.pluginsource\" library=\"default.py\"/>\n\
         </addon>\n"
    )
}

#[derive(Default)]
struct MockState {
    base_url: String,
    repos: HashMap<String, MockRepo>,
}

/// Handle to a running mock GitHub.
#[derive(Clone)]
pub struct MockGitHub {
    state: Arc<Mutex<MockState>>,
    addr: SocketAddr,
}

impl MockGitHub {
    /// Starts the mock on an ephemeral port.
    pub async fn start() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let state = Arc::new(Mutex::new(MockState {
            base_url: format!("http://{}", addr),
            repos: HashMap::new(),
        }));

        let router = Router::new()
            .route("/repos/{owner}/{name}/releases", get(list_releases))
            .route(
                "/{owner}/{name}/releases/download/{tag}/{file}",
                get(download_asset),
            )
            .with_state(Arc::clone(&state));

        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self { state, addr }
    }

    /// Base URL of the mock.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Adds or replaces a repository.
    pub fn set_repo(&self, repository: &str, repo: MockRepo) {
        self.state
            .lock()
            .unwrap()
            .repos
            .insert(repository.to_string(), repo);
    }

    /// Mutates a repository in place.
    pub fn update_repo(&self, repository: &str, f: impl FnOnce(&mut MockRepo)) {
        let mut state = self.state.lock().unwrap();
        f(state.repos.get_mut(repository).expect("unknown mock repository"));
    }

    /// Client options pointing at this mock.
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            api_base: self.url(),
            timeout: Duration::from_secs(5),
            ..ClientOptions::default()
        }
    }

    /// Builds a synchronizer over `repositories`.
    pub fn synchronizer(&self, repositories: &[&str], mode: SyncMode) -> Synchronizer {
        let client = ReleaseClient::new(self.client_options()).unwrap();
        Synchronizer::new(
            client,
            repositories.iter().map(|r| (*r).to_string()).collect(),
            mode,
        )
    }

    /// Starts a repository server backed by this mock.
    pub async fn repo_server(&self, repositories: &[&str], mode: SyncMode) -> RepoServer {
        self.refreshing_repo_server(repositories, mode, None).await
    }

    /// Starts a repository server that resynchronizes every `refresh_interval`.
    pub async fn refreshing_repo_server(
        &self,
        repositories: &[&str],
        mode: SyncMode,
        refresh_interval: Option<Duration>,
    ) -> RepoServer {
        let state = AppState::new(
            Arc::new(Registry::new()),
            Arc::new(self.synchronizer(repositories, mode)),
        );
        RepoServer::start(state, "127.0.0.1:0".parse().unwrap(), refresh_interval)
            .await
            .unwrap()
    }

    /// Download URL the mock serves for `file` of `repository` at `tag`.
    pub fn download_url(&self, repository: &str, tag: &str, file: &str) -> String {
        format!("{}/{}/releases/download/{}/{}", self.url(), repository, tag, file)
    }
}

/// HTTP client that reports redirects instead of following them.
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

async fn list_releases(
    State(state): State<Arc<Mutex<MockState>>>,
    Path((owner, name)): Path<(String, String)>,
) -> Response {
    let state = state.lock().unwrap();
    let repository = format!("{}/{}", owner, name);

    let Some(repo) = state.repos.get(&repository) else {
        return (StatusCode::NOT_FOUND, Json(json!({"message": "Not Found"}))).into_response();
    };
    if repo.fail_listing {
        return (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response();
    }
    if repo.rate_limited {
        return (
            StatusCode::FORBIDDEN,
            [("x-ratelimit-limit", "60"), ("x-ratelimit-remaining", "0")],
            Json(json!({"message": "API rate limit exceeded"})),
        )
            .into_response();
    }
    if repo.malformed_listing {
        return (StatusCode::OK, "<html>maintenance</html>").into_response();
    }

    let releases: Vec<Value> = repo
        .releases
        .iter()
        .enumerate()
        .map(|(i, (tag, body))| {
            let assets: Vec<Value> = if i == 0 {
                repo.assets
                    .iter()
                    .enumerate()
                    .map(|(j, asset)| {
                        json!({
                            "url": format!("{}/repos/{}/releases/assets/{}", state.base_url, repository, j),
                            "id": j,
                            "name": asset,
                            "label": null,
                            "content_type": "application/octet-stream",
                            "state": "uploaded",
                            "size": 1024,
                            "download_count": 7,
                            "created_at": "2013-11-01T20:42:32Z",
                            "updated_at": "2013-11-01T20:47:38Z"
                        })
                    })
                    .collect()
            } else {
                Vec::new()
            };

            json!({
                "url": format!("{}/repos/{}/releases/{}", state.base_url, repository, i),
                "html_url": format!("{}/{}/releases/{}", state.base_url, repository, tag),
                "assets_url": format!("{}/repos/{}/releases/{}/assets", state.base_url, repository, i),
                "upload_url": format!("{}/repos/{}/releases/{}/assets{{?name}}", state.base_url, repository, i),
                "id": i,
                "tag_name": tag,
                "target_commitish": "master",
                "name": tag,
                "body": body,
                "draft": false,
                "prerelease": false,
                "created_at": "2013-02-27T19:35:32Z",
                "published_at": "2013-02-27T19:35:32Z",
                "assets": assets
            })
        })
        .collect();

    Json(Value::Array(releases)).into_response()
}

async fn download_asset(
    State(state): State<Arc<Mutex<MockState>>>,
    Path((owner, name, _tag, file)): Path<(String, String, String, String)>,
) -> Response {
    let state = state.lock().unwrap();
    let repository = format!("{}/{}", owner, name);

    match state.repos.get(&repository) {
        Some(repo) if file == "addon.xml" && !repo.fail_descriptor => {
            repo.descriptor.clone().into_response()
        }
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}
