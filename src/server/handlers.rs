//! Repository request handlers.

use std::fmt::Write as _;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use tracing::{debug, info};

use crate::addons::{Catalog, FANART_FILENAME, ICON_FILENAME};

use super::{
    state::AppState,
    types::{AddonFile, ApiError},
};

/// Content type of `addons.xml`.
const XML_CONTENT_TYPE: &str = "text/xml; charset=utf-8";

/// Content type of plain-text responses.
const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// GET / - HTML listing of package files.
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let catalog = state.registry.snapshot();
    Html(render_index(&catalog))
}

/// GET /addons.xml - Combined add-on descriptors.
pub async fn addons_xml(State(state): State<AppState>) -> impl IntoResponse {
    let document = state.registry.snapshot().addons_xml();
    ([(header::CONTENT_TYPE, XML_CONTENT_TYPE)], document)
}

/// GET /addons.xml.md5 - Checksum of the combined descriptors.
pub async fn addons_xml_md5(State(state): State<AppState>) -> impl IntoResponse {
    let checksum = state.registry.snapshot().addons_xml_md5();
    ([(header::CONTENT_TYPE, TEXT_CONTENT_TYPE)], checksum)
}

/// GET /{addon_id}/{file} - Changelog text or asset redirect.
pub async fn addon_file(
    State(state): State<AppState>,
    Path((addon_id, file)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let request = AddonFile::parse(&file)
        .ok_or_else(|| ApiError::not_found(format!("unknown file '{}'", file)))?;

    let catalog = state.registry.snapshot();
    let addon = catalog.get(&addon_id)?;

    let asset = match &request {
        AddonFile::Changelog { version } => {
            debug!(
                "[HTTP] changelog for {} (requested {}, current {})",
                addon_id, version, addon.version
            );
            let changelog = addon.changelog();
            return Ok(([(header::CONTENT_TYPE, TEXT_CONTENT_TYPE)], changelog).into_response());
        }
        AddonFile::Icon => ICON_FILENAME,
        AddonFile::Fanart => FANART_FILENAME,
        AddonFile::Package(name) => name.as_str(),
    };

    let url = addon.asset_url(asset)?;
    debug!("[HTTP] {} / {} -> {}", addon_id, file, url);
    Ok((StatusCode::FOUND, [(header::LOCATION, url)]).into_response())
}

/// GET|POST /reload - Resynchronize with upstream.
pub async fn reload(State(state): State<AppState>) -> Result<String, ApiError> {
    info!(
        "[HTTP] Manual resynchronization of {} repositories ({})",
        state.synchronizer.repositories().len(),
        state.synchronizer.mode().as_str()
    );
    let report = state.synchronize().await?;

    let mut body = format!("reloaded {} addons in {:?}\n", report.addons, report.elapsed);
    for (repository, error) in &report.failed {
        let _ = writeln!(body, "skipped {}: {}", repository, error);
    }
    Ok(body)
}

/// GET /health - Ready once a synchronization has succeeded.
pub async fn health(State(state): State<AppState>) -> (StatusCode, &'static str) {
    if state.registry.is_populated() {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not synchronized")
    }
}

/// Renders the package index page.
///
/// Links are relative to `/` and point at `{addon_id}/{file}`, the route
/// that redirects to the package asset.
fn render_index(catalog: &Catalog) -> String {
    let mut html = String::from(
        "<html>\n    <head><title>Index</title></head>\n    <body>\n        <ul>\n",
    );
    for (addon, file) in catalog.package_filenames() {
        let _ = write!(
            html,
            "            <li><a href=\"{}/{}\">{}</a> {} {}",
            escape_html(&addon.id),
            escape_html(file),
            escape_html(file),
            escape_html(addon.display_name()),
            escape_html(&addon.version)
        );
        if let Some(provider) = &addon.provider {
            let _ = write!(html, " by {}", escape_html(provider));
        }
        html.push_str("</li>\n");
    }
    html.push_str("        </ul>\n    </body>\n</html>\n");
    html
}

/// Escapes text for use in HTML content and attribute values.
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&#34;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
