//! Repository route definitions.

use axum::{routing::get, Router};

use super::{handlers, state::AppState};

/// Creates the repository router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/addons.xml", get(handlers::addons_xml))
        .route("/addons.xml.md5", get(handlers::addons_xml_md5))
        .route("/reload", get(handlers::reload).post(handlers::reload))
        .route("/health", get(handlers::health))
        // changelog-{version}.txt, icon.png, fanart.jpg, {file}.zip
        .route("/{addon_id}/{file}", get(handlers::addon_file))
        .with_state(state)
}
