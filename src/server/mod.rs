//! HTTP surface of the add-on repository.
//!
//! ## Routes
//!
//! | Path | Response |
//! |---|---|
//! | `GET /` | HTML list of package files |
//! | `GET /addons.xml` | Combined add-on descriptors |
//! | `GET /addons.xml.md5` | MD5 of `addons.xml` |
//! | `GET /{addon_id}/changelog-{version}.txt` | Concatenated release notes |
//! | `GET /{addon_id}/icon.png` | 302 to the icon asset |
//! | `GET /{addon_id}/fanart.jpg` | 302 to the fanart asset |
//! | `GET /{addon_id}/{file}.zip` | 302 to the package asset |
//! | `GET/POST /reload` | Resynchronize with GitHub |
//! | `GET /health` | 200 once synchronized, 503 before |

pub mod handlers;
pub mod router;
pub mod server;
pub mod state;
pub mod types;

pub use router::create_router;
pub use server::RepoServer;
pub use state::AppState;
pub use types::{AddonFile, ApiError};
