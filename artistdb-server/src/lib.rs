//! artistdb-server library
//!
//! Serves the parsed artist dataset over HTTP and keeps it in sync with the
//! input file.

use std::path::PathBuf;
use std::sync::Arc;

use artistdb_common::db::ArtistStore;
use axum::Router;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

pub mod api;
pub mod error;
pub mod reload;
pub mod watcher;

pub use reload::{ReloadStatus, Reloader};
pub use watcher::{spawn_reload_task, FileEvent, FileWatcher};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub store: ArtistStore,
    pub reloader: Arc<Reloader>,
    /// Local avatar files, served under `/avatar`
    pub avatar_dir: PathBuf,
}

impl AppState {
    pub fn new(store: ArtistStore, reloader: Arc<Reloader>, avatar_dir: impl Into<PathBuf>) -> Self {
        Self { store, reloader, avatar_dir: avatar_dir.into() }
    }
}

/// Build application router
///
/// `/health` and `/avatar/...` take precedence over artist names.
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    let avatars = ServeDir::new(&state.avatar_dir);

    Router::new()
        .merge(api::health_routes())
        .route("/:name", get(api::get_artist))
        .nest_service(artistdb_common::artist::AVATAR_MOUNT, avatars)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
