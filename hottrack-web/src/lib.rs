//! hottrack-web library - chart listing, search, archives, export and covers

use std::sync::Arc;

use axum::Router;
use hottrack_common::archive::TodayResolver;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod cover;
pub mod db;
pub mod error;
pub mod pagination;

pub use crate::error::{ApiError, ApiResult};
use crate::cover::CoverCompositor;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Renders cover PNGs
    pub compositor: Arc<dyn CoverCompositor>,
    /// Resolves "today" for the today archive (honors `fake-today` in debug mode)
    pub today: TodayResolver,
}

impl AppState {
    pub fn new(db: SqlitePool, compositor: Arc<dyn CoverCompositor>, debug: bool) -> Self {
        Self {
            db,
            compositor,
            today: TodayResolver::new(debug),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    let hottrack = Router::new()
        .route("/", get(api::serve_index))
        .route("/static/app.js", get(api::serve_app_js))
        .route("/songs", get(api::list_songs))
        .route("/songs/:id", get(api::song_detail))
        .route("/songs/:id/cover.png", get(api::cover_png))
        .route("/melon/:melon_uid", get(api::song_detail_by_melon_uid))
        .route("/export/:format", get(api::export_songs))
        .route("/archives", get(api::archive_index))
        .route("/archives/today", get(api::today_archive))
        .route("/archives/:year", get(api::year_archive))
        .route("/archives/:year/week/:week", get(api::week_archive))
        .route("/archives/:year/:month", get(api::month_archive))
        .route("/archives/:year/:month/:day", get(api::day_archive))
        .route("/archives/:year/:month/:day/:slug", get(api::date_detail))
        .route("/:release_date", get(api::list_songs_by_date));

    Router::new()
        .nest("/hottrack", hottrack)
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
