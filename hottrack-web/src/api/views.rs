//! Response shapes and the shared paginated listing
//!
//! Every list-style route reduces to a `SongQuery` plus an order; the route
//! shape only decides how that query is built.

use std::collections::HashMap;

use hottrack_common::search::SongQuery;
use hottrack_common::Song;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::db::songs::{self, SongOrder};
use crate::error::{ApiError, ApiResult};
use crate::pagination::{calculate_pagination, PAGE_SIZE};

/// Song with its derived URLs
#[derive(Debug, Serialize)]
pub struct SongView {
    #[serde(flatten)]
    pub song: Song,
    pub absolute_url: String,
    pub cover_png_url: Option<String>,
    pub melon_detail_url: String,
    pub youtube_search_url: String,
    pub cover_image_tag: String,
}

impl From<Song> for SongView {
    fn from(song: Song) -> Self {
        Self {
            absolute_url: song.absolute_url(),
            cover_png_url: song.id.map(|id| format!("/hottrack/songs/{}/cover.png", id)),
            melon_detail_url: song.melon_detail_url(),
            youtube_search_url: song.youtube_search_url(),
            cover_image_tag: song.cover_image_tag(),
            song,
        }
    }
}

/// One page of a song listing
#[derive(Debug, Serialize)]
pub struct SongPage {
    /// Search text in effect (trimmed), if any
    pub query: Option<String>,
    pub total_results: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_previous: bool,
    pub songs: Vec<SongView>,
}

/// Parse the `page` parameter (1-indexed, defaults to 1)
pub fn page_param(params: &HashMap<String, String>) -> ApiResult<i64> {
    match params.get("page").map(|p| p.trim()) {
        None | Some("") => Ok(1),
        Some(raw) => raw
            .parse()
            .map_err(|_| ApiError::BadRequest(format!("Invalid page number: {}", raw))),
    }
}

/// Count, clamp the requested page and fetch it
pub async fn paginate(
    db: &SqlitePool,
    query: &SongQuery,
    order: SongOrder,
    requested_page: i64,
) -> ApiResult<SongPage> {
    let total_results = songs::count(db, query).await?;
    let pagination = calculate_pagination(total_results, requested_page);
    let rows = songs::fetch_page(db, query, order, PAGE_SIZE, pagination.offset).await?;

    Ok(SongPage {
        query: query.search.clone(),
        total_results,
        page: pagination.page,
        page_size: PAGE_SIZE,
        total_pages: pagination.total_pages,
        has_next: pagination.has_next(),
        has_previous: pagination.has_previous(),
        songs: rows.into_iter().map(SongView::from).collect(),
    })
}
