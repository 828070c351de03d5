//! Song listing, search and detail
//!
//! Listing honors the free-text `query` parameter over name, artist and
//! album, optionally scoped to one exact release date.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use hottrack_common::search::{extract_search_text, SongQuery};
use serde::Serialize;
use tracing::debug;

use super::views::{page_param, paginate, SongPage, SongView};
use crate::db::songs::{self, SongOrder};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Listing response, optionally scoped to a release date
#[derive(Debug, Serialize)]
pub struct SongListResponse {
    pub release_date: Option<NaiveDate>,
    #[serde(flatten)]
    pub page: SongPage,
}

fn list_query(params: &HashMap<String, String>, release_date: Option<NaiveDate>) -> SongQuery {
    SongQuery {
        release_date,
        search: extract_search_text(params),
        ..SongQuery::default()
    }
}

async fn list(
    state: &AppState,
    params: &HashMap<String, String>,
    release_date: Option<NaiveDate>,
) -> ApiResult<Json<SongListResponse>> {
    let query = list_query(params, release_date);
    let page = paginate(&state.db, &query, SongOrder::Chart, page_param(params)?).await?;
    debug!(
        "Listing songs (release_date={:?}, query={:?}): {} results",
        release_date, query.search, page.total_results
    );
    Ok(Json(SongListResponse { release_date, page }))
}

/// GET /hottrack/songs?query=&page=
pub async fn list_songs(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Json<SongListResponse>> {
    list(&state, &params, None).await
}

/// GET /hottrack/:release_date?query=&page=
pub async fn list_songs_by_date(
    State(state): State<AppState>,
    Path(release_date): Path<NaiveDate>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Json<SongListResponse>> {
    list(&state, &params, Some(release_date)).await
}

/// GET /hottrack/songs/:id
pub async fn song_detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<SongView>> {
    let song = songs::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No song with id {}", id)))?;
    Ok(Json(song.into()))
}

/// GET /hottrack/melon/:melon_uid
pub async fn song_detail_by_melon_uid(
    State(state): State<AppState>,
    Path(melon_uid): Path<String>,
) -> ApiResult<Json<SongView>> {
    let song = songs::find_by_melon_uid(&state.db, &melon_uid)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No song with melon_uid {}", melon_uid)))?;
    Ok(Json(song.into()))
}
