//! Composited cover PNG for a song

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::warn;

use crate::cover::clamp_size;
use crate::db::songs;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CoverQuery {
    /// Canvas edge in pixels, clamped server-side
    pub size: Option<u32>,
}

/// GET /hottrack/songs/:id/cover.png?size=
pub async fn cover_png(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<CoverQuery>,
) -> ApiResult<Response> {
    let song = songs::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No song with id {}", id)))?;

    let size = clamp_size(query.size);
    let png = state
        .compositor
        .compose(&song.cover_url, &song.artist_name, size)
        .await
        .map_err(|e| {
            warn!("Cover for song {} failed: {}", id, e);
            ApiError::Upstream(e.to_string())
        })?;

    Ok(([(header::CONTENT_TYPE, "image/png")], png).into_response())
}
