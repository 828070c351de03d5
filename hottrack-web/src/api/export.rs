//! Whole-chart download as CSV or spreadsheet

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use hottrack_common::export::{export_as, ExportFormat};
use tracing::info;

use crate::db::songs;
use crate::error::ApiResult;
use crate::AppState;

/// GET /hottrack/export/:format (csv, xlsx, xls)
pub async fn export_songs(
    State(state): State<AppState>,
    Path(format): Path<String>,
) -> ApiResult<Response> {
    // Reject unknown formats before touching the database
    let format: ExportFormat = format.parse()?;

    let all_songs = songs::fetch_all(&state.db).await?;
    let file = export_as(&all_songs, format)?;
    info!("Exported {} songs as {}", all_songs.len(), format);

    let disposition = format!("attachment; filename=\"{}\"", file.filename);
    Ok((
        [
            (header::CONTENT_TYPE, file.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.bytes,
    )
        .into_response())
}
