//! Date-based archive browsing
//!
//! Year, month, day, ISO week and today listings, the archive index and the
//! date-scoped detail lookup. Listings are newest first and paginated.
//! Songs released after the real current date are never listed, and a
//! listing with no songs is a 404.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use hottrack_common::archive::{date_list, list_for_period, Granularity, Period};
use hottrack_common::search::SongQuery;
use serde::Serialize;
use tracing::debug;

use super::views::{page_param, paginate, SongPage, SongView};
use crate::db::songs::{self, SongOrder};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Query parameter for today's date override (debug mode only)
pub const FAKE_TODAY_PARAM: &str = "fake-today";

/// Archive listing response
#[derive(Debug, Serialize)]
pub struct ArchiveResponse {
    /// Period being listed; absent for the archive index
    pub period: Option<Period>,
    /// Granularity of `date_list`
    pub date_list_period: Option<Granularity>,
    /// Distinct sub-periods that contain songs
    pub date_list: Vec<Period>,
    #[serde(flatten)]
    pub page: SongPage,
}

fn invalid_date(what: &str) -> ApiError {
    ApiError::NotFound(format!("Invalid date: {}", what))
}

/// Real current date; the `fake-today` override never moves this cap
fn release_cutoff(state: &AppState) -> NaiveDate {
    state.today.today_or_override(None)
}

async fn period_listing(
    state: &AppState,
    params: &HashMap<String, String>,
    period: Period,
    date_list_period: Option<Granularity>,
) -> ApiResult<Json<ArchiveResponse>> {
    if period.bounds().is_none() {
        return Err(invalid_date(&period.to_string()));
    }

    let query = list_for_period(period).with_released_until(release_cutoff(state));
    let page = paginate(&state.db, &query, SongOrder::Newest, page_param(params)?).await?;
    if page.total_results == 0 {
        return Err(ApiError::NotFound(format!("No songs released in {}", period)));
    }

    let date_list = match date_list_period {
        Some(granularity) => {
            let dates = songs::release_dates(&state.db, &query).await?;
            date_list(dates, granularity)
        }
        None => Vec::new(),
    };

    debug!("Archive {}: {} songs", period, page.total_results);
    Ok(Json(ArchiveResponse {
        period: Some(period),
        date_list_period,
        date_list,
        page,
    }))
}

/// GET /hottrack/archives?period=year|month|day|week&page=
pub async fn archive_index(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Json<ArchiveResponse>> {
    let granularity = match params.get("period").map(|p| p.trim()) {
        None | Some("") => Granularity::default(),
        Some(raw) => raw.parse::<Granularity>()?,
    };

    let query = SongQuery::new().with_released_until(release_cutoff(&state));
    let page = paginate(&state.db, &query, SongOrder::Newest, page_param(&params)?).await?;
    if page.total_results == 0 {
        return Err(ApiError::NotFound("No songs released yet".to_string()));
    }
    let dates = songs::release_dates(&state.db, &query).await?;

    Ok(Json(ArchiveResponse {
        period: None,
        date_list_period: Some(granularity),
        date_list: date_list(dates, granularity),
        page,
    }))
}

/// GET /hottrack/archives/:year
pub async fn year_archive(
    State(state): State<AppState>,
    Path(year): Path<i32>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Json<ArchiveResponse>> {
    let period = Period::year(year).ok_or_else(|| invalid_date(&year.to_string()))?;
    period_listing(&state, &params, period, Some(Granularity::Month)).await
}

/// GET /hottrack/archives/:year/:month
pub async fn month_archive(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, u32)>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Json<ArchiveResponse>> {
    let period =
        Period::month(year, month).ok_or_else(|| invalid_date(&format!("{}/{}", year, month)))?;
    period_listing(&state, &params, period, Some(Granularity::Day)).await
}

/// GET /hottrack/archives/:year/:month/:day
pub async fn day_archive(
    State(state): State<AppState>,
    Path((year, month, day)): Path<(i32, u32, u32)>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Json<ArchiveResponse>> {
    let period = Period::day(year, month, day)
        .ok_or_else(|| invalid_date(&format!("{}/{}/{}", year, month, day)))?;
    period_listing(&state, &params, period, None).await
}

/// GET /hottrack/archives/:year/week/:week (ISO week numbering)
pub async fn week_archive(
    State(state): State<AppState>,
    Path((year, week)): Path<(i32, u32)>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Json<ArchiveResponse>> {
    let period =
        Period::week(year, week).ok_or_else(|| invalid_date(&format!("{}/week/{}", year, week)))?;
    period_listing(&state, &params, period, None).await
}

/// GET /hottrack/archives/today?fake-today=YYYY-M-D
pub async fn today_archive(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Json<ArchiveResponse>> {
    let today = state
        .today
        .today_or_override(params.get(FAKE_TODAY_PARAM).map(String::as_str));
    period_listing(&state, &params, Period::Day { date: today }, None).await
}

/// GET /hottrack/archives/:year/:month/:day/:slug
pub async fn date_detail(
    State(state): State<AppState>,
    Path((year, month, day, slug)): Path<(i32, u32, u32, String)>,
) -> ApiResult<Json<SongView>> {
    let date = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| invalid_date(&format!("{}/{}/{}", year, month, day)))?;
    if date > release_cutoff(&state) {
        return Err(ApiError::NotFound(format!("No song {} released on {}", slug, date)));
    }
    let song = songs::find_by_date_and_slug(&state.db, date, &slug)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No song {} released on {}", slug, date)))?;
    Ok(Json(song.into()))
}
