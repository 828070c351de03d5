//! Integration tests for hottrack-web API endpoints
//!
//! Tests cover:
//! - Health endpoint
//! - Chart listing, free-text search and date-scoped listing
//! - Song detail by id, by melon uid and by date + slug
//! - CSV / spreadsheet export and unknown-format rejection
//! - Year, month, day, week and today archives
//! - Composited cover PNG route
//! - Pagination bounds

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
};
use hottrack_common::Song;
use hottrack_web::cover::{CoverCompositor, CoverError};
use hottrack_web::db::{init_memory_database, songs};
use hottrack_web::{build_router, AppState};
use serde_json::Value;
use sqlx::SqlitePool;
use tower::util::ServiceExt; // for `oneshot` method

const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

/// Test compositor: PNG signature followed by `label|size`
struct StubCompositor;

#[async_trait]
impl CoverCompositor for StubCompositor {
    async fn compose(&self, _image_url: &str, label: &str, size: u32) -> Result<Vec<u8>, CoverError> {
        let mut png = PNG_MAGIC.to_vec();
        png.extend_from_slice(format!("{}|{}", label, size).as_bytes());
        Ok(png)
    }
}

/// Test compositor whose upstream fetch always fails
struct FailingCompositor;

#[async_trait]
impl CoverCompositor for FailingCompositor {
    async fn compose(&self, image_url: &str, _label: &str, _size: u32) -> Result<Vec<u8>, CoverError> {
        Err(CoverError::Network(format!("{} unreachable", image_url)))
    }
}

fn song(uid: &str, rank: u16, name: &str, slug: &str, artist: &str, album: &str, date: &str) -> Song {
    Song {
        id: None,
        melon_uid: uid.to_string(),
        slug: slug.to_string(),
        rank,
        album_name: album.to_string(),
        name: name.to_string(),
        artist_name: artist.to_string(),
        cover_url: format!("https://cdn.example.com/{}.jpg", uid),
        lyrics: format!("lyrics of {}", name),
        genre: "Dance".to_string(),
        release_date: date.parse().unwrap(),
        like_count: 1000 + u32::from(rank),
    }
}

/// Test helper: in-memory database seeded with five chart entries (ids 1..=5)
async fn setup_test_db() -> SqlitePool {
    let db = init_memory_database().await.expect("Should create database");
    let chart = [
        song("100", 1, "Seven (feat. Latto)", "seven-feat-latto", "정국", "Seven", "2023-07-14"),
        song("101", 2, "Super Shy", "super-shy", "NewJeans", "NewJeans 'Get Up'", "2023-07-07"),
        song("102", 3, "ETA", "eta", "NewJeans", "NewJeans 'Get Up'", "2023-07-07"),
        song("103", 4, "I AM", "i-am", "IVE (아이브)", "I've IVE", "2023-04-10"),
        song("104", 5, "Ditto", "ditto", "NewJeans", "Ditto", "2022-12-19"),
    ];
    for s in &chart {
        assert!(songs::insert_if_absent(&db, s).await.unwrap());
    }
    db
}

/// Test helper: add one song released on the real current date
async fn seed_released_today(db: &SqlitePool) -> String {
    let today = chrono::Local::now().date_naive().format("%Y-%m-%d").to_string();
    let s = song("900", 6, "Fresh Drop", "fresh-drop", "Various", "Singles", &today);
    assert!(songs::insert_if_absent(db, &s).await.unwrap());
    today
}

/// Test helper: Create app with a stub compositor
fn setup_app(db: SqlitePool, debug: bool) -> axum::Router {
    build_router(AppState::new(db, Arc::new(StubCompositor), debug))
}

async fn get(app: axum::Router, uri: &str) -> Response {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body")
        .to_vec()
}

/// Test helper: Extract JSON body from response
async fn extract_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).expect("Should parse JSON")
}

fn names(body: &Value) -> Vec<String> {
    body["songs"]
        .as_array()
        .expect("songs array")
        .iter()
        .map(|s| s["name"].as_str().unwrap().to_string())
        .collect()
}

fn header_str(response: &Response, name: header::HeaderName) -> String {
    response
        .headers()
        .get(name)
        .map(|v| v.to_str().unwrap().to_string())
        .unwrap_or_default()
}

// =============================================================================
// Health and UI
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = setup_app(setup_test_db().await, false);
    let response = get(app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "hottrack-web");
    assert_eq!(body["debug"], false);
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_index_page_served() {
    let app = setup_app(setup_test_db().await, false);
    let response = get(app, "/hottrack").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(header_str(&response, header::CONTENT_TYPE).starts_with("text/html"));

    let html = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(html.contains("/hottrack/static/app.js"));
}

// =============================================================================
// Listing and search
// =============================================================================

#[tokio::test]
async fn test_list_all_in_chart_order() {
    let app = setup_app(setup_test_db().await, false);
    let response = get(app, "/hottrack/songs").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response).await;
    assert_eq!(body["total_results"], 5);
    assert_eq!(body["page"], 1);
    assert_eq!(body["page_size"], 10);
    assert_eq!(body["total_pages"], 1);
    assert!(body["query"].is_null());
    assert!(body["release_date"].is_null());
    assert_eq!(
        names(&body),
        vec!["Seven (feat. Latto)", "Super Shy", "ETA", "I AM", "Ditto"]
    );
}

#[tokio::test]
async fn test_search_matches_any_field() {
    let db = setup_test_db().await;

    // Artist match (case-insensitive)
    let body = extract_json(get(setup_app(db.clone(), false), "/hottrack/songs?query=newjeans").await).await;
    assert_eq!(names(&body), vec!["Super Shy", "ETA", "Ditto"]);
    assert_eq!(body["query"], "newjeans");

    // Album match only
    let body = extract_json(get(setup_app(db.clone(), false), "/hottrack/songs?query=Get%20Up").await).await;
    assert_eq!(names(&body), vec!["Super Shy", "ETA"]);

    // Korean artist match
    let body = extract_json(get(setup_app(db.clone(), false), "/hottrack/songs?query=%EC%A0%95%EA%B5%AD").await).await;
    assert_eq!(names(&body), vec!["Seven (feat. Latto)"]);

    let body = extract_json(get(setup_app(db, false), "/hottrack/songs?query=nothing-like-this").await).await;
    assert_eq!(body["total_results"], 0);
    assert_eq!(body["total_pages"], 0);
}

#[tokio::test]
async fn test_search_folds_non_ascii_case() {
    let db = setup_test_db().await;
    let cuff_it = song("300", 6, "CUFF IT", "cuff-it", "Beyoncé", "RENAISSANCE", "2022-07-29");
    assert!(songs::insert_if_absent(&db, &cuff_it).await.unwrap());

    // BEYONCÉ, beyoncé
    for query in ["BEYONC%C3%89", "beyonc%C3%A9"] {
        let uri = format!("/hottrack/songs?query={}", query);
        let body = extract_json(get(setup_app(db.clone(), false), &uri).await).await;
        assert_eq!(names(&body), vec!["CUFF IT"], "{}", query);
    }
}

#[tokio::test]
async fn test_search_text_is_trimmed() {
    let db = setup_test_db().await;

    let body = extract_json(get(setup_app(db.clone(), false), "/hottrack/songs?query=%20%20ditto%20").await).await;
    assert_eq!(body["query"], "ditto");
    assert_eq!(names(&body), vec!["Ditto"]);

    // Whitespace-only search is no search
    let body = extract_json(get(setup_app(db, false), "/hottrack/songs?query=%20%20%20").await).await;
    assert!(body["query"].is_null());
    assert_eq!(body["total_results"], 5);
}

#[tokio::test]
async fn test_search_treats_wildcards_literally() {
    let app = setup_app(setup_test_db().await, false);
    let body = extract_json(get(app, "/hottrack/songs?query=%25").await).await;
    assert_eq!(body["total_results"], 0);
}

#[tokio::test]
async fn test_list_by_release_date() {
    let db = setup_test_db().await;

    let response = get(setup_app(db.clone(), false), "/hottrack/2023-07-07").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response).await;
    assert_eq!(body["release_date"], "2023-07-07");
    assert_eq!(names(&body), vec!["Super Shy", "ETA"]);

    // Date scope combines with search
    let body = extract_json(get(setup_app(db.clone(), false), "/hottrack/2023-07-07?query=eta").await).await;
    assert_eq!(names(&body), vec!["ETA"]);

    let body = extract_json(get(setup_app(db, false), "/hottrack/2001-01-01").await).await;
    assert_eq!(body["total_results"], 0);
}

#[tokio::test]
async fn test_list_by_invalid_date_rejected() {
    let app = setup_app(setup_test_db().await, false);
    let response = get(app, "/hottrack/2023-02-30").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Detail
// =============================================================================

#[tokio::test]
async fn test_song_detail_with_derived_urls() {
    let app = setup_app(setup_test_db().await, false);
    let response = get(app, "/hottrack/songs/1").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response).await;
    assert_eq!(body["id"], 1);
    assert_eq!(body["melon_uid"], "100");
    assert_eq!(body["name"], "Seven (feat. Latto)");
    assert_eq!(body["release_date"], "2023-07-14");
    assert_eq!(body["absolute_url"], "/hottrack/archives/2023/7/14/seven-feat-latto");
    assert_eq!(body["cover_png_url"], "/hottrack/songs/1/cover.png");
    assert_eq!(
        body["melon_detail_url"],
        "https://www.melon.com/song/detail.htm?songId=100"
    );
    assert!(body["youtube_search_url"]
        .as_str()
        .unwrap()
        .starts_with("https://www.youtube.com/results?search_query="));
}

#[tokio::test]
async fn test_song_detail_not_found() {
    let app = setup_app(setup_test_db().await, false);
    let response = get(app, "/hottrack/songs/999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = extract_json(response).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_song_detail_by_melon_uid() {
    let db = setup_test_db().await;

    let body = extract_json(get(setup_app(db.clone(), false), "/hottrack/melon/103").await).await;
    assert_eq!(body["name"], "I AM");
    assert_eq!(body["id"], 4);

    let response = get(setup_app(db, false), "/hottrack/melon/999999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_date_detail() {
    let db = setup_test_db().await;

    let response = get(setup_app(db.clone(), false), "/hottrack/archives/2023/7/7/eta").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response).await;
    assert_eq!(body["name"], "ETA");
    assert_eq!(body["absolute_url"], "/hottrack/archives/2023/7/7/eta");

    // Right slug, wrong day
    let response = get(setup_app(db.clone(), false), "/hottrack/archives/2023/7/8/eta").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Impossible date
    let response = get(setup_app(db, false), "/hottrack/archives/2023/2/30/eta").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Export
// =============================================================================

#[tokio::test]
async fn test_export_csv() {
    let app = setup_app(setup_test_db().await, false);
    let response = get(app, "/hottrack/export/csv").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header_str(&response, header::CONTENT_TYPE), "text/csv");
    assert_eq!(
        header_str(&response, header::CONTENT_DISPOSITION),
        "attachment; filename=\"hottrack.csv\""
    );

    let bytes = body_bytes(response).await;
    assert!(bytes.starts_with(b"\xEF\xBB\xBF"));
    let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 6);
    assert!(lines[0].starts_with("id,melon_uid,slug,rank"));
    assert!(lines[1].starts_with("1,100,seven-feat-latto,1,"));
}

#[tokio::test]
async fn test_export_spreadsheets() {
    let db = setup_test_db().await;

    let response = get(setup_app(db.clone(), false), "/hottrack/export/xlsx").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        header_str(&response, header::CONTENT_TYPE),
        "application/vnd.ms-excel"
    );
    assert_eq!(
        header_str(&response, header::CONTENT_DISPOSITION),
        "attachment; filename=\"hottrack.xlsx\""
    );
    assert!(body_bytes(response).await.starts_with(b"PK"));

    let response = get(setup_app(db, false), "/hottrack/export/xls").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        header_str(&response, header::CONTENT_DISPOSITION),
        "attachment; filename=\"hottrack(97-2003v).xls\""
    );
    assert!(body_bytes(response).await.starts_with(b"PK"));
}

#[tokio::test]
async fn test_export_unknown_format() {
    let app = setup_app(setup_test_db().await, false);
    let response = get(app, "/hottrack/export/pdf").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(header_str(&response, header::CONTENT_TYPE).starts_with("text/plain"));

    let text = String::from_utf8(body_bytes(response).await).unwrap();
    assert_eq!(text, "Invalid format : pdf");
}

// =============================================================================
// Archives
// =============================================================================

#[tokio::test]
async fn test_archive_index_by_year() {
    let app = setup_app(setup_test_db().await, false);
    let response = get(app, "/hottrack/archives").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response).await;
    assert!(body["period"].is_null());
    assert_eq!(body["date_list_period"], "year");
    assert_eq!(body["total_results"], 5);
    assert_eq!(
        body["date_list"],
        serde_json::json!([
            {"period": "year", "year": 2023},
            {"period": "year", "year": 2022},
        ])
    );
    // Newest release first
    assert_eq!(names(&body)[0], "Seven (feat. Latto)");
    assert_eq!(names(&body)[4], "Ditto");
}

#[tokio::test]
async fn test_archive_index_granularity() {
    let db = setup_test_db().await;

    let body = extract_json(get(setup_app(db.clone(), false), "/hottrack/archives?period=week").await).await;
    assert_eq!(body["date_list_period"], "week");
    assert_eq!(
        body["date_list"],
        serde_json::json!([
            {"period": "week", "year": 2023, "week": 28},
            {"period": "week", "year": 2023, "week": 27},
            {"period": "week", "year": 2023, "week": 15},
            {"period": "week", "year": 2022, "week": 51},
        ])
    );

    let body = extract_json(get(setup_app(db.clone(), false), "/hottrack/archives?period=month").await).await;
    assert_eq!(body["date_list"].as_array().unwrap().len(), 3);

    let response = get(setup_app(db, false), "/hottrack/archives?period=decade").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_year_archive() {
    let db = setup_test_db().await;

    let body = extract_json(get(setup_app(db.clone(), false), "/hottrack/archives/2023").await).await;
    assert_eq!(body["period"], serde_json::json!({"period": "year", "year": 2023}));
    assert_eq!(body["date_list_period"], "month");
    assert_eq!(
        body["date_list"],
        serde_json::json!([
            {"period": "month", "year": 2023, "month": 7},
            {"period": "month", "year": 2023, "month": 4},
        ])
    );
    assert_eq!(names(&body), vec!["Seven (feat. Latto)", "Super Shy", "ETA", "I AM"]);

    // A year without songs is not served
    let response = get(setup_app(db, false), "/hottrack/archives/1999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_empty_archives_not_found() {
    let db = init_memory_database().await.unwrap();
    let response = get(setup_app(db.clone(), false), "/hottrack/archives").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let db = setup_test_db().await;
    for uri in [
        "/hottrack/archives/2023/1",
        "/hottrack/archives/2023/7/8",
        "/hottrack/archives/2023/week/1",
    ] {
        let response = get(setup_app(db.clone(), false), uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", uri);
    }
}

#[tokio::test]
async fn test_future_releases_excluded_from_archives() {
    let db = setup_test_db().await;
    let upcoming = song("200", 6, "Someday", "someday", "NewJeans", "Later", "2999-01-01");
    assert!(songs::insert_if_absent(&db, &upcoming).await.unwrap());

    let body = extract_json(get(setup_app(db.clone(), false), "/hottrack/archives").await).await;
    assert_eq!(body["total_results"], 5);
    assert_eq!(body["date_list"][0], serde_json::json!({"period": "year", "year": 2023}));
    assert!(!names(&body).contains(&"Someday".to_string()));

    for uri in [
        "/hottrack/archives/2999",
        "/hottrack/archives/2999/1",
        "/hottrack/archives/2999/1/1",
        "/hottrack/archives/2999/1/1/someday",
    ] {
        let response = get(setup_app(db.clone(), false), uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", uri);
    }

    // The plain chart listing is not date-capped
    let body = extract_json(get(setup_app(db, false), "/hottrack/songs").await).await;
    assert_eq!(body["total_results"], 6);
}

#[tokio::test]
async fn test_archive_at_last_representable_date() {
    let db = setup_test_db().await;
    for uri in [
        "/hottrack/archives/262142/12/31",
        "/hottrack/archives/262142/12",
        "/hottrack/archives/262142",
    ] {
        let response = get(setup_app(db.clone(), false), uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", uri);
    }

    let response = get(
        setup_app(db, true),
        "/hottrack/archives/today?fake-today=262142-12-31",
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_month_archive() {
    let db = setup_test_db().await;

    let body = extract_json(get(setup_app(db.clone(), false), "/hottrack/archives/2023/7").await).await;
    assert_eq!(body["date_list_period"], "day");
    assert_eq!(
        body["date_list"],
        serde_json::json!([
            {"period": "day", "date": "2023-07-14"},
            {"period": "day", "date": "2023-07-07"},
        ])
    );
    assert_eq!(names(&body), vec!["Seven (feat. Latto)", "Super Shy", "ETA"]);

    let response = get(setup_app(db, false), "/hottrack/archives/2023/13").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_day_archive() {
    let db = setup_test_db().await;

    let body = extract_json(get(setup_app(db.clone(), false), "/hottrack/archives/2023/7/7").await).await;
    assert_eq!(body["period"], serde_json::json!({"period": "day", "date": "2023-07-07"}));
    assert!(body["date_list_period"].is_null());
    assert_eq!(names(&body), vec!["Super Shy", "ETA"]);

    let response = get(setup_app(db, false), "/hottrack/archives/2023/4/31").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_week_archive() {
    let db = setup_test_db().await;

    // ISO week 27 of 2023 runs Monday 07-03 through Sunday 07-09
    let body = extract_json(get(setup_app(db.clone(), false), "/hottrack/archives/2023/week/27").await).await;
    assert_eq!(names(&body), vec!["Super Shy", "ETA"]);

    let body = extract_json(get(setup_app(db.clone(), false), "/hottrack/archives/2023/week/28").await).await;
    assert_eq!(names(&body), vec!["Seven (feat. Latto)"]);

    // 2023 has 52 ISO weeks
    let response = get(setup_app(db, false), "/hottrack/archives/2023/week/53").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_today_archive_honors_fake_today_in_debug() {
    let app = setup_app(setup_test_db().await, true);
    let body = extract_json(get(app, "/hottrack/archives/today?fake-today=2023-7-7").await).await;
    assert_eq!(body["period"], serde_json::json!({"period": "day", "date": "2023-07-07"}));
    assert_eq!(names(&body), vec!["Super Shy", "ETA"]);
}

#[tokio::test]
async fn test_today_archive_ignores_fake_today_without_debug() {
    let db = setup_test_db().await;
    let today = seed_released_today(&db).await;
    let response = get(setup_app(db, false), "/hottrack/archives/today?fake-today=2023-7-7").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response).await;
    assert_eq!(body["period"]["date"], today.as_str());
    assert_eq!(names(&body), vec!["Fresh Drop"]);
}

#[tokio::test]
async fn test_today_archive_malformed_override_falls_back() {
    let db = setup_test_db().await;
    let today = seed_released_today(&db).await;
    let response = get(setup_app(db, true), "/hottrack/archives/today?fake-today=yesterday").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response).await;
    assert_eq!(body["period"]["date"], today.as_str());
}

#[tokio::test]
async fn test_today_archive_without_songs_not_found() {
    let app = setup_app(setup_test_db().await, false);
    let response = get(app, "/hottrack/archives/today").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Cover
// =============================================================================

#[tokio::test]
async fn test_cover_png() {
    let db = setup_test_db().await;

    let response = get(setup_app(db.clone(), false), "/hottrack/songs/2/cover.png").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header_str(&response, header::CONTENT_TYPE), "image/png");
    let bytes = body_bytes(response).await;
    assert!(bytes.starts_with(PNG_MAGIC));
    assert!(bytes.ends_with(b"NewJeans|256"));

    // Requested size is clamped
    let response = get(setup_app(db.clone(), false), "/hottrack/songs/2/cover.png?size=4096").await;
    assert!(body_bytes(response).await.ends_with(b"|512"));

    let response = get(setup_app(db.clone(), false), "/hottrack/songs/2/cover.png?size=big").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get(setup_app(db, false), "/hottrack/songs/999/cover.png").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cover_upstream_failure() {
    let app = build_router(AppState::new(setup_test_db().await, Arc::new(FailingCompositor), false));
    let response = get(app, "/hottrack/songs/1/cover.png").await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let body = extract_json(response).await;
    assert_eq!(body["error"]["code"], "UPSTREAM_ERROR");
}

// =============================================================================
// Pagination
// =============================================================================

#[tokio::test]
async fn test_pagination_bounds() {
    let db = init_memory_database().await.unwrap();
    for rank in 1..=23u16 {
        let uid = format!("{}", 5000 + rank);
        let name = format!("Track {:02}", rank);
        let slug = format!("track-{:02}", rank);
        let s = song(&uid, rank, &name, &slug, "Various", "Mix", "2024-01-05");
        assert!(songs::insert_if_absent(&db, &s).await.unwrap());
    }

    let body = extract_json(get(setup_app(db.clone(), false), "/hottrack/songs?page=3").await).await;
    assert_eq!(body["total_results"], 23);
    assert_eq!(body["total_pages"], 3);
    assert_eq!(body["page"], 3);
    assert_eq!(body["has_next"], false);
    assert_eq!(body["has_previous"], true);
    assert_eq!(names(&body), vec!["Track 21", "Track 22", "Track 23"]);

    // Past the end clamps to the last page, below 1 clamps to the first
    let body = extract_json(get(setup_app(db.clone(), false), "/hottrack/songs?page=99").await).await;
    assert_eq!(body["page"], 3);
    let body = extract_json(get(setup_app(db.clone(), false), "/hottrack/songs?page=0").await).await;
    assert_eq!(body["page"], 1);
    assert_eq!(names(&body).len(), 10);

    let response = get(setup_app(db, false), "/hottrack/songs?page=last").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_duplicate_melon_uid_not_inserted() {
    let db = setup_test_db().await;
    let again = song("100", 9, "Seven (remix)", "seven-remix", "정국", "Seven", "2023-07-14");
    assert!(!songs::insert_if_absent(&db, &again).await.unwrap());

    let body = extract_json(get(setup_app(db, false), "/hottrack/melon/100").await).await;
    assert_eq!(body["name"], "Seven (feat. Latto)");
}
