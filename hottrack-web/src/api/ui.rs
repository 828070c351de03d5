//! UI serving routes
//!
//! Static HTML/JS compiled into the binary; the page drives the JSON routes.

use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};

const INDEX_HTML: &str = include_str!("../ui/index.html");
const APP_JS: &str = include_str!("../ui/app.js");

/// GET /hottrack/
pub async fn serve_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /hottrack/static/app.js
pub async fn serve_app_js() -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/javascript")],
        APP_JS,
    )
        .into_response()
}
