//! HTTP API handlers for hottrack-web

pub mod archive;
pub mod cover;
pub mod export;
pub mod health;
pub mod songs;
pub mod ui;
pub mod views;

pub use archive::{
    archive_index, date_detail, day_archive, month_archive, today_archive, week_archive,
    year_archive,
};
pub use cover::cover_png;
pub use export::export_songs;
pub use health::health_routes;
pub use songs::{list_songs, list_songs_by_date, song_detail, song_detail_by_melon_uid};
pub use ui::{serve_app_js, serve_index};
