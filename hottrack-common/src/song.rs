//! Song record - one ranked chart entry

use chrono::{Datelike, NaiveDate};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

use crate::slug::{slugify, SLUG_MAX_LEN};

/// Maximum length of the external unique id
pub const MELON_UID_MAX_LEN: usize = 20;

/// Maximum length of the bounded text fields (names, genre)
pub const NAME_MAX_LEN: usize = 100;

const MELON_DETAIL_URL: &str = "https://www.melon.com/song/detail.htm";
const YOUTUBE_SEARCH_URL: &str = "https://www.youtube.com/results";

/// Characters left unescaped in derived URLs: alphanumerics plus `_.-~/`
const URL_QUOTE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~')
    .remove(b'/');

/// Song record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    /// Local primary key, `None` until persisted
    pub id: Option<i64>,
    /// Identifier assigned by the upstream chart
    pub melon_uid: String,
    pub slug: String,
    pub rank: u16,
    pub album_name: String,
    pub name: String,
    pub artist_name: String,
    pub cover_url: String,
    pub lyrics: String,
    pub genre: String,
    pub release_date: NaiveDate,
    pub like_count: u32,
}

impl Song {
    /// Recompute the slug from `name` when empty or when `force` is set
    pub fn slugify(&mut self, force: bool) {
        self.slug = slugify(&self.name, force, &self.slug, SLUG_MAX_LEN);
    }

    /// Path of the date-detail route for this song
    pub fn absolute_url(&self) -> String {
        format!(
            "/hottrack/archives/{}/{}/{}/{}",
            self.release_date.year(),
            self.release_date.month(),
            self.release_date.day(),
            utf8_percent_encode(&self.slug, URL_QUOTE)
        )
    }

    pub fn melon_detail_url(&self) -> String {
        format!(
            "{}?songId={}",
            MELON_DETAIL_URL,
            utf8_percent_encode(&self.melon_uid, URL_QUOTE)
        )
    }

    pub fn youtube_search_url(&self) -> String {
        let search_query = format!("{}, {}", self.name, self.artist_name);
        format!(
            "{}?search_query={}",
            YOUTUBE_SEARCH_URL,
            utf8_percent_encode(&search_query, URL_QUOTE)
        )
    }

    /// Thumbnail `<img>` tag for admin-style listings
    pub fn cover_image_tag(&self) -> String {
        format!(
            r#"<img src="{}" width=50px/>"#,
            html_escape::encode_double_quoted_attribute(&self.cover_url)
        )
    }
}
