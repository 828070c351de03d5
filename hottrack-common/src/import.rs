//! Chart snapshot import adapter
//!
//! The upstream chart dump uses localized (Korean) column names. Rows are
//! mapped onto [`Song`] here; nothing is persisted.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::NaiveDate;
use serde_json::Value;

use crate::error::{Error, Result, ValidationError};
use crate::song::{Song, MELON_UID_MAX_LEN, NAME_MAX_LEN};

/// One row of the upstream chart, keyed by external column name
pub type ExternalRecord = HashMap<String, String>;

pub const KEY_MELON_UID: &str = "곡일련번호";
pub const KEY_RANK: &str = "순위";
pub const KEY_ALBUM: &str = "앨범";
pub const KEY_NAME: &str = "곡명";
pub const KEY_ARTIST: &str = "가수";
pub const KEY_COVER_URL: &str = "커버이미지_주소";
pub const KEY_LYRICS: &str = "가사";
pub const KEY_GENRE: &str = "장르";
pub const KEY_RELEASE_DATE: &str = "발매일";
pub const KEY_LIKE_COUNT: &str = "좋아요";

impl Song {
    /// Build a song from an external chart row
    ///
    /// The slug is always recomputed from the song name.
    pub fn from_external_record(row: &ExternalRecord) -> std::result::Result<Song, ValidationError> {
        let melon_uid = bounded(row, KEY_MELON_UID, MELON_UID_MAX_LEN)?;
        let rank = integer::<u16>(row, KEY_RANK)?;
        let album_name = bounded(row, KEY_ALBUM, NAME_MAX_LEN)?;
        let name = bounded(row, KEY_NAME, NAME_MAX_LEN)?;
        let artist_name = bounded(row, KEY_ARTIST, NAME_MAX_LEN)?;
        let cover_url = required(row, KEY_COVER_URL)?.to_string();
        let lyrics = required(row, KEY_LYRICS)?.to_string();
        let genre = bounded(row, KEY_GENRE, NAME_MAX_LEN)?;
        let release_date = iso_date(row, KEY_RELEASE_DATE)?;
        let like_count = integer::<u32>(row, KEY_LIKE_COUNT)?;

        let mut song = Song {
            id: None,
            melon_uid,
            slug: String::new(),
            rank,
            album_name,
            name,
            artist_name,
            cover_url,
            lyrics,
            genre,
            release_date,
            like_count,
        };
        song.slugify(true);
        Ok(song)
    }
}

fn required<'a>(row: &'a ExternalRecord, key: &'static str) -> std::result::Result<&'a str, ValidationError> {
    row.get(key)
        .map(String::as_str)
        .ok_or(ValidationError::MissingField(key))
}

fn bounded(row: &ExternalRecord, key: &'static str, max: usize) -> std::result::Result<String, ValidationError> {
    let value = required(row, key)?;
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field: key, max });
    }
    Ok(value.to_string())
}

fn integer<T: FromStr>(row: &ExternalRecord, key: &'static str) -> std::result::Result<T, ValidationError> {
    let value = required(row, key)?;
    value
        .trim()
        .parse::<T>()
        .map_err(|_| ValidationError::InvalidInteger {
            field: key,
            value: value.to_string(),
        })
}

/// Zero-padded `YYYY-MM-DD`; chrono's `%m`/`%d` alone also take `2023-7-4`
fn iso_date(row: &ExternalRecord, key: &'static str) -> std::result::Result<NaiveDate, ValidationError> {
    let value = required(row, key)?;
    let invalid = || ValidationError::InvalidDate {
        field: key,
        value: value.to_string(),
    };

    let bytes = value.as_bytes();
    let padded = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !padded {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| invalid())
}

/// Parse a chart dump (JSON array of objects) into external rows
///
/// Scalar values are stringified so numeric ranks and like counts are
/// accepted alongside string ones. `null` values are treated as absent.
pub fn parse_chart_json(bytes: &[u8]) -> Result<Vec<ExternalRecord>> {
    let rows: Vec<serde_json::Map<String, Value>> = serde_json::from_slice(bytes)
        .map_err(|e| Error::InvalidInput(format!("chart JSON: {}", e)))?;

    Ok(rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .filter_map(|(key, value)| {
                    let value = match value {
                        Value::Null => return None,
                        Value::String(s) => s,
                        other => other.to_string(),
                    };
                    Some((key, value))
                })
                .collect()
        })
        .collect())
}
