//! Song query/filter engine
//!
//! `SongQuery` describes a result set; [`SongQuery::apply`] evaluates it over
//! an in-memory slice and the web crate's SQL layer pushes the same
//! predicates into SQLite.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::archive::Period;
use crate::song::Song;

/// Request parameter carrying free-text search
pub const SEARCH_PARAM: &str = "query";

/// Trim search text; empty after trimming means "no filter"
pub fn search_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Case folding shared by the in-memory engine and the stored `*_folded`
/// columns; full Unicode lowercasing
pub fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

/// Pull the free-text search term out of request query parameters
pub fn extract_search_text(params: &HashMap<String, String>) -> Option<String> {
    params.get(SEARCH_PARAM).and_then(|raw| search_text(raw))
}

/// Result-set description for song listings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongQuery {
    /// Exact release date
    pub release_date: Option<NaiveDate>,
    /// Calendar period the release date must fall into
    pub period: Option<Period>,
    /// Latest release date included; archives cap this at today
    pub released_until: Option<NaiveDate>,
    /// Case-insensitive substring over name, artist and album
    pub search: Option<String>,
}

impl SongQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_release_date(mut self, date: NaiveDate) -> Self {
        self.release_date = Some(date);
        self
    }

    pub fn with_period(mut self, period: Period) -> Self {
        self.period = Some(period);
        self
    }

    pub fn with_released_until(mut self, date: NaiveDate) -> Self {
        self.released_until = Some(date);
        self
    }

    /// Set the search text; whitespace-only text clears the filter
    pub fn with_search(mut self, raw: &str) -> Self {
        self.search = search_text(raw);
        self
    }

    pub fn is_unfiltered(&self) -> bool {
        self.release_date.is_none()
            && self.period.is_none()
            && self.released_until.is_none()
            && self.search.is_none()
    }

    pub fn matches(&self, song: &Song) -> bool {
        if let Some(date) = self.release_date {
            if song.release_date != date {
                return false;
            }
        }

        if let Some(period) = &self.period {
            if !period.contains(song.release_date) {
                return false;
            }
        }

        if let Some(until) = self.released_until {
            if song.release_date > until {
                return false;
            }
        }

        if let Some(text) = &self.search {
            let needle = fold_case(text);
            let hit = [&song.name, &song.artist_name, &song.album_name]
                .iter()
                .any(|field| fold_case(field).contains(&needle));
            if !hit {
                return false;
            }
        }

        true
    }

    /// Filter `songs` and return them in default listing order
    pub fn apply(&self, songs: &[Song]) -> Vec<Song> {
        let mut result: Vec<Song> = songs.iter().filter(|s| self.matches(s)).cloned().collect();
        result.sort_by_key(|s| (s.rank, s.id));
        result
    }
}
