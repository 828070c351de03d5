//! Song queries
//!
//! Mirrors `SongQuery::matches` in SQL. Text matching runs `LIKE` against
//! the lowercased `*_folded` columns with a lowercased pattern, since `LIKE`
//! itself folds ASCII only.

use chrono::NaiveDate;
use hottrack_common::search::{fold_case, SongQuery};
use hottrack_common::Song;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

const SONG_COLUMNS: &str = "id, melon_uid, slug, rank, album_name, name, artist_name, \
                            cover_url, lyrics, genre, release_date, like_count";

/// Listing order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SongOrder {
    /// Chart position, then insertion order
    Chart,
    /// Newest release first; used by date archives
    Newest,
}

impl SongOrder {
    fn sql(&self) -> &'static str {
        match self {
            SongOrder::Chart => " ORDER BY rank ASC, id ASC",
            SongOrder::Newest => " ORDER BY release_date DESC, rank ASC, id ASC",
        }
    }
}

fn date_text(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Escape `LIKE` wildcards so the search text matches literally
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn push_filters(qb: &mut QueryBuilder<'_, Sqlite>, query: &SongQuery) {
    qb.push(" WHERE 1 = 1");

    if let Some(date) = query.release_date {
        qb.push(" AND release_date = ").push_bind(date_text(date));
    }

    if let Some(period) = &query.period {
        match period.bounds() {
            Some((start, end)) => {
                qb.push(" AND release_date >= ")
                    .push_bind(date_text(start))
                    .push(" AND release_date < ")
                    .push_bind(date_text(end));
            }
            None => {
                qb.push(" AND 1 = 0");
            }
        }
    }

    if let Some(until) = query.released_until {
        qb.push(" AND release_date <= ").push_bind(date_text(until));
    }

    if let Some(text) = &query.search {
        let pattern = format!("%{}%", escape_like(&fold_case(text)));
        qb.push(" AND (name_folded LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR artist_name_folded LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR album_name_folded LIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\')");
    }
}

fn song_from_row(row: &SqliteRow) -> Result<Song, sqlx::Error> {
    Ok(Song {
        id: Some(row.try_get("id")?),
        melon_uid: row.try_get("melon_uid")?,
        slug: row.try_get("slug")?,
        rank: row.try_get("rank")?,
        album_name: row.try_get("album_name")?,
        name: row.try_get("name")?,
        artist_name: row.try_get("artist_name")?,
        cover_url: row.try_get("cover_url")?,
        lyrics: row.try_get("lyrics")?,
        genre: row.try_get("genre")?,
        release_date: row.try_get("release_date")?,
        like_count: row.try_get("like_count")?,
    })
}

/// Number of songs matching `query`
pub async fn count(pool: &SqlitePool, query: &SongQuery) -> Result<i64, sqlx::Error> {
    let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM songs");
    push_filters(&mut qb, query);
    qb.build_query_scalar::<i64>().fetch_one(pool).await
}

/// One page of songs matching `query`
pub async fn fetch_page(
    pool: &SqlitePool,
    query: &SongQuery,
    order: SongOrder,
    limit: i64,
    offset: i64,
) -> Result<Vec<Song>, sqlx::Error> {
    let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM songs", SONG_COLUMNS));
    push_filters(&mut qb, query);
    qb.push(order.sql());
    qb.push(" LIMIT ").push_bind(limit);
    qb.push(" OFFSET ").push_bind(offset);

    let rows = qb.build().fetch_all(pool).await?;
    rows.iter().map(song_from_row).collect()
}

/// Every song, in primary key order
pub async fn fetch_all(pool: &SqlitePool) -> Result<Vec<Song>, sqlx::Error> {
    let rows = sqlx::query(&format!("SELECT {} FROM songs ORDER BY id ASC", SONG_COLUMNS))
        .fetch_all(pool)
        .await?;
    rows.iter().map(song_from_row).collect()
}

/// Distinct release dates of songs matching `query`
pub async fn release_dates(pool: &SqlitePool, query: &SongQuery) -> Result<Vec<NaiveDate>, sqlx::Error> {
    let mut qb = QueryBuilder::<Sqlite>::new("SELECT DISTINCT release_date FROM songs");
    push_filters(&mut qb, query);
    qb.push(" ORDER BY release_date DESC");
    qb.build_query_scalar::<NaiveDate>().fetch_all(pool).await
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Song>, sqlx::Error> {
    let row = sqlx::query(&format!("SELECT {} FROM songs WHERE id = ?", SONG_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    row.as_ref().map(song_from_row).transpose()
}

pub async fn find_by_melon_uid(pool: &SqlitePool, melon_uid: &str) -> Result<Option<Song>, sqlx::Error> {
    let row = sqlx::query(&format!("SELECT {} FROM songs WHERE melon_uid = ?", SONG_COLUMNS))
        .bind(melon_uid)
        .fetch_optional(pool)
        .await?;
    row.as_ref().map(song_from_row).transpose()
}

/// Song released on `date` with `slug`; the lowest id wins on slug collisions
pub async fn find_by_date_and_slug(
    pool: &SqlitePool,
    date: NaiveDate,
    slug: &str,
) -> Result<Option<Song>, sqlx::Error> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM songs WHERE release_date = ? AND slug = ? ORDER BY id ASC LIMIT 1",
        SONG_COLUMNS
    ))
    .bind(date_text(date))
    .bind(slug)
    .fetch_optional(pool)
    .await?;
    row.as_ref().map(song_from_row).transpose()
}

/// Insert `song` unless its `melon_uid` already exists
///
/// Returns `true` when a row was inserted. Existing rows are never updated.
pub async fn insert_if_absent(pool: &SqlitePool, song: &Song) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO songs (
            melon_uid, slug, rank, album_name, name, artist_name,
            cover_url, lyrics, genre, release_date, like_count,
            name_folded, artist_name_folded, album_name_folded
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(melon_uid) DO NOTHING
        "#,
    )
    .bind(&song.melon_uid)
    .bind(&song.slug)
    .bind(song.rank)
    .bind(&song.album_name)
    .bind(&song.name)
    .bind(&song.artist_name)
    .bind(&song.cover_url)
    .bind(&song.lyrics)
    .bind(&song.genre)
    .bind(date_text(song.release_date))
    .bind(song.like_count)
    .bind(fold_case(&song.name))
    .bind(fold_case(&song.artist_name))
    .bind(fold_case(&song.album_name))
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}
