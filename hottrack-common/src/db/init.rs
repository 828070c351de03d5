//! Database initialization
//!
//! Creates the database file and the `songs` schema on first run. Schema
//! creation is idempotent and runs on every startup.

use crate::search::fold_case;
use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, Row, SqlitePool};
use std::path::Path;
use tracing::info;

/// Lowercased shadow columns of `name`, `artist_name` and `album_name`
///
/// SQLite `LIKE` folds ASCII only, so search compares against these instead.
pub const FOLDED_COLUMNS: [&str; 3] = ["name_folded", "artist_name_folded", "album_name_folded"];

/// Open (creating if needed) the database at `db_path` and ensure the schema
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;

    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&pool)
        .await?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// Single-connection in-memory database with the schema applied
///
/// Every connection to `sqlite::memory:` is a separate database, so the pool
/// is capped at one connection.
pub async fn init_memory_database() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    create_schema(&pool).await?;
    Ok(pool)
}

/// Create tables and indexes if they do not exist
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_songs_table(pool).await?;
    Ok(())
}

async fn create_songs_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS songs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            melon_uid TEXT NOT NULL UNIQUE,
            slug TEXT NOT NULL DEFAULT '',
            rank INTEGER NOT NULL CHECK (rank >= 0),
            album_name TEXT NOT NULL,
            name TEXT NOT NULL,
            artist_name TEXT NOT NULL,
            cover_url TEXT NOT NULL,
            lyrics TEXT NOT NULL,
            genre TEXT NOT NULL,
            release_date TEXT NOT NULL,
            like_count INTEGER NOT NULL CHECK (like_count >= 0),
            name_folded TEXT NOT NULL DEFAULT '',
            artist_name_folded TEXT NOT NULL DEFAULT '',
            album_name_folded TEXT NOT NULL DEFAULT ''
        )
        "#,
    )
    .execute(pool)
    .await?;

    add_folded_columns(pool).await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_songs_slug ON songs(slug)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_songs_release_date ON songs(release_date)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Add any missing `*_folded` column to a database created before they
/// existed, then fill them from the source columns
async fn add_folded_columns(pool: &SqlitePool) -> Result<()> {
    let existing: Vec<String> = sqlx::query_scalar("SELECT name FROM pragma_table_info('songs')")
        .fetch_all(pool)
        .await?;

    let mut added = false;
    for folded in FOLDED_COLUMNS {
        if existing.iter().any(|column| column == folded) {
            continue;
        }
        info!("Adding column: songs.{}", folded);
        let sql = format!("ALTER TABLE songs ADD COLUMN {} TEXT NOT NULL DEFAULT ''", folded);
        match sqlx::query(&sql).execute(pool).await {
            Ok(_) => added = true,
            // Another pool got there first
            Err(sqlx::Error::Database(e)) if e.message().contains("duplicate column") => {}
            Err(e) => return Err(e.into()),
        }
    }

    if added {
        backfill_folded_columns(pool).await?;
    }
    Ok(())
}

async fn backfill_folded_columns(pool: &SqlitePool) -> Result<()> {
    let mut tx = pool.begin().await?;
    let rows = sqlx::query("SELECT id, name, artist_name, album_name FROM songs")
        .fetch_all(&mut *tx)
        .await?;

    for row in &rows {
        let id: i64 = row.try_get("id")?;
        let name: String = row.try_get("name")?;
        let artist_name: String = row.try_get("artist_name")?;
        let album_name: String = row.try_get("album_name")?;
        sqlx::query(
            "UPDATE songs SET name_folded = ?, artist_name_folded = ?, album_name_folded = ? \
             WHERE id = ?",
        )
        .bind(fold_case(&name))
        .bind(fold_case(&artist_name))
        .bind(fold_case(&album_name))
        .bind(id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    info!("Backfilled folded search columns for {} songs", rows.len());
    Ok(())
}
