//! Catalog store: songs and their precomputed sentiment results
//!
//! Read-only from the UI's point of view. The insert functions exist for
//! batch ingestion (see `seed`).

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteExecutor, SqlitePool};

use super::models::{AnalysisRow, NewSentimentResult, NewSong, SentimentResult, Song};
use crate::Result;

fn song_from_row(row: &SqliteRow) -> Song {
    Song {
        id: row.get("id"),
        title: row.get("title"),
        artist: row.get("artist"),
        album: row.get("album"),
        release_date: row.get("release_date"),
        lyrics: row.get("lyrics"),
        lyrics_url: row.get("lyrics_url"),
    }
}

fn result_from_row(row: &SqliteRow) -> SentimentResult {
    SentimentResult {
        id: row.get("id"),
        song_id: row.get("song_id"),
        model: row.get("model"),
        label: row.get("label"),
        score: row.get("score"),
    }
}

/// All songs, ordered by id
pub async fn list_songs(pool: &SqlitePool) -> Result<Vec<Song>> {
    let rows = sqlx::query(
        r#"
        SELECT id, title, artist, album, release_date, lyrics, lyrics_url
        FROM songs
        ORDER BY id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(song_from_row).collect())
}

/// Load a single song
pub async fn get_song(pool: &SqlitePool, song_id: i64) -> Result<Option<Song>> {
    let row = sqlx::query(
        r#"
        SELECT id, title, artist, album, release_date, lyrics, lyrics_url
        FROM songs
        WHERE id = ?
        "#,
    )
    .bind(song_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(song_from_row))
}

/// Sentiment results for a song, ordered by id.
///
/// An unknown song yields an empty list.
pub async fn get_sentiment_results(pool: &SqlitePool, song_id: i64) -> Result<Vec<SentimentResult>> {
    let rows = sqlx::query(
        r#"
        SELECT id, song_id, model, label, score
        FROM sentiment_analysis
        WHERE song_id = ?
        ORDER BY id ASC
        "#,
    )
    .bind(song_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(result_from_row).collect())
}

/// Load a single sentiment result
pub async fn get_sentiment_result<'e, E>(executor: E, result_id: i64) -> Result<Option<SentimentResult>>
where
    E: SqliteExecutor<'e>,
{
    let row = sqlx::query(
        "SELECT id, song_id, model, label, score FROM sentiment_analysis WHERE id = ?",
    )
    .bind(result_id)
    .fetch_optional(executor)
    .await?;

    Ok(row.as_ref().map(result_from_row))
}

/// Browsing table: every result with its song title, optionally for one model
pub async fn list_analyses(pool: &SqlitePool, model: Option<&str>) -> Result<Vec<AnalysisRow>> {
    let rows = sqlx::query(
        r#"
        SELECT sa.id, sa.song_id, s.title, sa.model, sa.label, sa.score
        FROM sentiment_analysis sa
        JOIN songs s ON sa.song_id = s.id
        WHERE ?1 IS NULL OR sa.model = ?1
        ORDER BY s.id ASC, sa.id ASC
        "#,
    )
    .bind(model)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| AnalysisRow {
            id: row.get("id"),
            song_id: row.get("song_id"),
            title: row.get("title"),
            model: row.get("model"),
            label: row.get("label"),
            score: row.get("score"),
        })
        .collect())
}

/// Distinct model names, sorted
pub async fn list_models(pool: &SqlitePool) -> Result<Vec<String>> {
    let models = sqlx::query_scalar::<_, String>(
        "SELECT DISTINCT model FROM sentiment_analysis ORDER BY model ASC",
    )
    .fetch_all(pool)
    .await?;

    Ok(models)
}

/// Number of songs in the catalog
pub async fn count_songs<'e, E>(executor: E) -> Result<i64>
where
    E: SqliteExecutor<'e>,
{
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM songs")
        .fetch_one(executor)
        .await?;
    Ok(count)
}

/// Insert a song, returning its id
pub async fn insert_song<'e, E>(executor: E, song: &NewSong) -> Result<i64>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO songs (title, artist, album, release_date, lyrics, lyrics_url)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&song.title)
    .bind(&song.artist)
    .bind(&song.album)
    .bind(&song.release_date)
    .bind(&song.lyrics)
    .bind(&song.lyrics_url)
    .execute(executor)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Insert a sentiment result for an existing song, returning its id.
///
/// Fails with a foreign key violation if the song does not exist.
pub async fn insert_sentiment_result<'e, E>(
    executor: E,
    song_id: i64,
    result: &NewSentimentResult,
) -> Result<i64>
where
    E: SqliteExecutor<'e>,
{
    let inserted = sqlx::query(
        "INSERT INTO sentiment_analysis (song_id, model, label, score) VALUES (?, ?, ?, ?)",
    )
    .bind(song_id)
    .bind(&result.model)
    .bind(&result.label)
    .bind(result.score)
    .execute(executor)
    .await?;

    Ok(inserted.last_insert_rowid())
}
