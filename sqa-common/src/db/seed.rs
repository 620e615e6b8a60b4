//! Batch loading of the song catalog
//!
//! Songs and sentiment results are loaded once, in a single transaction per
//! batch. Feedback is never seeded.

use serde::Deserialize;
use sqlx::SqlitePool;
use std::path::Path;
use tracing::info;

use super::catalog::{count_songs, insert_sentiment_result, insert_song};
use super::models::{NewSentimentResult, NewSong};
use crate::{Error, Result};

/// One song of a catalog batch together with its model outputs
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    #[serde(flatten)]
    pub song: NewSong,
    #[serde(default)]
    pub results: Vec<NewSentimentResult>,
}

/// Built-in demo catalog used when the database starts empty
pub fn sample_catalog() -> Vec<CatalogEntry> {
    let results = || {
        vec![
            NewSentimentResult {
                model: "VADER".to_string(),
                label: Some("Neutral".to_string()),
                score: 0.5,
            },
            NewSentimentResult {
                model: "TextBlob".to_string(),
                label: Some("Slightly Positive".to_string()),
                score: 0.3,
            },
        ]
    };

    vec![
        CatalogEntry {
            song: NewSong {
                title: "Hotline Bling".to_string(),
                artist: "Drake".to_string(),
                album: Some("Views".to_string()),
                release_date: Some("2016-04-29".to_string()),
                lyrics: "You used to call me on my cell phone\n\
                         Late night when you need my love\n\
                         Call me on my cell phone\n\
                         Late night when you need my love\n\
                         I know when that hotline bling\n\
                         That can only mean one thing"
                    .to_string(),
                lyrics_url: Some("https://genius.com/Drake-hotline-bling-lyrics".to_string()),
            },
            results: results(),
        },
        CatalogEntry {
            song: NewSong {
                title: "God's Plan".to_string(),
                artist: "Drake".to_string(),
                album: Some("Scorpion".to_string()),
                release_date: Some("2018-06-29".to_string()),
                lyrics: "Yeah, they wishin' and wishin' and wishin' and wishin'\n\
                         They wishin' on me, yeah\n\
                         I been movin' calm, don't start no trouble with me\n\
                         Tryna keep it peaceful is a struggle for me"
                    .to_string(),
                lyrics_url: Some("https://genius.com/Drake-gods-plan-lyrics".to_string()),
            },
            results: results(),
        },
    ]
}

/// Insert a batch of songs and results atomically. Returns the number of songs inserted.
pub async fn load_catalog(pool: &SqlitePool, entries: &[CatalogEntry]) -> Result<usize> {
    let mut tx = pool.begin().await?;

    for entry in entries {
        let song_id = insert_song(&mut *tx, &entry.song).await?;
        for result in &entry.results {
            insert_sentiment_result(&mut *tx, song_id, result).await?;
        }
    }

    tx.commit().await?;
    Ok(entries.len())
}

/// Seed the demo catalog if `songs` is empty. Returns the number of songs inserted.
pub async fn seed_sample_catalog(pool: &SqlitePool) -> Result<usize> {
    if count_songs(pool).await? > 0 {
        return Ok(0);
    }

    let inserted = load_catalog(pool, &sample_catalog()).await?;
    info!("Seeded sample catalog with {} songs", inserted);
    Ok(inserted)
}

/// Parse a JSON catalog batch
pub fn parse_catalog(json: &str) -> Result<Vec<CatalogEntry>> {
    serde_json::from_str(json).map_err(|e| Error::InvalidInput(format!("Invalid catalog JSON: {}", e)))
}

/// Load a JSON catalog file (array of `CatalogEntry`) into an empty catalog.
///
/// Returns the number of songs inserted. Once `songs` has rows the file is not
/// read again, so restarting with the same file leaves the catalog unchanged.
pub async fn load_catalog_file(pool: &SqlitePool, path: &Path) -> Result<usize> {
    let existing = count_songs(pool).await?;
    if existing > 0 {
        info!(
            "Catalog already holds {} songs, skipping {}",
            existing,
            path.display()
        );
        return Ok(0);
    }

    let text = tokio::fs::read_to_string(path).await?;
    let entries = parse_catalog(&text)?;
    let inserted = load_catalog(pool, &entries).await?;
    info!("Loaded {} songs from {}", inserted, path.display());
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::catalog::{get_sentiment_results, list_songs};
    use crate::db::init::init_memory_database;

    #[tokio::test]
    async fn test_seed_only_when_empty() {
        let pool = init_memory_database().await.unwrap();

        assert_eq!(seed_sample_catalog(&pool).await.unwrap(), 2);
        assert_eq!(seed_sample_catalog(&pool).await.unwrap(), 0);

        let songs = list_songs(&pool).await.unwrap();
        assert_eq!(songs.len(), 2);
        assert_eq!(songs[0].title, "Hotline Bling");
        assert_eq!(songs[0].album.as_deref(), Some("Views"));

        let results = get_sentiment_results(&pool, songs[1].id).await.unwrap();
        let models: Vec<_> = results.iter().map(|r| r.model.as_str()).collect();
        assert_eq!(models, ["VADER", "TextBlob"]);
    }

    #[test]
    fn test_parse_catalog_json() {
        let entries = parse_catalog(
            r#"[
                {
                    "title": "Song",
                    "artist": "Someone",
                    "lyrics": "words",
                    "results": [
                        {"model": "modelA", "label": "positive", "score": 0.8},
                        {"model": "modelB", "score": -0.1}
                    ]
                }
            ]"#,
        )
        .unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].song.title, "Song");
        assert!(entries[0].song.album.is_none());
        assert_eq!(entries[0].results.len(), 2);
        assert!(entries[0].results[1].label.is_none());
    }

    #[test]
    fn test_parse_catalog_rejects_missing_lyrics() {
        let err = parse_catalog(r#"[{"title": "Song", "artist": "Someone"}]"#).unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_load_catalog_is_atomic() {
        let pool = init_memory_database().await.unwrap();
        // Second song of the batch fails after the first was inserted
        sqlx::query("CREATE TRIGGER reject_bad BEFORE INSERT ON songs WHEN NEW.title = 'bad' BEGIN SELECT RAISE(ABORT, 'bad song'); END")
            .execute(&pool)
            .await
            .unwrap();

        let mut entries = sample_catalog();
        entries[1].song.title = "bad".to_string();

        assert!(load_catalog(&pool, &entries).await.is_err());
        assert!(list_songs(&pool).await.unwrap().is_empty());
    }
}
