//! Integration tests for database initialization
//!
//! Covers automatic creation of a missing database file, reopening an
//! existing file, and the schema constraints the stores rely on.

use sqa_common::db::catalog::{insert_sentiment_result, insert_song, list_songs};
use sqa_common::db::init::init_database;
use sqa_common::db::models::{NewSentimentResult, NewSong};
use sqa_common::db::seed::seed_sample_catalog;
use tempfile::TempDir;

fn sample_song() -> NewSong {
    NewSong {
        title: "Test".to_string(),
        artist: "Tester".to_string(),
        lyrics: "test lyrics".to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_database_creation_when_missing() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("nested").join("qa.db");
    assert!(!db_path.exists());

    let result = init_database(&db_path).await;

    assert!(result.is_ok(), "Database initialization failed: {:?}", result.err());
    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_all_tables_created() {
    let dir = TempDir::new().unwrap();
    let pool = init_database(&dir.path().join("qa.db")).await.unwrap();

    let tables: Vec<String> = sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert_eq!(tables, ["sentiment_analysis", "sentiment_qa", "songs"]);
}

#[tokio::test]
async fn test_database_reopen_keeps_data() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("qa.db");

    let pool = init_database(&db_path).await.unwrap();
    assert_eq!(seed_sample_catalog(&pool).await.unwrap(), 2);
    pool.close().await;

    // Second open must not recreate tables or reseed
    let pool = init_database(&db_path).await.unwrap();
    assert_eq!(seed_sample_catalog(&pool).await.unwrap(), 0);
    assert_eq!(list_songs(&pool).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_foreign_keys_enforced_on_every_connection() {
    let dir = TempDir::new().unwrap();
    let pool = init_database(&dir.path().join("qa.db")).await.unwrap();

    // Several orphan inserts so more than one pooled connection is likely used
    for _ in 0..5 {
        let orphan = insert_sentiment_result(
            &pool,
            12345,
            &NewSentimentResult {
                model: "m".to_string(),
                label: None,
                score: 0.0,
            },
        )
        .await;
        assert!(orphan.is_err(), "orphan sentiment result must be rejected");
    }
}

#[tokio::test]
async fn test_judgment_check_constraint() {
    let dir = TempDir::new().unwrap();
    let pool = init_database(&dir.path().join("qa.db")).await.unwrap();

    let song_id = insert_song(&pool, &sample_song()).await.unwrap();
    let result_id = insert_sentiment_result(
        &pool,
        song_id,
        &NewSentimentResult {
            model: "m".to_string(),
            label: Some("positive".to_string()),
            score: 0.4,
        },
    )
    .await
    .unwrap();

    let bypass = sqlx::query(
        "INSERT INTO sentiment_qa (result_id, judgment, created_at) VALUES (?, 'maybe', '2024-01-01T00:00:00Z')",
    )
    .bind(result_id)
    .execute(&pool)
    .await;

    assert!(bypass.is_err(), "schema must reject judgments other than agree/disagree");
}

#[tokio::test]
async fn test_journal_mode_is_wal() {
    let dir = TempDir::new().unwrap();
    let pool = init_database(&dir.path().join("qa.db")).await.unwrap();

    let mode: String = sqlx::query_scalar("PRAGMA journal_mode")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(mode.to_lowercase(), "wal");
}
