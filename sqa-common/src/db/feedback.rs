//! Feedback collector: validated, append-only writes to `sentiment_qa`

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::{info, warn};

use super::catalog;
use super::models::{FeedbackRecord, Judgment, NewFeedback};
use crate::{time, Error, Result};

/// Longest accepted comment, in characters
pub const MAX_COMMENT_CHARS: usize = 2000;
/// Longest accepted reviewer name, in characters
pub const MAX_REVIEWER_CHARS: usize = 100;

/// Feedback that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidFeedback {
    pub result_id: i64,
    pub judgment: Judgment,
    pub comment: Option<String>,
    pub reviewer: Option<String>,
}

/// Check a submission without touching the database
pub fn validate(input: &NewFeedback) -> Result<ValidFeedback> {
    let judgment: Judgment = input.judgment.parse()?;
    let comment = bounded_text("comment", input.comment.as_deref(), MAX_COMMENT_CHARS)?;
    let reviewer = bounded_text("reviewer", input.reviewer.as_deref(), MAX_REVIEWER_CHARS)?;

    Ok(ValidFeedback {
        result_id: input.result_id,
        judgment,
        comment,
        reviewer,
    })
}

/// Blank text becomes `None`; text over `max_chars` is rejected
fn bounded_text(field: &str, value: Option<&str>, max_chars: usize) -> Result<Option<String>> {
    let Some(text) = value.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(None);
    };

    let chars = text.chars().count();
    if chars > max_chars {
        return Err(Error::InvalidInput(format!(
            "{} is {} characters, maximum is {}",
            field, chars, max_chars
        )));
    }

    Ok(Some(text.to_string()))
}

/// Record one human judgment on a sentiment result.
///
/// On success exactly one row is appended. Nothing is written when
/// validation fails or the result does not exist. Resubmitting the same
/// input appends another row.
pub async fn submit_feedback(pool: &SqlitePool, input: &NewFeedback) -> Result<FeedbackRecord> {
    let valid = validate(input).map_err(|e| {
        warn!("Rejected feedback for result {}: {}", input.result_id, e);
        e
    })?;

    let mut tx = pool.begin().await?;

    if catalog::get_sentiment_result(&mut *tx, valid.result_id)
        .await?
        .is_none()
    {
        return Err(Error::NotFound(format!(
            "sentiment result {}",
            valid.result_id
        )));
    }

    let created_at = time::to_storage(time::now());
    let inserted = sqlx::query(
        r#"
        INSERT INTO sentiment_qa (result_id, judgment, comment, reviewer, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(valid.result_id)
    .bind(valid.judgment.as_str())
    .bind(&valid.comment)
    .bind(&valid.reviewer)
    .bind(&created_at)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    let id = inserted.last_insert_rowid();
    info!(
        "Stored feedback {} for result {}: {}",
        id, valid.result_id, valid.judgment
    );

    Ok(FeedbackRecord {
        id,
        result_id: valid.result_id,
        judgment: valid.judgment,
        comment: valid.comment,
        reviewer: valid.reviewer,
        created_at: time::from_storage(&created_at)
            .ok_or_else(|| Error::Internal(format!("bad timestamp '{}'", created_at)))?,
    })
}

fn feedback_from_row(row: &SqliteRow) -> Result<FeedbackRecord> {
    let judgment: String = row.get("judgment");
    let created_at: String = row.get("created_at");

    Ok(FeedbackRecord {
        id: row.get("id"),
        result_id: row.get("result_id"),
        judgment: judgment
            .parse()
            .map_err(|_| Error::Internal(format!("stored judgment '{}' is invalid", judgment)))?,
        comment: row.get("comment"),
        reviewer: row.get("reviewer"),
        created_at: time::from_storage(&created_at)
            .ok_or_else(|| Error::Internal(format!("stored timestamp '{}' is invalid", created_at)))?,
    })
}

/// Number of feedback rows for one result
pub async fn count_feedback(pool: &SqlitePool, result_id: i64) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sentiment_qa WHERE result_id = ?")
        .bind(result_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Feedback for one result, newest first
pub async fn list_feedback(pool: &SqlitePool, result_id: i64) -> Result<Vec<FeedbackRecord>> {
    let rows = sqlx::query(
        r#"
        SELECT id, result_id, judgment, comment, reviewer, created_at
        FROM sentiment_qa
        WHERE result_id = ?
        ORDER BY id DESC
        "#,
    )
    .bind(result_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(feedback_from_row).collect()
}

/// Most recent feedback across all results
pub async fn recent_feedback(pool: &SqlitePool, limit: i64) -> Result<Vec<FeedbackRecord>> {
    let rows = sqlx::query(
        r#"
        SELECT id, result_id, judgment, comment, reviewer, created_at
        FROM sentiment_qa
        ORDER BY id DESC
        LIMIT ?
        "#,
    )
    .bind(limit.max(0))
    .fetch_all(pool)
    .await?;

    rows.iter().map(feedback_from_row).collect()
}
