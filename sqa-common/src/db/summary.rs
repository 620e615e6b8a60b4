//! Summary view: feedback counts derived from `sentiment_qa` on every call

use sqlx::{Row, SqlitePool};

use super::models::{FeedbackSummary, ModelSummary};
use crate::Result;

/// Agree/disagree counts over all feedback, or only feedback on one model's results.
///
/// An unknown model yields all zeros.
pub async fn summarize(pool: &SqlitePool, model: Option<&str>) -> Result<FeedbackSummary> {
    let (agree, disagree): (i64, i64) = sqlx::query_as(
        r#"
        SELECT
            COALESCE(SUM(CASE WHEN q.judgment = 'agree' THEN 1 ELSE 0 END), 0),
            COALESCE(SUM(CASE WHEN q.judgment = 'disagree' THEN 1 ELSE 0 END), 0)
        FROM sentiment_qa q
        JOIN sentiment_analysis sa ON q.result_id = sa.id
        WHERE ?1 IS NULL OR sa.model = ?1
        "#,
    )
    .bind(model)
    .fetch_one(pool)
    .await?;

    Ok(FeedbackSummary::new(agree, disagree))
}

/// Agree/disagree counts for a single sentiment result
pub async fn summarize_result(pool: &SqlitePool, result_id: i64) -> Result<FeedbackSummary> {
    let (agree, disagree): (i64, i64) = sqlx::query_as(
        r#"
        SELECT
            COALESCE(SUM(CASE WHEN judgment = 'agree' THEN 1 ELSE 0 END), 0),
            COALESCE(SUM(CASE WHEN judgment = 'disagree' THEN 1 ELSE 0 END), 0)
        FROM sentiment_qa
        WHERE result_id = ?1
        "#,
    )
    .bind(result_id)
    .fetch_one(pool)
    .await?;

    Ok(FeedbackSummary::new(agree, disagree))
}

/// One entry per model in the catalog, including models nobody rated yet
pub async fn summarize_by_model(pool: &SqlitePool) -> Result<Vec<ModelSummary>> {
    // Feedback is pre-aggregated per result so the join does not skew AVG(score)
    let rows = sqlx::query(
        r#"
        SELECT
            sa.model AS model,
            COUNT(*) AS result_count,
            AVG(sa.score) AS average_score,
            COALESCE(SUM(fb.agree), 0) AS agree_count,
            COALESCE(SUM(fb.disagree), 0) AS disagree_count
        FROM sentiment_analysis sa
        LEFT JOIN (
            SELECT
                result_id,
                SUM(CASE WHEN judgment = 'agree' THEN 1 ELSE 0 END) AS agree,
                SUM(CASE WHEN judgment = 'disagree' THEN 1 ELSE 0 END) AS disagree
            FROM sentiment_qa
            GROUP BY result_id
        ) fb ON fb.result_id = sa.id
        GROUP BY sa.model
        ORDER BY sa.model ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| ModelSummary {
            model: row.get("model"),
            result_count: row.get("result_count"),
            average_score: row.get("average_score"),
            feedback: FeedbackSummary::new(row.get("agree_count"), row.get("disagree_count")),
        })
        .collect())
}
