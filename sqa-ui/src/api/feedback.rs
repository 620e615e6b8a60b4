//! Feedback submission endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use sqa_common::db::feedback;
use sqa_common::db::models::{FeedbackRecord, NewFeedback};

use crate::{ApiResult, AppState};

/// POST /api/feedback
///
/// **Request:** `{"result_id": 3, "judgment": "disagree", "comment": "..."}`
/// **Response:** 201 with the stored record
///
/// **Errors:**
/// - 400 Bad Request: judgment not agree/disagree, comment or reviewer too long
/// - 404 Not Found: result_id does not exist
pub async fn submit_feedback(
    State(state): State<AppState>,
    Json(payload): Json<NewFeedback>,
) -> ApiResult<(StatusCode, Json<FeedbackRecord>)> {
    let record = feedback::submit_feedback(&state.db, &payload).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /api/results/:id/feedback
pub async fn result_feedback(
    State(state): State<AppState>,
    Path(result_id): Path<i64>,
) -> ApiResult<Json<Vec<FeedbackRecord>>> {
    Ok(Json(feedback::list_feedback(&state.db, result_id).await?))
}

/// Build feedback routes
pub fn feedback_routes() -> Router<AppState> {
    Router::new()
        .route("/api/feedback", post(submit_feedback))
        .route("/api/results/:id/feedback", get(result_feedback))
}
