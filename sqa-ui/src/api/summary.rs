//! Summary endpoints, recomputed on every request

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use sqa_common::db::models::{FeedbackSummary, ModelSummary};
use sqa_common::db::summary;

use super::catalog::ModelQuery;
use crate::{ApiResult, AppState};

/// GET /api/summary?model=
pub async fn get_summary(
    State(state): State<AppState>,
    Query(query): Query<ModelQuery>,
) -> ApiResult<Json<FeedbackSummary>> {
    Ok(Json(summary::summarize(&state.db, query.model()).await?))
}

/// GET /api/summary/models
pub async fn get_model_summaries(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<ModelSummary>>> {
    Ok(Json(summary::summarize_by_model(&state.db).await?))
}

/// Build summary routes
pub fn summary_routes() -> Router<AppState> {
    Router::new()
        .route("/api/summary", get(get_summary))
        .route("/api/summary/models", get(get_model_summaries))
}
