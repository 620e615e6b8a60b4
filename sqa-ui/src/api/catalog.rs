//! Catalog browsing endpoints (read-only)

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use sqa_common::db::catalog;
use sqa_common::db::models::{AnalysisRow, SentimentResult, Song};

use crate::{ApiResult, AppState};

/// Optional model filter shared by the browsing and summary endpoints
#[derive(Debug, Default, Deserialize)]
pub struct ModelQuery {
    pub model: Option<String>,
}

impl ModelQuery {
    /// Empty `?model=` means no filter
    pub fn model(&self) -> Option<&str> {
        self.model.as_deref().map(str::trim).filter(|m| !m.is_empty())
    }
}

/// GET /api/songs
pub async fn list_songs(State(state): State<AppState>) -> ApiResult<Json<Vec<Song>>> {
    Ok(Json(catalog::list_songs(&state.db).await?))
}

/// GET /api/songs/:id/results
///
/// Unknown songs return an empty list rather than 404.
pub async fn song_results(
    State(state): State<AppState>,
    Path(song_id): Path<i64>,
) -> ApiResult<Json<Vec<SentimentResult>>> {
    Ok(Json(catalog::get_sentiment_results(&state.db, song_id).await?))
}

/// GET /api/analyses?model=
pub async fn list_analyses(
    State(state): State<AppState>,
    Query(query): Query<ModelQuery>,
) -> ApiResult<Json<Vec<AnalysisRow>>> {
    Ok(Json(catalog::list_analyses(&state.db, query.model()).await?))
}

/// GET /api/models
pub async fn list_models(State(state): State<AppState>) -> ApiResult<Json<Vec<String>>> {
    Ok(Json(catalog::list_models(&state.db).await?))
}

/// Build catalog routes
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/api/songs", get(list_songs))
        .route("/api/songs/:id/results", get(song_results))
        .route("/api/analyses", get(list_analyses))
        .route("/api/models", get(list_models))
}
