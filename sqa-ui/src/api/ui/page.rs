//! Page handlers: load the view, accept the feedback form

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use sqa_common::db::models::{
    AnalysisRow, FeedbackRecord, FeedbackSummary, ModelSummary, NewFeedback, SentimentResult, Song,
};
use sqa_common::db::{catalog, feedback, summary};
use sqa_common::Error;
use sqlx::SqlitePool;
use tracing::{error, warn};

use super::render::{encode_query_value, render_error_page, render_page, FormError, Messages};
use crate::AppState;

/// How many feedback rows the "recent feedback" table shows
const RECENT_FEEDBACK_LIMIT: i64 = 10;

/// A sentiment result together with how often it has been rated
#[derive(Debug, Clone)]
pub struct ResultView {
    pub result: SentimentResult,
    pub feedback: FeedbackSummary,
}

/// Everything the page shows, read fresh for each request
#[derive(Debug, Clone)]
pub struct PageView {
    pub songs: Vec<Song>,
    pub selected: Option<Song>,
    pub results: Vec<ResultView>,
    pub models: Vec<String>,
    pub model_filter: Option<String>,
    pub summary: FeedbackSummary,
    pub by_model: Vec<ModelSummary>,
    pub analyses: Vec<AnalysisRow>,
    pub recent: Vec<FeedbackRecord>,
}

/// Read the whole page state.
///
/// An unknown or missing song id falls back to the first song.
pub async fn load_page(
    pool: &SqlitePool,
    song_id: Option<i64>,
    model: Option<&str>,
) -> sqa_common::Result<PageView> {
    let songs = catalog::list_songs(pool).await?;
    let selected = song_id
        .and_then(|id| songs.iter().find(|s| s.id == id))
        .or_else(|| songs.first())
        .cloned();

    let mut results = Vec::new();
    if let Some(song) = &selected {
        for result in catalog::get_sentiment_results(pool, song.id).await? {
            results.push(ResultView {
                feedback: summary::summarize_result(pool, result.id).await?,
                result,
            });
        }
    }

    Ok(PageView {
        selected,
        results,
        models: catalog::list_models(pool).await?,
        model_filter: model.map(str::to_string),
        summary: summary::summarize(pool, model).await?,
        by_model: summary::summarize_by_model(pool).await?,
        analyses: catalog::list_analyses(pool, model).await?,
        recent: feedback::recent_feedback(pool, RECENT_FEEDBACK_LIMIT).await?,
        songs,
    })
}

/// Query string of `GET /`. Values are parsed leniently so a hand-edited
/// URL never turns into an error page.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub song: Option<String>,
    pub model: Option<String>,
    pub notice: Option<String>,
}

impl PageQuery {
    fn song_id(&self) -> Option<i64> {
        self.song.as_deref().and_then(|s| s.trim().parse().ok())
    }

    fn model(&self) -> Option<&str> {
        self.model.as_deref().map(str::trim).filter(|m| !m.is_empty())
    }
}

/// Body of `POST /feedback`. Ids arrive as text so a tampered form is
/// answered with the page instead of a bare extractor rejection.
#[derive(Debug, Deserialize)]
pub struct FeedbackForm {
    pub result_id: Option<String>,
    pub song_id: Option<String>,
    /// Absent when no radio button was selected
    pub judgment: Option<String>,
    pub comment: Option<String>,
    pub reviewer: Option<String>,
    pub model: Option<String>,
}

impl FeedbackForm {
    fn result_id(&self) -> sqa_common::Result<i64> {
        self.result_id
            .as_deref()
            .and_then(|s| s.trim().parse().ok())
            .ok_or_else(|| {
                Error::InvalidInput("result_id must identify a sentiment result".to_string())
            })
    }

    fn song_id(&self) -> Option<i64> {
        self.song_id.as_deref().and_then(|s| s.trim().parse().ok())
    }
}

/// GET /
pub async fn index_page(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Response {
    let notice = match query.notice.as_deref() {
        Some("submitted") => Some("Thank you for your feedback!".to_string()),
        _ => None,
    };

    let messages = Messages {
        notice,
        ..Default::default()
    };

    respond(&state.db, query.song_id(), query.model(), messages, StatusCode::OK).await
}

/// POST /feedback
///
/// Success redirects back to the song (303). Validation problems re-render the
/// page with the message next to the form (422, or 404 for an unknown result).
/// Storage failures render a page-level error (500).
pub async fn submit_feedback_form(
    State(state): State<AppState>,
    Form(form): Form<FeedbackForm>,
) -> Response {
    let song_id = form.song_id();
    let model = form.model.as_deref().map(str::trim).filter(|m| !m.is_empty());

    let result_id = match form.result_id() {
        Ok(id) => id,
        Err(err) => {
            warn!("Rejected feedback form: {}", err);
            let messages = Messages {
                page_error: Some(err.to_string()),
                ..Default::default()
            };
            return respond(
                &state.db,
                song_id,
                model,
                messages,
                StatusCode::UNPROCESSABLE_ENTITY,
            )
            .await;
        }
    };

    let input = NewFeedback {
        result_id,
        judgment: form.judgment.clone().unwrap_or_default(),
        comment: form.comment.clone(),
        reviewer: form.reviewer.clone(),
    };

    match feedback::submit_feedback(&state.db, &input).await {
        Ok(_) => {
            let mut location = String::from("/?notice=submitted");
            if let Some(song_id) = song_id {
                location.push_str(&format!("&song={}", song_id));
            }
            if let Some(model) = model {
                location.push_str(&format!("&model={}", encode_query_value(model)));
            }
            Redirect::to(&location).into_response()
        }
        Err(err @ (Error::InvalidInput(_) | Error::NotFound(_))) => {
            let status = if matches!(err, Error::NotFound(_)) {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::UNPROCESSABLE_ENTITY
            };
            let messages = Messages {
                form_error: Some(FormError {
                    result_id,
                    message: err.to_string(),
                    judgment: form.judgment,
                    comment: form.comment,
                    reviewer: form.reviewer,
                }),
                ..Default::default()
            };
            respond(&state.db, song_id, model, messages, status).await
        }
        Err(err) => {
            error!("Failed to save feedback for result {}: {}", result_id, err);
            let messages = Messages {
                page_error: Some(format!("Error saving feedback: {}", err)),
                ..Default::default()
            };
            respond(
                &state.db,
                song_id,
                model,
                messages,
                StatusCode::INTERNAL_SERVER_ERROR,
            )
            .await
        }
    }
}

/// Render the page, or a bare error page if the database cannot be read
async fn respond(
    pool: &SqlitePool,
    song_id: Option<i64>,
    model: Option<&str>,
    messages: Messages,
    status: StatusCode,
) -> Response {
    match load_page(pool, song_id, model).await {
        Ok(view) => (status, Html(render_page(&view, &messages))).into_response(),
        Err(err) => {
            error!("Failed to load page: {}", err);
            let message = messages
                .page_error
                .unwrap_or_else(|| format!("Database unavailable: {}", err));
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(render_error_page(&message)),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_query_lenient_parsing() {
        let query = PageQuery {
            song: Some("abc".to_string()),
            model: Some("  ".to_string()),
            notice: None,
        };
        assert_eq!(query.song_id(), None);
        assert_eq!(query.model(), None);

        let query = PageQuery {
            song: Some(" 4 ".to_string()),
            model: Some("VADER".to_string()),
            notice: None,
        };
        assert_eq!(query.song_id(), Some(4));
        assert_eq!(query.model(), Some("VADER"));
    }

    #[test]
    fn test_feedback_form_ids_parsed_leniently() {
        let form = FeedbackForm {
            result_id: Some(" 12 ".to_string()),
            song_id: Some("x".to_string()),
            judgment: None,
            comment: None,
            reviewer: None,
            model: None,
        };
        assert_eq!(form.result_id().unwrap(), 12);
        assert_eq!(form.song_id(), None);

        let form = FeedbackForm {
            result_id: Some("twelve".to_string()),
            ..form
        };
        assert!(form.result_id().unwrap_err().is_validation());
    }
}
