//! UI Routes - server-rendered HTML page
//!
//! The page has three panels: song/result browser, feedback forms, and the
//! summary/comparison panel. Every submission redirects back to the page,
//! which re-reads everything from the database.

use axum::{
    routing::{get, post},
    Router,
};

use crate::AppState;

mod page;
mod render;

pub use page::{load_page, PageView, ResultView};
pub use render::escape_html;

/// Build UI routes
pub fn ui_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(page::index_page))
        .route("/feedback", post(page::submit_feedback_form))
}
