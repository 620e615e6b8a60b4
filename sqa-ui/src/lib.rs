//! sqa-ui library - Lyrics sentiment feedback service
//!
//! Serves one HTML page for reviewing precomputed sentiment results and
//! collecting human judgments, plus a small JSON API over the same stores.

use axum::Router;
use chrono::{DateTime, Utc};
use sqa_common::config::AppConfig;
use sqa_common::db::{init::init_database, seed};
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod api;
pub mod error;

pub use crate::error::{ApiError, ApiResult};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Service startup timestamp for uptime reporting
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool) -> Self {
        Self {
            db,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // HTML page and form handling
        .merge(api::ui_routes())
        // JSON API
        .merge(api::catalog_routes())
        .merge(api::feedback_routes())
        .merge(api::summary_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Open the configured database and fill an empty catalog.
///
/// The catalog file, if any, is imported first; the sample catalog is only
/// seeded when nothing else populated `songs`. Safe to run on every startup.
pub async fn prepare_database(config: &AppConfig) -> sqa_common::Result<SqlitePool> {
    let pool = init_database(&config.database_path).await?;
    info!("✓ Connected to database");

    if let Some(catalog_file) = &config.catalog_file {
        seed::load_catalog_file(&pool, catalog_file).await?;
    }

    if config.seed_sample_data {
        seed::seed_sample_catalog(&pool).await?;
    }

    Ok(pool)
}
