//! sqa-ui - Lyrics sentiment feedback service
//!
//! Shows precomputed sentiment results for the song catalog, collects human
//! accuracy judgments, and summarizes them. Zero-config startup: the database
//! is created and seeded with sample data on first run.

use anyhow::{Context, Result};
use clap::Parser;
use sqa_common::config::{default_config_path, AppConfig, CliOverrides, TomlConfig};
use sqa_ui::{build_router, prepare_database, AppState};
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Lyrics sentiment feedback web UI
#[derive(Debug, Parser)]
#[command(name = "sqa-ui", version, about)]
struct Args {
    /// SQLite database file (overrides SQA_DATABASE and the config file)
    #[arg(long)]
    database: Option<PathBuf>,

    /// Listen address, e.g. 127.0.0.1:5740 (overrides SQA_BIND and the config file)
    #[arg(long)]
    bind: Option<String>,

    /// TOML config file
    #[arg(long, env = "SQA_CONFIG")]
    config: Option<PathBuf>,

    /// Do not insert the sample catalog into an empty database
    #[arg(long)]
    no_seed: bool,

    /// JSON catalog to load before serving
    #[arg(long)]
    catalog: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config is read before tracing starts so log_level can come from it
    let config_path = args.config.clone().unwrap_or_else(default_config_path);
    let toml_config = TomlConfig::load(&config_path)
        .with_context(|| format!("Failed to load config {}", config_path.display()))?;

    let config = AppConfig::resolve(
        CliOverrides {
            database_path: args.database,
            bind_address: args.bind,
            no_seed: args.no_seed,
            catalog_file: args.catalog,
        },
        toml_config,
    );

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Log build identification immediately after tracing init
    info!(
        "Starting Lyrics Sentiment QA (sqa-ui) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    if config_path.exists() {
        info!("Config file: {}", config_path.display());
    } else {
        warn!("Config file not found: {} (using defaults)", config_path.display());
    }
    info!("Database path: {}", config.database_path.display());

    let pool = match prepare_database(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to prepare database: {}", e);
            return Err(e.into());
        }
    };

    let state = AppState::new(pool);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address))?;
    info!("sqa-ui listening on http://{}", config.bind_address);
    info!("Health check: http://{}/health", config.bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
