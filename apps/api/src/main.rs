mod analysis;
mod applicants;
mod config;
mod db;
mod errors;
mod forms;
mod llm_client;
mod models;
mod routes;
mod screening;
mod state;
mod storage;
mod store;
#[cfg(test)]
mod test_support;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::engine::AnalysisEngine;
use crate::analysis::extractor::FileExtractor;
use crate::analysis::fit_scoring::KeywordFitScorer;
use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::FileStore;
use crate::store::PgApplicantStore;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting screening API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    let store = Arc::new(PgApplicantStore::new(db));

    // Upload folders
    let files = FileStore::new(config.resume_dir.clone(), config.jd_dir.clone());
    files.ensure_dirs().await?;

    // Initialize LLM client
    let llm = LlmClient::from_config(&config)?;
    info!("LLM client initialized (model: {})", config.llm_model);

    let engine = AnalysisEngine::new(llm, Arc::new(FileExtractor), Arc::new(KeywordFitScorer));

    let state = AppState::new(store, files, engine);

    // Build router
    let app = build_router(state, config.max_upload_bytes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the student and recruiter frontends

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
