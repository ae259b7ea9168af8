mod analysis;
mod config;
mod diagnostics;
mod errors;
mod extraction;
mod llm_client;
mod normalize;
mod routes;
mod schema;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::extraction::PdfTextExtractor;
use crate::llm_client::GeminiClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Analyzer API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize Gemini client (serves both generation and model listing)
    let gemini = Arc::new(GeminiClient::new(
        config.google_api_key.clone(),
        config.gemini_model.clone(),
        config.gemini_temperature,
        Duration::from_secs(config.llm_timeout_secs),
    )?);
    info!(
        "Gemini client initialized (model: {}, timeout: {}s)",
        config.gemini_model, config.llm_timeout_secs
    );

    // Force schema construction before serving
    let schema = schema::analysis_schema();
    info!(
        "Analysis schema ready ({} word floors, {} no-bold fields, content policy: {:?})",
        schema.word_floors().len(),
        schema.no_bold_paths().len(),
        config.content_policy
    );

    // Build app state
    let state = AppState {
        config: config.clone(),
        extractor: Arc::new(PdfTextExtractor),
        model: gemini.clone(),
        catalog: gemini,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict CORS origins once the front-end host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
