mod analysis;
mod config;
mod errors;
mod llm_client;
mod render;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on an unparseable PORT)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume ATS Analyzer v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client; a missing key surfaces on every request
    if config.anthropic_api_key.is_none() {
        warn!("ANTHROPIC_API_KEY is not set; analysis requests will fail");
    }
    let llm = LlmClient::new(
        config.anthropic_api_key.clone(),
        config.anthropic_api_url.clone(),
    );
    info!(
        "LLM client initialized (model: {}, max_tokens: {})",
        llm_client::MODEL,
        llm_client::MAX_TOKENS
    );

    let state = AppState {
        gateway: Arc::new(llm),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
