mod browser;
mod config;
mod errors;
mod jd;
mod llm_client;
mod resume;
mod routes;
mod state;
#[cfg(test)]
mod testing;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::browser::StagehandAgent;
use crate::config::Config;
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

    info!("Starting JD Match API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize model provider
    let llm = GeminiClient::new(config.gemini_api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Initialize browser agent
    let browser = StagehandAgent::new(config.stagehand_api_url.clone())?;
    info!(
        "Browser agent initialized ({}, environment: {:?})",
        config.stagehand_api_url, config.browser_env
    );

    if config.doc_to_pdf_api_url.is_none() {
        warn!("DOC_TO_PDF_API_URL not set; DOC/DOCX resumes will be rejected");
    }

    let state = AppState {
        llm: Arc::new(llm),
        browser: Arc::new(browser),
        http: reqwest::Client::new(),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client's domain is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
