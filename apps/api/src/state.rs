use std::sync::Arc;

use crate::browser::BrowsingAgent;
use crate::config::Config;
use crate::llm_client::GenerativeModel;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Generative-model provider. Gemini in production, a stub in tests.
    pub llm: Arc<dyn GenerativeModel>,
    pub browser: Arc<dyn BrowsingAgent>,
    /// Plain HTTP client for résumé downloads and document conversion.
    pub http: reqwest::Client,
    pub config: Config,
}
