pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::jd::handlers;
use crate::resume::MAX_RESUME_BYTES;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // JD API
        .route("/api/v1/jd/classify", post(handlers::handle_classify))
        .route("/api/v1/jd/extract", post(handlers::handle_extract))
        .route("/api/v1/jd/resolve", post(handlers::handle_resolve))
        .route(
            "/api/v1/jd/score",
            post(handlers::handle_score).layer(DefaultBodyLimit::max(MAX_RESUME_BYTES)),
        )
        .with_state(state)
}
