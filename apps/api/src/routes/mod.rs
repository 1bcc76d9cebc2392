pub mod frontend;
pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(frontend::index_handler))
        .route("/health", get(health::health_handler))
        // Analysis API
        .route("/analyze", post(handlers::handle_analyze))
        .route(
            "/generate-questions",
            post(handlers::handle_generate_questions),
        )
        .route(
            "/generate-questions/upload",
            post(handlers::handle_generate_questions_upload),
        )
        .route("/evaluate-answer", post(handlers::handle_evaluate_answer))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
