use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::InferenceClient;

/// Shared application state injected into all route handlers via Axum extractors.
/// Immutable after startup; requests share nothing mutable.
#[derive(Clone)]
pub struct AppState {
    /// Inference backend. Production: `GroqClient`; tests swap in a mock.
    pub llm: Arc<dyn InferenceClient>,
    pub config: Config,
}
