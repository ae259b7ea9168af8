use std::sync::Arc;

use crate::config::Config;
use crate::extraction::TextExtractor;
use crate::llm_client::{GenerativeModel, ModelCatalog};

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only: every request builds its own pipeline context from it.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub extractor: Arc<dyn TextExtractor>,
    pub model: Arc<dyn GenerativeModel>,
    /// Queried only for failure diagnostics.
    pub catalog: Arc<dyn ModelCatalog>,
}
