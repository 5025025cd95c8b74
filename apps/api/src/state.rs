use std::sync::Arc;

use crate::instructions::ConfigurationResolver;
use crate::llm_client::TextGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
/// Everything here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    /// Generation seam. `LlmClient` in production, scripted in tests.
    pub generator: Arc<dyn TextGenerator>,
    /// Language, gender and tone tables, built once.
    pub resolver: Arc<ConfigurationResolver>,
}

impl AppState {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            resolver: Arc::new(ConfigurationResolver::new()),
        }
    }
}
