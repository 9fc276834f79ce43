use std::sync::Arc;

use crate::llm_client::CompletionGateway;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Immutable: nothing here changes after startup.
#[derive(Clone)]
pub struct AppState {
    /// Provider boundary. `LlmClient` in production.
    pub gateway: Arc<dyn CompletionGateway>,
}
