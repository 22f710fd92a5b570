use std::sync::Arc;

use crate::batch::Orchestrator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Batch orchestrator wired to the configured generation service.
    pub orchestrator: Arc<Orchestrator>,
}
