//! Shared application state for HTTP handlers.

use std::sync::Arc;

use crate::application::services::QueryService;
use crate::domain::repositories::RunRepository;

/// Application state injected into every handler.
///
/// The query service is built over a trait object so the server can run
/// against PostgreSQL while tests use the in-memory repository.
#[derive(Clone)]
pub struct AppState {
    pub query_service: Arc<QueryService<dyn RunRepository>>,
}

impl AppState {
    /// Creates application state over the given run repository.
    pub fn new(repository: Arc<dyn RunRepository>) -> Self {
        Self {
            query_service: Arc::new(QueryService::new(repository)),
        }
    }
}
