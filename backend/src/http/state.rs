//! Application state for the HTTP server.

use std::sync::Arc;

use crate::db::repository::LocationRepository;
use crate::services::locations::StatsSettings;
use crate::services::query_state::{QueryState, SharedQueryState};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for location storage
    pub repository: Arc<dyn LocationRepository>,
    /// Current filter and sort of the list view
    pub query_state: SharedQueryState,
    pub stats: Arc<StatsSettings>,
}

impl AppState {
    pub fn new(repository: Arc<dyn LocationRepository>, stats: StatsSettings) -> Self {
        Self {
            repository,
            query_state: SharedQueryState::default(),
            stats: Arc::new(stats),
        }
    }

    /// Start from a given filter/sort instead of the identity state.
    pub fn with_query_state(mut self, state: QueryState) -> Self {
        self.query_state = SharedQueryState::new(state);
        self
    }
}
