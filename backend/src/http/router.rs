//! Router configuration for the HTTP API.
//!
//! Sets up all routes plus CORS, compression and request tracing.

use axum::{
    routing::{get, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // The front end is served from another origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Location CRUD
        .route(
            "/locs",
            get(handlers::list_locations).post(handlers::save_location),
        )
        .route(
            "/locs/{id}",
            get(handlers::get_location).delete(handlers::remove_location),
        )
        // Query state
        .route("/query", get(handlers::get_query_state))
        .route("/query/filter", put(handlers::set_filter))
        .route(
            "/query/sort",
            put(handlers::set_sort).delete(handlers::clear_sort),
        )
        // Charts
        .route("/stats/rating", get(handlers::rating_stats))
        .route("/stats/recency", get(handlers::recency_stats));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::LocalRepository;
    use crate::services::locations::StatsSettings;
    use std::sync::Arc;

    #[test]
    fn test_router_creation() {
        let state = AppState::new(Arc::new(LocalRepository::new()), StatsSettings::default());
        let _router = create_router(state);
    }
}
