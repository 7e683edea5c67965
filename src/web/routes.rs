//! Route definitions

use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};

/// Create the application router with all routes mounted under the
/// configured API prefix
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route(
            "/search",
            get(handlers::search_keywords).post(handlers::search_json),
        )
        .route("/search/:domain", get(handlers::search_domain))
        .route(
            "/search/:domain/no-readme",
            get(handlers::search_domain_no_readme),
        )
        .route("/domains", get(handlers::domains))
        .route("/stats", get(handlers::stats));

    let prefix = state.settings.server.route_prefix();
    let router = if prefix.is_empty() {
        api
    } else {
        Router::new().nest(&prefix, api)
    };

    router
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(cors)
                .layer(CompressionLayer::new()),
        )
        // Add state
        .with_state(state)
}
