use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::request_id::{propagate_request_id, trace_span};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(propagate_request_id))
                .layer(TraceLayer::new_for_http().make_span_with(trace_span))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        // Catalog
        .route("/catalog", get(handlers::get_catalog))
        .route("/catalog/:app_id", get(handlers::get_item))
        // Global rankings
        .route("/rankings/top", get(handlers::top_rankings))
        .route("/rankings/genres", get(handlers::genre_rankings))
        // Per-user data and recommendations
        .route(
            "/users/:username/recommendations",
            get(handlers::get_recommendations),
        )
        .route(
            "/users/:username/selections",
            get(handlers::get_selections).put(handlers::put_selections),
        )
        .route(
            "/users/:username/ratings",
            get(handlers::get_ratings).post(handlers::post_rating),
        )
        // Accounts
        .route("/auth/register", post(handlers::register))
        .route("/auth/login", post(handlers::login))
}
