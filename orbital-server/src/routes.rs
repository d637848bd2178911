//! API routes

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

/// Build the CORS layer.
///
/// `origins` is `*` for any origin, a comma-separated list of origins, or
/// `None` for the local development origins.
pub fn cors_layer(origins: Option<&str>) -> CorsLayer {
    match origins {
        Some("*") => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        Some(origins) => {
            let allowed: Vec<_> = origins
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(allowed))
                .allow_methods(Any)
                .allow_headers(Any)
        }
        None => CorsLayer::new()
            .allow_origin(AllowOrigin::predicate(|origin, _| {
                origin.to_str().is_ok_and(|o| {
                    o.starts_with("http://localhost:") || o.starts_with("http://127.0.0.1:")
                })
            }))
            .allow_methods(Any)
            .allow_headers(Any),
    }
}

/// Create the application router with the local development CORS origins.
///
/// Deployments pass the origins from [`ServerConfig`](crate::config::ServerConfig)
/// to [`create_router_with_cors`] instead.
pub fn create_router(state: AppState) -> Router {
    create_router_with_cors(state, cors_layer(None))
}

pub fn create_router_with_cors(state: AppState, cors: CorsLayer) -> Router {
    let api_routes = Router::new()
        .route("/progress", get(handlers::list_progress))
        .route("/progress/sync", post(handlers::sync_progress))
        .route("/stats", get(handlers::get_stats));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(handlers::health_check))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
