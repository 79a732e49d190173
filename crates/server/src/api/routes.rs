use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use super::middleware::{auth_middleware, metrics_middleware};
use super::{control, games, handlers, launches};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Catalog
        .route("/filters", get(games::list_filters))
        .route("/games", get(games::list_games))
        .route("/games/{id}", get(games::get_game))
        // Game server control
        .route("/launch", post(control::launch))
        .route("/stop", post(control::stop))
        .route("/query", get(control::query))
        .route("/volume", post(control::set_volume))
        // Launch history
        .route("/launches", get(launches::list_launches))
        .route("/launches/counts", get(launches::list_counts))
        .layer(from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state.clone());

    let mut router = Router::new()
        .nest("/api/v1", api_routes)
        .route("/metrics", get(handlers::metrics));

    // Web frontend with SPA fallback
    if let Some(static_dir) = &state.config().server.static_dir {
        let serve_dir =
            ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")));
        router = router.fallback_service(serve_dir);
    }

    router
        .layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
}
