use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::handlers;
use crate::state::AppState;

pub fn create_routes(state: &AppState) -> Router<AppState> {
    let system_config = &state.config.system_config;

    Router::new()
        .route("/analyze", post(handlers::analyze))
        .route("/metrics", get(handlers::get_metrics))
        .route("/api/health", get(handlers::health_check))
        // The form page and its assets
        .fallback_service(ServeDir::new(&system_config.static_dir))
}

/// Full application: routes, permissive CORS, request tracing
pub fn build_app(state: AppState) -> Router {
    create_routes(&state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
