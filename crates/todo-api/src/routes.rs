//! Router assembly

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the service router with request tracing attached.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route(
            "/api/todo",
            get(handlers::find_todos).post(handlers::create_todo),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
