//! HTTP adapter for the reminder scheduler.
//!
//! # Responsibility
//! - Expose task use-cases as a JSON API under `/api`.
//! - Serve the web client from a static directory.
//! - Guard the API with the password-derived token when configured.

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::{middleware, Router};
use std::path::Path;
use tower_http::services::ServeDir;

pub use config::{ConfigError, ServerConfig};
pub use state::AppState;

/// Builds the full application router.
pub fn build_router(state: AppState, web_dir: impl AsRef<Path>) -> Router {
    let protected = Router::new()
        .route("/api/nextdate", get(routes::next_date))
        .route(
            "/api/task",
            post(routes::create_task)
                .get(routes::get_task)
                .put(routes::update_task)
                .delete(routes::delete_task),
        )
        .route("/api/tasks", get(routes::list_tasks))
        .route("/api/task/done", post(routes::complete_task))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_token,
        ));

    Router::new()
        .merge(protected)
        .route("/api/signin", post(routes::signin))
        .fallback_service(ServeDir::new(web_dir.as_ref()))
        .with_state(state)
}
