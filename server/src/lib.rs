//! Agri Assist web server
//!
//! HTML front-end over the `agri_assist` library: static pages, leaf
//! disease prediction, crop/fertilizer advice and farmer registration.

pub mod error;
pub mod routes;
pub mod state;
pub mod templates;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

pub use error::ApiError;
pub use state::{AppState, Classifier, ServerConfig, SharedState};

/// Build the application router
pub fn build_router(state: SharedState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        // Static pages
        .route("/", get(routes::pages::index))
        .route("/crop", get(routes::pages::crop))
        .route("/fertilizer", get(routes::pages::fertilizer))
        .route("/block-index", get(routes::pages::block_index))
        .route("/register", get(routes::pages::register))

        // Forms and uploads
        .route(
            "/predict",
            post(routes::predict::predict).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/crop-result", post(routes::advice::crop_result))
        .route("/fertilizer-result", post(routes::advice::fertilizer_result))
        .route("/register-farmer", post(routes::register::register_farmer))

        // Health check
        .route("/health", get(routes::health::health_check))

        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
