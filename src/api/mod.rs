mod handlers;
mod models;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::AppState;

pub use handlers::{ask, not_found, root};
pub use models::{AskRequest, ErrorResponse, StatusResponse};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/ask", post(ask))
        .fallback(not_found)
        // The frontend is served from another origin.
        .layer(CorsLayer::permissive())
        .with_state(state)
}
