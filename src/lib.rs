pub mod api;
pub mod catalog;
pub mod config;
pub mod fallback;
pub mod model;
pub mod resolver;

use std::sync::Arc;

use axum::Router;

pub use catalog::{CatalogError, ResponseCatalog};
pub use config::AppConfig;
pub use model::{InferenceError, ModelGateway, ModelHandle, ModelLoadError};
pub use resolver::{AnswerMode, AnswerResult, Question, Resolver, DEFAULT_CONTEXT};

#[derive(Clone)]
pub struct AppState {
    pub resolver: Resolver,
}

impl AppState {
    pub fn new(catalog: Arc<ResponseCatalog>, gateway: Arc<ModelGateway>) -> Self {
        Self {
            resolver: Resolver::new(catalog, gateway),
        }
    }
}

pub fn build_app(state: AppState) -> Router {
    api::router(state)
}
