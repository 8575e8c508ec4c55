use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use safetybot::{build_app, AppConfig, AppState, ModelGateway, ModelHandle, ResponseCatalog};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cfg = AppConfig::from_env();

    // The fallback path must always work, so a bad catalog stops startup.
    let catalog = Arc::new(
        ResponseCatalog::load(&cfg.catalog_path)
            .with_context(|| format!("loading response catalog from {}", cfg.catalog_path))?,
    );
    info!(rules = catalog.rules().len(), "response catalog loaded");

    let gateway = match ModelHandle::load(&cfg) {
        Ok(handle) => {
            info!("safety model loaded");
            ModelGateway::new(Some(handle))
        }
        Err(err) => {
            warn!(error = %err, "could not load model, running in offline fallback mode");
            ModelGateway::offline()
        }
    };

    let app = build_app(AppState::new(catalog, Arc::new(gateway)));

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", cfg.port))
        .await
        .with_context(|| format!("binding port {}", cfg.port))?;
    info!(port = cfg.port, "listening");

    axum::serve(listener, app).await.context("server failed")?;

    Ok(())
}
