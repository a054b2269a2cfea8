//! HTTP server facade for the catalog: Axum routing, middleware, HTML pages
//! and error pages.

use anyhow::Context;
use axum::{routing::get, Router};

use locallib_kernel::{settings::Settings, ModuleRegistry};

pub mod error;
pub mod page;
pub mod router;

pub use error::AppError;
pub use page::{Outcome, View};
use router::RouterBuilder;

/// Path prefix all module pages are mounted under
pub const CATALOG_PREFIX: &str = "/catalog";

/// Start the HTTP server and serve until Ctrl-C
pub async fn start_server(registry: &ModuleRegistry, settings: &Settings) -> anyhow::Result<()> {
    let address = format!("{}:{}", settings.server.host, settings.server.port);
    tracing::info!("starting HTTP server on {}", address);

    let app = build_router(registry, settings);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind to {address}"))?;

    tracing::info!("HTTP server listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

/// Build the main HTTP router with all module pages mounted under `/catalog`
pub fn build_router(registry: &ModuleRegistry, settings: &Settings) -> Router {
    let mut pages = Router::new();
    for module in registry.modules() {
        tracing::info!(
            module = module.name(),
            "mounting module pages under {}",
            CATALOG_PREFIX
        );
        pages = pages.merge(module.routes());
    }

    RouterBuilder::new()
        .route("/", get(|| async { page::found(CATALOG_PREFIX) }))
        .route("/healthz", get(health_check))
        .mount(CATALOG_PREFIX, pages)
        .with_not_found_page()
        .with_request_id()
        .with_timeout(settings.server.request_timeout_ms)
        .with_tracing()
        .build()
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "ok"
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
