//! LocalLibrary catalog application
//!
//! Books, authors, genres and book copies as server-rendered HTML pages over a
//! document store. Page modules plug into the kernel's [`ModuleRegistry`] and
//! are served by `locallib-http`.

use anyhow::Context;
use axum::Router;
use locallib_kernel::{settings::Settings, InitCtx, ModuleRegistry};

pub mod catalog;
pub mod forms;
pub mod lookup;
pub mod modules;
pub mod schema;
pub mod seed;
pub mod utils;
pub mod validation;

#[cfg(test)]
mod testing;

pub use catalog::{Catalog, Entity, Record};

/// Registry holding the store core module and every page module
pub fn build_registry(catalog: &Catalog) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, catalog);
    registry
}

/// Full application router over `catalog`, without lifecycle hooks
pub fn router(catalog: &Catalog, settings: &Settings) -> Router {
    locallib_http::build_router(&build_registry(catalog), settings)
}

/// Open the configured store and catalog from `settings`.
pub async fn open_catalog(settings: &Settings) -> anyhow::Result<Catalog> {
    let store = locallib_db::connect(&settings.database.endpoint)
        .await
        .with_context(|| format!("failed to open store '{}'", settings.database.endpoint))?;
    Ok(Catalog::new(store))
}

/// Run the application until shutdown: init and start modules, serve HTTP,
/// then stop modules in reverse order.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let catalog = open_catalog(&settings).await?;
    let registry = build_registry(&catalog);
    let ctx = InitCtx {
        settings: &settings,
    };

    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    let served = locallib_http::start_server(&registry, &settings).await;
    if let Err(err) = &served {
        tracing::error!(error = %err, "server exited with error");
    }

    registry.stop_all().await?;
    tracing::info!("locallib-app shutdown complete");
    served
}
