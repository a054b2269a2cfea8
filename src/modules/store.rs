//! Core `db` module: checks the document store is readable before any page
//! module starts.

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use locallib_kernel::{InitCtx, Module};

use super::home::counts;
use crate::catalog::Catalog;

pub struct StoreModule {
    catalog: Catalog,
}

impl StoreModule {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl Module for StoreModule {
    fn name(&self) -> &'static str {
        "db"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let endpoint = &ctx.settings.database.endpoint;
        let counts = counts(&self.catalog)
            .await
            .with_context(|| format!("store at '{endpoint}' is not readable"))?;
        tracing::info!(
            module = self.name(),
            endpoint = %endpoint,
            books = counts.books,
            authors = counts.authors,
            genres = counts.genres,
            copies = counts.copies,
            "document store ready"
        );
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "document store released");
        Ok(())
    }
}

pub fn create_module(catalog: Catalog) -> Arc<dyn Module> {
    Arc::new(StoreModule::new(catalog))
}
