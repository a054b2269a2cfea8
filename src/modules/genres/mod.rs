pub mod models;
pub mod views;
pub mod workflow;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{Path, State},
    routing::get,
    Router,
};
use locallib_db::RecordId;
use locallib_http::{AppError, Outcome};
use locallib_kernel::{InitCtx, Module};

pub use models::Genre;
use views::GenreView;
use workflow::GenreWorkflow;

use crate::catalog::Catalog;
use crate::forms::FormData;

type Page = Result<Outcome<GenreView>, AppError>;

/// Genre pages under `/catalog/genres` and `/catalog/genre/...`
pub struct GenresModule {
    workflow: Arc<GenreWorkflow>,
}

impl GenresModule {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            workflow: Arc::new(GenreWorkflow::new(catalog)),
        }
    }
}

#[async_trait]
impl Module for GenresModule {
    fn name(&self) -> &'static str {
        "genres"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "genres module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/genres", get(list))
            .route("/genre/create", get(create_form).post(create))
            .route("/genre/{id}", get(detail))
            .route("/genre/{id}/update", get(update_form).post(update))
            .route("/genre/{id}/delete", get(delete_form).post(delete))
            .with_state(self.workflow.clone())
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "genres module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "genres module stopped");
        Ok(())
    }
}

async fn list(State(workflow): State<Arc<GenreWorkflow>>) -> Page {
    workflow.list().await
}

async fn detail(State(workflow): State<Arc<GenreWorkflow>>, Path(id): Path<String>) -> Page {
    workflow.detail(&RecordId::from(id)).await
}

async fn create_form(State(workflow): State<Arc<GenreWorkflow>>) -> Outcome<GenreView> {
    workflow.create_form()
}

async fn create(State(workflow): State<Arc<GenreWorkflow>>, form: FormData) -> Page {
    workflow.create(&form).await
}

async fn update_form(State(workflow): State<Arc<GenreWorkflow>>, Path(id): Path<String>) -> Page {
    workflow.update_form(&RecordId::from(id)).await
}

async fn update(
    State(workflow): State<Arc<GenreWorkflow>>,
    Path(id): Path<String>,
    form: FormData,
) -> Page {
    workflow.update(&RecordId::from(id), &form).await
}

async fn delete_form(State(workflow): State<Arc<GenreWorkflow>>, Path(id): Path<String>) -> Page {
    workflow.delete_form(&RecordId::from(id)).await
}

async fn delete(State(workflow): State<Arc<GenreWorkflow>>, Path(id): Path<String>) -> Page {
    workflow.delete(&RecordId::from(id)).await
}

/// Create a new instance of the genres module
pub fn create_module(catalog: Catalog) -> Arc<dyn Module> {
    Arc::new(GenresModule::new(catalog))
}
