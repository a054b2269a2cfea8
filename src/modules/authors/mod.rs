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

pub use models::Author;
use views::AuthorView;
use workflow::AuthorWorkflow;

use crate::catalog::Catalog;
use crate::forms::FormData;

type Page = Result<Outcome<AuthorView>, AppError>;

/// Author pages under `/catalog/authors` and `/catalog/author/...`
pub struct AuthorsModule {
    workflow: Arc<AuthorWorkflow>,
}

impl AuthorsModule {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            workflow: Arc::new(AuthorWorkflow::new(catalog)),
        }
    }
}

#[async_trait]
impl Module for AuthorsModule {
    fn name(&self) -> &'static str {
        "authors"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "authors module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/authors", get(list))
            .route("/author/create", get(create_form).post(create))
            .route("/author/{id}", get(detail))
            .route("/author/{id}/update", get(update_form).post(update))
            .route("/author/{id}/delete", get(delete_form).post(delete))
            .with_state(self.workflow.clone())
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "authors module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "authors module stopped");
        Ok(())
    }
}

async fn list(State(workflow): State<Arc<AuthorWorkflow>>) -> Page {
    workflow.list().await
}

async fn detail(State(workflow): State<Arc<AuthorWorkflow>>, Path(id): Path<String>) -> Page {
    workflow.detail(&RecordId::from(id)).await
}

async fn create_form(State(workflow): State<Arc<AuthorWorkflow>>) -> Outcome<AuthorView> {
    workflow.create_form()
}

async fn create(State(workflow): State<Arc<AuthorWorkflow>>, form: FormData) -> Page {
    workflow.create(&form).await
}

async fn update_form(State(workflow): State<Arc<AuthorWorkflow>>, Path(id): Path<String>) -> Page {
    workflow.update_form(&RecordId::from(id)).await
}

async fn update(
    State(workflow): State<Arc<AuthorWorkflow>>,
    Path(id): Path<String>,
    form: FormData,
) -> Page {
    workflow.update(&RecordId::from(id), &form).await
}

async fn delete_form(State(workflow): State<Arc<AuthorWorkflow>>, Path(id): Path<String>) -> Page {
    workflow.delete_form(&RecordId::from(id)).await
}

async fn delete(State(workflow): State<Arc<AuthorWorkflow>>, Path(id): Path<String>) -> Page {
    workflow.delete(&RecordId::from(id)).await
}

/// Create a new instance of the authors module
pub fn create_module(catalog: Catalog) -> Arc<dyn Module> {
    Arc::new(AuthorsModule::new(catalog))
}
