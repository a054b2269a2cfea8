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

pub use models::{BookInstance, LoanStatus};
use views::BookInstanceView;
use workflow::BookInstanceWorkflow;

use crate::catalog::Catalog;
use crate::forms::FormData;

type Page = Result<Outcome<BookInstanceView>, AppError>;

/// Book copy pages under `/catalog/bookinstances` and `/catalog/bookinstance/...`
pub struct BookInstancesModule {
    workflow: Arc<BookInstanceWorkflow>,
}

impl BookInstancesModule {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            workflow: Arc::new(BookInstanceWorkflow::new(catalog)),
        }
    }
}

#[async_trait]
impl Module for BookInstancesModule {
    fn name(&self) -> &'static str {
        "bookinstances"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "bookinstances module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/bookinstances", get(list))
            .route("/bookinstance/create", get(create_form).post(create))
            .route("/bookinstance/{id}", get(detail))
            .route("/bookinstance/{id}/update", get(update_form).post(update))
            .route("/bookinstance/{id}/delete", get(delete_form).post(delete))
            .with_state(self.workflow.clone())
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "bookinstances module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "bookinstances module stopped");
        Ok(())
    }
}

async fn list(State(workflow): State<Arc<BookInstanceWorkflow>>) -> Page {
    workflow.list().await
}

async fn detail(
    State(workflow): State<Arc<BookInstanceWorkflow>>,
    Path(id): Path<String>,
) -> Page {
    workflow.detail(&RecordId::from(id)).await
}

async fn create_form(State(workflow): State<Arc<BookInstanceWorkflow>>) -> Page {
    workflow.create_form().await
}

async fn create(State(workflow): State<Arc<BookInstanceWorkflow>>, form: FormData) -> Page {
    workflow.create(&form).await
}

async fn update_form(
    State(workflow): State<Arc<BookInstanceWorkflow>>,
    Path(id): Path<String>,
) -> Page {
    workflow.update_form(&RecordId::from(id)).await
}

async fn update(
    State(workflow): State<Arc<BookInstanceWorkflow>>,
    Path(id): Path<String>,
    form: FormData,
) -> Page {
    workflow.update(&RecordId::from(id), &form).await
}

async fn delete_form(
    State(workflow): State<Arc<BookInstanceWorkflow>>,
    Path(id): Path<String>,
) -> Page {
    workflow.delete_form(&RecordId::from(id)).await
}

async fn delete(
    State(workflow): State<Arc<BookInstanceWorkflow>>,
    Path(id): Path<String>,
) -> Page {
    workflow.delete(&RecordId::from(id)).await
}

/// Create a new instance of the bookinstances module
pub fn create_module(catalog: Catalog) -> Arc<dyn Module> {
    Arc::new(BookInstancesModule::new(catalog))
}
