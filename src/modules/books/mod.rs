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

pub use models::Book;
use views::BookView;
use workflow::BookWorkflow;

use crate::catalog::Catalog;
use crate::forms::FormData;

type Page = Result<Outcome<BookView>, AppError>;

/// Books module: the catalog's reference CRUD workflow
pub struct BooksModule {
    workflow: Arc<BookWorkflow>,
}

impl BooksModule {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            workflow: Arc::new(BookWorkflow::new(catalog)),
        }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/books", get(list_books))
            .route("/book/create", get(create_form).post(create_book))
            .route("/book/{id}", get(book_detail))
            .route("/book/{id}/update", get(update_form).post(update_book))
            .route("/book/{id}/delete", get(delete_form).post(delete_book))
            .with_state(self.workflow.clone())
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// GET /catalog/books
async fn list_books(State(workflow): State<Arc<BookWorkflow>>) -> Page {
    workflow.list().await
}

/// GET /catalog/book/{id}
async fn book_detail(State(workflow): State<Arc<BookWorkflow>>, Path(id): Path<String>) -> Page {
    workflow.detail(&RecordId::from(id)).await
}

/// GET /catalog/book/create
async fn create_form(State(workflow): State<Arc<BookWorkflow>>) -> Page {
    workflow.create_form().await
}

/// POST /catalog/book/create
async fn create_book(State(workflow): State<Arc<BookWorkflow>>, form: FormData) -> Page {
    workflow.create(&form).await
}

/// GET /catalog/book/{id}/update
async fn update_form(State(workflow): State<Arc<BookWorkflow>>, Path(id): Path<String>) -> Page {
    workflow.update_form(&RecordId::from(id)).await
}

/// POST /catalog/book/{id}/update
async fn update_book(
    State(workflow): State<Arc<BookWorkflow>>,
    Path(id): Path<String>,
    form: FormData,
) -> Page {
    workflow.update(&RecordId::from(id), &form).await
}

/// GET /catalog/book/{id}/delete
async fn delete_form(State(workflow): State<Arc<BookWorkflow>>, Path(id): Path<String>) -> Page {
    workflow.delete_form(&RecordId::from(id)).await
}

/// POST /catalog/book/{id}/delete
async fn delete_book(State(workflow): State<Arc<BookWorkflow>>, Path(id): Path<String>) -> Page {
    workflow.delete(&RecordId::from(id)).await
}

/// Create a new instance of the books module
pub fn create_module(catalog: Catalog) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(catalog))
}
