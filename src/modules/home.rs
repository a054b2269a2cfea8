//! Catalog home page with record counts.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{extract::State, routing::get, Router};
use locallib_db::{Filter, StoreError};
use locallib_http::{Outcome, View};
use locallib_kernel::Module;
use maud::{html, Markup};

use super::authors::Author;
use super::book_instances::{BookInstance, LoanStatus};
use super::books::Book;
use super::genres::Genre;
use crate::catalog::{Catalog, Entity};
use crate::lookup::NamedFetch;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogCounts {
    pub books: u64,
    pub copies: u64,
    pub available: u64,
    pub authors: u64,
    pub genres: u64,
}

/// The `index` page. Counts are absent when the store could not be read.
#[derive(Debug)]
pub struct HomeView {
    pub counts: Option<CatalogCounts>,
    pub error: Option<String>,
}

impl View for HomeView {
    fn template(&self) -> &'static str {
        "index"
    }

    fn title(&self) -> Markup {
        html! { "Local Library Home" }
    }

    fn body(&self) -> Markup {
        html! {
            p { "Welcome to " em { "LocalLibrary" } ", a very basic catalog site." }
            @match &self.counts {
                Some(counts) => {
                    h2 { "Dynamic content" }
                    p { "The library has the following record counts:" }
                    ul {
                        li { strong { "Books:" } " " (counts.books) }
                        li { strong { "Copies:" } " " (counts.copies) }
                        li { strong { "Copies available:" } " " (counts.available) }
                        li { strong { "Authors:" } " " (counts.authors) }
                        li { strong { "Genres:" } " " (counts.genres) }
                    }
                }
                None => {
                    p class="error" {
                        "Error: " (self.error.as_deref().unwrap_or("counts unavailable"))
                    }
                }
            }
        }
    }
}

pub struct HomeModule {
    catalog: Catalog,
}

impl HomeModule {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl Module for HomeModule {
    fn name(&self) -> &'static str {
        "home"
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", get(index))
            .with_state(self.catalog.clone())
    }
}

/// GET /catalog
async fn index(State(catalog): State<Catalog>) -> Outcome<HomeView> {
    let view = match counts(&catalog).await {
        Ok(counts) => HomeView {
            counts: Some(counts),
            error: None,
        },
        Err(err) => {
            tracing::warn!(error = %err, "home page counts unavailable");
            HomeView {
                counts: None,
                error: Some(err.to_string()),
            }
        }
    };
    Outcome::Render(view)
}

pub async fn counts(catalog: &Catalog) -> Result<CatalogCounts, StoreError> {
    let available = Filter::eq("status", LoanStatus::Available.as_str());
    let mut results = NamedFetch::new()
        .with("books", count::<Book>(catalog, Filter::All))
        .with("copies", count::<BookInstance>(catalog, Filter::All))
        .with("available", count::<BookInstance>(catalog, available))
        .with("authors", count::<Author>(catalog, Filter::All))
        .with("genres", count::<Genre>(catalog, Filter::All))
        .run()
        .await?;

    let mut take = |name: &str| results.take(name).unwrap_or_default();
    Ok(CatalogCounts {
        books: take("books"),
        copies: take("copies"),
        available: take("available"),
        authors: take("authors"),
        genres: take("genres"),
    })
}

fn count<T: Entity>(
    catalog: &Catalog,
    filter: Filter,
) -> impl Future<Output = Result<u64, StoreError>> + Send + 'static {
    let catalog = catalog.clone();
    async move { catalog.count::<T>(&filter).await }
}

pub fn create_module(catalog: Catalog) -> Arc<dyn Module> {
    Arc::new(HomeModule::new(catalog))
}
