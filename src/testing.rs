//! Test doubles shared by the unit tests.

use std::sync::Arc;

use async_trait::async_trait;
use locallib_db::{Body, Document, DocumentStore, Filter, RecordId, StoreError};

use crate::catalog::Catalog;
use crate::modules::books::Book;

/// Store whose every call fails as if the backend were unreachable.
pub struct FailingStore;

fn offline<T>() -> Result<T, StoreError> {
    Err(StoreError::Unavailable("store offline".to_string()))
}

#[async_trait]
impl DocumentStore for FailingStore {
    async fn insert(&self, _collection: &str, _body: Body) -> Result<RecordId, StoreError> {
        offline()
    }

    async fn get(&self, _collection: &str, _id: &RecordId) -> Result<Option<Document>, StoreError> {
        offline()
    }

    async fn find(&self, _collection: &str, _filter: &Filter) -> Result<Vec<Document>, StoreError> {
        offline()
    }

    async fn count(&self, _collection: &str, _filter: &Filter) -> Result<u64, StoreError> {
        offline()
    }

    async fn replace(
        &self,
        _collection: &str,
        _id: &RecordId,
        _body: Body,
    ) -> Result<Option<Document>, StoreError> {
        offline()
    }

    async fn remove(&self, _collection: &str, _id: &RecordId) -> Result<bool, StoreError> {
        offline()
    }
}

pub fn failing_catalog() -> Catalog {
    Catalog::new(Arc::new(FailingStore))
}

/// A valid book by a placeholder author.
pub fn sample_book(title: &str, genre: Vec<RecordId>) -> Book {
    Book::new(title, "author-1", "A summary", "0000000000", genre).expect("sample book is valid")
}
