//! Document store for the library catalog.
//!
//! Records live in named collections as JSON objects. Identity is assigned by
//! the store on insert and never changes afterwards. Two backends ship with the
//! crate: [`MemoryStore`] for tests and throwaway runs, and [`FileStore`] which
//! keeps a JSON snapshot on disk.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

pub mod error;
pub mod file;
pub mod filter;
pub mod memory;

pub use error::StoreError;
pub use file::FileStore;
pub use filter::Filter;
pub use memory::MemoryStore;

/// JSON object body of a stored document.
pub type Body = Map<String, Value>;

/// Store handle shared across request handlers.
pub type SharedStore = Arc<dyn DocumentStore>;

const MEMORY_SCHEME: &str = "memory://";
const FILE_SCHEME: &str = "file://";

/// Opaque store-assigned identity of a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Mint a fresh, time-ordered identity.
    pub fn generate() -> Self {
        Self(Uuid::now_v7().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A stored document: identity plus body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: RecordId,
    pub body: Body,
}

/// Storage capability the catalog depends on.
///
/// Every operation touches a single document (or reads a collection) and is
/// atomic at that granularity only. There are no multi-document transactions.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a new document and return the identity the store assigned.
    async fn insert(&self, collection: &str, body: Body) -> Result<RecordId, StoreError>;

    /// Fetch one document by identity.
    async fn get(&self, collection: &str, id: &RecordId) -> Result<Option<Document>, StoreError>;

    /// Fetch every document matching `filter`, in insertion order.
    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>, StoreError>;

    /// Count documents matching `filter`.
    async fn count(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError>;

    /// Replace the body of an existing document, keeping its identity.
    ///
    /// Returns `None` when no document has that identity; never creates one.
    async fn replace(
        &self,
        collection: &str,
        id: &RecordId,
        body: Body,
    ) -> Result<Option<Document>, StoreError>;

    /// Remove a document. Returns whether a document was removed.
    async fn remove(&self, collection: &str, id: &RecordId) -> Result<bool, StoreError>;
}

/// Open a store from an endpoint such as `memory://` or `file://data/catalog.json`.
pub async fn connect(endpoint: &str) -> Result<SharedStore, StoreError> {
    if endpoint == MEMORY_SCHEME || endpoint == "memory" {
        tracing::info!(target: "locallib-db", "using in-memory document store");
        return Ok(Arc::new(MemoryStore::new()));
    }

    if let Some(path) = endpoint.strip_prefix(FILE_SCHEME) {
        if path.is_empty() {
            return Err(StoreError::Invalid("file endpoint is missing a path".to_string()));
        }
        tracing::info!(target: "locallib-db", path, "using file-backed document store");
        let store = FileStore::open(path).await?;
        return Ok(Arc::new(store));
    }

    Err(StoreError::Invalid(format!(
        "unsupported store endpoint '{endpoint}'; expected memory:// or file://<path>"
    )))
}
