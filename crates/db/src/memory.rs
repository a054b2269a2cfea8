use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{Body, Document, DocumentStore, Filter, RecordId, StoreError};

/// Collection name to documents, in insertion order.
pub type Snapshot = BTreeMap<String, Vec<Document>>;

/// In-process document store.
///
/// Also the substitute backend for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            collections: RwLock::new(snapshot.into_iter().collect()),
        }
    }

    /// Copy out every collection.
    pub async fn snapshot(&self) -> Snapshot {
        let collections = self.collections.read().await;
        collections
            .iter()
            .map(|(name, docs)| (name.clone(), docs.clone()))
            .collect()
    }

    pub fn into_snapshot(self) -> Snapshot {
        self.collections.into_inner().into_iter().collect()
    }

    /// Replace every collection with the contents of `snapshot`.
    pub async fn restore(&self, snapshot: Snapshot) {
        *self.collections.write().await = snapshot.into_iter().collect();
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, collection: &str, body: Body) -> Result<RecordId, StoreError> {
        let id = RecordId::generate();
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .push(Document {
                id: id.clone(),
                body,
            });
        Ok(id)
    }

    async fn get(&self, collection: &str, id: &RecordId) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| &doc.id == id))
            .cloned())
    }

    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| filter.matches(&doc.body))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn count(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError> {
        let collections = self.collections.read().await;
        let count = collections
            .get(collection)
            .map(|docs| docs.iter().filter(|doc| filter.matches(&doc.body)).count())
            .unwrap_or(0);
        u64::try_from(count).map_err(|err| StoreError::Invalid(err.to_string()))
    }

    async fn replace(
        &self,
        collection: &str,
        id: &RecordId,
        body: Body,
    ) -> Result<Option<Document>, StoreError> {
        let mut collections = self.collections.write().await;
        let Some(doc) = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|doc| &doc.id == id))
        else {
            return Ok(None);
        };
        doc.body = body;
        Ok(Some(doc.clone()))
    }

    async fn remove(&self, collection: &str, id: &RecordId) -> Result<bool, StoreError> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(false);
        };
        let before = docs.len();
        docs.retain(|doc| &doc.id != id);
        Ok(docs.len() != before)
    }
}
