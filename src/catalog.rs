//! Typed access to the document store.
//!
//! Entities are plain values; identity lives beside them in [`Record`]. The
//! [`Catalog`] is the only thing page workflows use to reach storage, so a
//! [`MemoryStore`] can stand in for the real backend.

use std::collections::HashMap;
use std::ops::Deref;
use std::sync::Arc;

use locallib_db::{Body, Document, Filter, MemoryStore, RecordId, SharedStore, StoreError};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

/// A catalog record type stored in its own collection.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection the records live in.
    const COLLECTION: &'static str;

    /// Detail page prefix; the record URL is `{URL_PREFIX}/{id}`.
    const URL_PREFIX: &'static str;

    /// Short text used for links and select options.
    fn label(&self) -> String;
}

/// A persisted entity and its store-assigned identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record<T> {
    pub id: RecordId,
    pub data: T,
}

impl<T: Entity> Record<T> {
    pub fn url(&self) -> String {
        format!("{}/{}", T::URL_PREFIX, self.id)
    }
}

impl<T> Deref for Record<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.data
    }
}

/// Handle to catalog storage, cheap to clone into handlers and lookups.
#[derive(Clone)]
pub struct Catalog {
    store: SharedStore,
}

impl Catalog {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Catalog over a fresh, empty in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub async fn all<T: Entity>(&self) -> Result<Vec<Record<T>>, StoreError> {
        self.find(&Filter::All).await
    }

    pub async fn find<T: Entity>(&self, filter: &Filter) -> Result<Vec<Record<T>>, StoreError> {
        self.store
            .find(T::COLLECTION, filter)
            .await?
            .into_iter()
            .map(decode::<T>)
            .collect()
    }

    pub async fn get<T: Entity>(&self, id: &RecordId) -> Result<Option<Record<T>>, StoreError> {
        self.store
            .get(T::COLLECTION, id)
            .await?
            .map(decode::<T>)
            .transpose()
    }

    pub async fn count<T: Entity>(&self, filter: &Filter) -> Result<u64, StoreError> {
        self.store.count(T::COLLECTION, filter).await
    }

    /// Persist a new record; the store picks the identity.
    pub async fn insert<T: Entity>(&self, value: T) -> Result<Record<T>, StoreError> {
        let id = self.store.insert(T::COLLECTION, encode(&value)?).await?;
        Ok(Record { id, data: value })
    }

    /// Replace the record with identity `id`. `None` when it does not exist.
    pub async fn replace<T: Entity>(
        &self,
        id: &RecordId,
        value: T,
    ) -> Result<Option<Record<T>>, StoreError> {
        let replaced = self.store.replace(T::COLLECTION, id, encode(&value)?).await?;
        Ok(replaced.map(|doc| Record {
            id: doc.id,
            data: value,
        }))
    }

    /// Remove by identity. Returns whether anything was removed.
    pub async fn remove<T: Entity>(&self, id: &RecordId) -> Result<bool, StoreError> {
        self.store.remove(T::COLLECTION, id).await
    }

    /// Every record keyed by identity, for resolving references in bulk.
    pub async fn index<T: Entity>(&self) -> Result<HashMap<RecordId, Record<T>>, StoreError> {
        Ok(self
            .all::<T>()
            .await?
            .into_iter()
            .map(|record| (record.id.clone(), record))
            .collect())
    }

    /// Resolve `ids` in the given order. Dangling ids are skipped.
    pub async fn resolve<T: Entity>(&self, ids: &[RecordId]) -> Result<Vec<Record<T>>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut by_id = self.index::<T>().await?;
        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }
}

fn encode<T: Entity>(value: &T) -> Result<Body, StoreError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(body)) => Ok(body),
        Ok(_) => Err(StoreError::Invalid(format!(
            "{} records must serialize to objects",
            T::COLLECTION
        ))),
        Err(err) => Err(StoreError::Invalid(err.to_string())),
    }
}

fn decode<T: Entity>(doc: Document) -> Result<Record<T>, StoreError> {
    let data = serde_json::from_value(Value::Object(doc.body)).map_err(|err| {
        StoreError::Corrupt(format!("{} record {}: {err}", T::COLLECTION, doc.id))
    })?;
    Ok(Record { id: doc.id, data })
}
