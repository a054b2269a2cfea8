use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::memory::{MemoryStore, Snapshot};
use crate::{Body, Document, DocumentStore, Filter, RecordId, StoreError};

/// Document store persisted as a single JSON snapshot file.
///
/// Reads are served from memory. A write is applied to a staged copy, the
/// copy is written through a temporary file and a rename, and only then does
/// it replace the in-memory state. A failed write changes neither.
#[derive(Debug)]
pub struct FileStore {
    inner: MemoryStore,
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Open the snapshot at `path`, starting empty when the file does not exist.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let inner = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let snapshot: Snapshot = serde_json::from_slice(&bytes).map_err(|err| {
                    StoreError::Corrupt(format!("{}: {err}", path.display()))
                })?;
                MemoryStore::from_snapshot(snapshot)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    tokio::fs::create_dir_all(parent).await?;
                }
                MemoryStore::new()
            }
            Err(err) => return Err(err.into()),
        };

        tracing::debug!(target: "locallib-db", path = %path.display(), "snapshot opened");

        Ok(Self {
            inner,
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Copy of the current state for a write to work on.
    ///
    /// Callers hold `write_lock` from staging until commit.
    async fn stage(&self) -> MemoryStore {
        MemoryStore::from_snapshot(self.inner.snapshot().await)
    }

    /// Persist `staged`, then make it the state reads see.
    async fn commit(&self, staged: MemoryStore) -> Result<(), StoreError> {
        let snapshot = staged.into_snapshot();
        let bytes = serde_json::to_vec_pretty(&snapshot)
            .map_err(|err| StoreError::Invalid(err.to_string()))?;

        let tmp = self.path.with_extension("json.tmp");
        if let Err(err) = write_and_rename(&tmp, &self.path, bytes).await {
            tracing::error!(
                target: "locallib-db",
                path = %self.path.display(),
                error = %err,
                "snapshot write failed; change discarded"
            );
            return Err(err.into());
        }

        self.inner.restore(snapshot).await;
        Ok(())
    }
}

async fn write_and_rename(tmp: &Path, path: &Path, bytes: Vec<u8>) -> std::io::Result<()> {
    tokio::fs::write(tmp, bytes).await?;
    tokio::fs::rename(tmp, path).await
}

#[async_trait]
impl DocumentStore for FileStore {
    async fn insert(&self, collection: &str, body: Body) -> Result<RecordId, StoreError> {
        let _guard = self.write_lock.lock().await;
        let staged = self.stage().await;
        let id = staged.insert(collection, body).await?;
        self.commit(staged).await?;
        Ok(id)
    }

    async fn get(&self, collection: &str, id: &RecordId) -> Result<Option<Document>, StoreError> {
        self.inner.get(collection, id).await
    }

    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>, StoreError> {
        self.inner.find(collection, filter).await
    }

    async fn count(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError> {
        self.inner.count(collection, filter).await
    }

    async fn replace(
        &self,
        collection: &str,
        id: &RecordId,
        body: Body,
    ) -> Result<Option<Document>, StoreError> {
        let _guard = self.write_lock.lock().await;
        let staged = self.stage().await;
        let replaced = staged.replace(collection, id, body).await?;
        if replaced.is_some() {
            self.commit(staged).await?;
        }
        Ok(replaced)
    }

    async fn remove(&self, collection: &str, id: &RecordId) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock().await;
        let staged = self.stage().await;
        let removed = staged.remove(collection, id).await?;
        if removed {
            self.commit(staged).await?;
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn body(value: Value) -> Body {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[tokio::test]
    async fn documents_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("catalog.json");

        let id = {
            let store = FileStore::open(&path).await.unwrap();
            store
                .insert("authors", body(json!({"first_name": "Ursula"})))
                .await
                .unwrap()
        };

        let reopened = FileStore::open(&path).await.unwrap();
        let doc = reopened.get("authors", &id).await.unwrap().unwrap();
        assert_eq!(doc.body["first_name"], "Ursula");
    }

    #[tokio::test]
    async fn corrupt_snapshot_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        tokio::fs::write(&path, b"not json").await.unwrap();

        let err = FileStore::open(&path).await.err();
        assert!(matches!(err, Some(StoreError::Corrupt(_))));
    }

    #[tokio::test]
    async fn remove_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");

        let store = FileStore::open(&path).await.unwrap();
        let id = store
            .insert("genres", body(json!({"name": "Poetry"})))
            .await
            .unwrap();
        assert!(store.remove("genres", &id).await.unwrap());

        let reopened = FileStore::open(&path).await.unwrap();
        assert!(reopened.get("genres", &id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn failed_write_changes_neither_memory_nor_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        let store = FileStore::open(&path).await.unwrap();
        let poetry = store
            .insert("genres", body(json!({"name": "Poetry"})))
            .await
            .unwrap();

        // A directory where the temporary snapshot goes makes every write fail.
        let tmp = path.with_extension("json.tmp");
        tokio::fs::create_dir(&tmp).await.unwrap();

        let err = store.insert("genres", body(json!({"name": "Fantasy"}))).await;
        assert!(matches!(err, Err(StoreError::Io(_))));
        let err = store
            .replace("genres", &poetry, body(json!({"name": "Verse"})))
            .await;
        assert!(matches!(err, Err(StoreError::Io(_))));
        assert!(matches!(store.remove("genres", &poetry).await, Err(StoreError::Io(_))));

        let docs = store.find("genres", &Filter::All).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].body["name"], "Poetry");

        tokio::fs::remove_dir(&tmp).await.unwrap();
        store
            .insert("genres", body(json!({"name": "Drama"})))
            .await
            .unwrap();

        let reopened = FileStore::open(&path).await.unwrap();
        let names: Vec<_> = reopened
            .find("genres", &Filter::All)
            .await
            .unwrap()
            .into_iter()
            .map(|doc| doc.body["name"].clone())
            .collect();
        assert_eq!(names, vec![json!("Poetry"), json!("Drama")]);
    }
}
