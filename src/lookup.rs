//! Named concurrent fetches.
//!
//! Form pages need several independent reference lists (authors, genres,
//! books) before they can render. [`NamedFetch`] runs them concurrently and
//! joins: either every lookup succeeds, or the first failure is returned and
//! the rest are aborted.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use locallib_db::StoreError;
use tokio::task::JoinSet;

use crate::catalog::{Catalog, Entity};
use crate::forms::Choice;

type Lookup<T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send>>;

/// Set of lookups keyed by name, run together by [`NamedFetch::run`].
pub struct NamedFetch<T> {
    lookups: Vec<(&'static str, Lookup<T>)>,
}

impl<T: Send + 'static> NamedFetch<T> {
    pub fn new() -> Self {
        Self {
            lookups: Vec::new(),
        }
    }

    pub fn with<F>(mut self, name: &'static str, lookup: F) -> Self
    where
        F: Future<Output = Result<T, StoreError>> + Send + 'static,
    {
        self.lookups.push((name, Box::pin(lookup)));
        self
    }

    /// Run every lookup concurrently and wait for all of them.
    pub async fn run(self) -> Result<NamedResults<T>, StoreError> {
        let mut tasks = JoinSet::new();
        for (name, lookup) in self.lookups {
            tasks.spawn(async move { (name, lookup.await) });
        }

        let mut results = HashMap::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            let (name, outcome) = joined.map_err(|err| StoreError::Task(err.to_string()))?;
            match outcome {
                Ok(value) => {
                    results.insert(name, value);
                }
                Err(err) => {
                    tracing::warn!(lookup = name, error = %err, "lookup failed");
                    tasks.abort_all();
                    return Err(err);
                }
            }
        }

        Ok(NamedResults { results })
    }
}

impl<T: Send + 'static> Default for NamedFetch<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Completed lookups keyed by name.
#[derive(Debug)]
pub struct NamedResults<T> {
    results: HashMap<&'static str, T>,
}

impl<T> NamedResults<T> {
    /// Take the result of `name` out of the set.
    pub fn take(&mut self, name: &str) -> Option<T> {
        self.results.remove(name)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Every record of `T` as an unchecked form choice.
pub async fn choices<T: Entity>(catalog: Catalog) -> Result<Vec<Choice>, StoreError> {
    Ok(catalog.all::<T>().await?.iter().map(Choice::of).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::genres::Genre;

    #[tokio::test]
    async fn joins_all_named_results() {
        let mut results = NamedFetch::new()
            .with("books", async { Ok(3_u64) })
            .with("authors", async { Ok(2_u64) })
            .run()
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results.take("books"), Some(3));
        assert_eq!(results.take("authors"), Some(2));
        assert_eq!(results.take("genres"), None);
    }

    #[tokio::test]
    async fn first_failure_wins_without_waiting_for_the_rest() {
        let outcome = NamedFetch::<u64>::new()
            .with("stuck", std::future::pending())
            .with("broken", async {
                Err(StoreError::Unavailable("connection reset".to_string()))
            })
            .run()
            .await;

        assert!(matches!(outcome, Err(StoreError::Unavailable(_))));
    }

    #[tokio::test]
    async fn empty_fetch_completes() {
        let results = NamedFetch::<u64>::new().run().await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn choices_list_records_unchecked() {
        let catalog = Catalog::in_memory();
        catalog.insert(Genre::new("Fantasy").unwrap()).await.unwrap();
        catalog.insert(Genre::new("Poetry").unwrap()).await.unwrap();

        let mut results = NamedFetch::new()
            .with("genres", choices::<Genre>(catalog.clone()))
            .run()
            .await
            .unwrap();

        let genres = results.take("genres").unwrap();
        let labels: Vec<_> = genres.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["Fantasy", "Poetry"]);
        assert!(genres.iter().all(|c| !c.checked));
    }
}
