use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::store::{apply_patch, Collection, Document, DocumentStore, StoreError, UpdateResult};
use crate::filter::{Filter, FilterData, FilterWhere};

/// Process-local document store. Contents are lost on exit.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<Collection, Vec<Document>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently held in a collection
    pub async fn len(&self, collection: Collection) -> usize {
        self.collections.read().await.get(&collection).map_or(0, Vec::len)
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn insert_one(&self, collection: Collection, fields: Map<String, Value>) -> Result<Uuid, StoreError> {
        let id = Uuid::new_v4();
        let mut collections = self.collections.write().await;
        collections.entry(collection).or_default().push(Document { id, fields });
        Ok(id)
    }

    async fn find(&self, collection: Collection, filter: FilterData) -> Result<Vec<Document>, StoreError> {
        let mut query = Filter::new(collection.name())?;
        query.assign(filter)?;
        let conditions = query.conditions()?;

        let collections = self.collections.read().await;
        let documents: Vec<Document> = collections
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| FilterWhere::matches(&conditions, &doc.fields))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(documents)
    }

    async fn update_one(&self, collection: Collection, id: Uuid, patch: Map<String, Value>) -> Result<UpdateResult, StoreError> {
        let mut collections = self.collections.write().await;
        let target = collections
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|doc| doc.id == id));

        Ok(match target {
            Some(doc) => UpdateResult {
                matched_count: 1,
                modified_count: u64::from(apply_patch(&mut doc.fields, patch)),
            },
            None => UpdateResult::default(),
        })
    }

    async fn delete_one(&self, collection: Collection, id: Uuid) -> Result<u64, StoreError> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(&collection) else {
            return Ok(0);
        };
        match docs.iter().position(|doc| doc.id == id) {
            Some(index) => {
                docs.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn find_returns_insertion_order() {
        let store = MemoryDocumentStore::new();
        let first = store.insert_one(Collection::Classes, map(json!({ "subject": "A" }))).await.unwrap();
        let second = store.insert_one(Collection::Classes, map(json!({ "subject": "B" }))).await.unwrap();

        let docs = store.find(Collection::Classes, FilterData::all()).await.unwrap();
        assert_eq!(docs.iter().map(|d| d.id).collect::<Vec<_>>(), vec![first, second]);
        assert!(store.find(Collection::Transactions, FilterData::all()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn find_applies_filter() {
        let store = MemoryDocumentStore::new();
        store.insert_one(Collection::Transactions, map(json!({ "date": "2024-03-10T00:00:00Z" }))).await.unwrap();
        store.insert_one(Collection::Transactions, map(json!({ "date": "2024-05-10T00:00:00Z" }))).await.unwrap();

        let filter = FilterData::with_where(json!({ "date": { "$gte": "2024-03-01T00:00:00Z", "$lt": "2024-04-01T00:00:00Z" } }));
        let docs = store.find(Collection::Transactions, filter).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].fields["date"], json!("2024-03-10T00:00:00Z"));
    }

    #[tokio::test]
    async fn update_counts_matched_and_modified() {
        let store = MemoryDocumentStore::new();
        let id = store.insert_one(Collection::Classes, map(json!({ "subject": "A" }))).await.unwrap();

        let result = store.update_one(Collection::Classes, id, map(json!({ "subject": "A" }))).await.unwrap();
        assert_eq!(result, UpdateResult { matched_count: 1, modified_count: 0 });

        let result = store.update_one(Collection::Classes, id, map(json!({ "subject": "B" }))).await.unwrap();
        assert_eq!(result, UpdateResult { matched_count: 1, modified_count: 1 });

        let result = store.update_one(Collection::Classes, Uuid::new_v4(), map(json!({ "subject": "C" }))).await.unwrap();
        assert_eq!(result, UpdateResult::default());
    }

    #[tokio::test]
    async fn delete_removes_once() {
        let store = MemoryDocumentStore::new();
        let id = store.insert_one(Collection::Classes, map(json!({ "subject": "A" }))).await.unwrap();

        assert_eq!(store.delete_one(Collection::Classes, id).await.unwrap(), 1);
        assert_eq!(store.delete_one(Collection::Classes, id).await.unwrap(), 0);
        assert_eq!(store.len(Collection::Classes).await, 0);
    }
}
