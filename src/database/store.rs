use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use crate::filter::{FilterData, FilterError};

/// Key under which a document's identifier is exposed
pub const ID_FIELD: &str = "id";

/// Named groupings of documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Classes,
    Transactions,
}

impl Collection {
    pub const ALL: [Collection; 2] = [Collection::Classes, Collection::Transactions];

    pub fn name(&self) -> &'static str {
        match self {
            Collection::Classes => "classes",
            Collection::Transactions => "transactions",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors from a document store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error("document {id} could not be decoded: {source}")]
    Decode {
        id: Uuid,
        #[source]
        source: serde_json::Error,
    },

    #[error("database unavailable: {0}")]
    Unavailable(String),
}

/// A stored document: its identifier plus the body fields
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: Uuid,
    pub fields: Map<String, Value>,
}

impl Document {
    /// Flatten into a single JSON object with the identifier under `id`
    pub fn into_value(self) -> Value {
        let mut obj = Map::with_capacity(self.fields.len() + 1);
        obj.insert(ID_FIELD.into(), Value::String(self.id.to_string()));
        for (k, v) in self.fields {
            if k == ID_FIELD { continue; }
            obj.insert(k, v);
        }
        Value::Object(obj)
    }

    pub fn decode<T: DeserializeOwned>(self) -> Result<T, StoreError> {
        let id = self.id;
        serde_json::from_value(self.into_value()).map_err(|source| StoreError::Decode { id, source })
    }
}

/// Outcome of an update-one call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateResult {
    pub matched_count: u64,
    pub modified_count: u64,
}

/// Collection-scoped document operations
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Backend name for logging
    fn name(&self) -> &'static str;

    /// Insert a document and return the identifier assigned to it
    async fn insert_one(&self, collection: Collection, fields: Map<String, Value>) -> Result<Uuid, StoreError>;

    /// Documents matching the filter, in insertion order
    async fn find(&self, collection: Collection, filter: FilterData) -> Result<Vec<Document>, StoreError>;

    /// Set the patch keys on the document with this id
    async fn update_one(&self, collection: Collection, id: Uuid, patch: Map<String, Value>) -> Result<UpdateResult, StoreError>;

    /// Returns the number of documents deleted (0 or 1)
    async fn delete_one(&self, collection: Collection, id: Uuid) -> Result<u64, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;

    /// Release connections. Called once at shutdown.
    async fn close(&self) {}
}

/// Merge `patch` into `fields`. Returns whether anything changed.
pub fn apply_patch(fields: &mut Map<String, Value>, patch: Map<String, Value>) -> bool {
    let mut changed = false;
    for (key, value) in patch {
        if key == ID_FIELD { continue; }
        if fields.get(&key) != Some(&value) {
            fields.insert(key, value);
            changed = true;
        }
    }
    changed
}

/// Stand-in used when the startup connection failed. Every call fails.
#[derive(Debug, Clone)]
pub struct UnavailableStore {
    reason: String,
}

impl UnavailableStore {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }

    fn error(&self) -> StoreError {
        StoreError::Unavailable(self.reason.clone())
    }
}

#[async_trait]
impl DocumentStore for UnavailableStore {
    fn name(&self) -> &'static str {
        "unavailable"
    }

    async fn insert_one(&self, _collection: Collection, _fields: Map<String, Value>) -> Result<Uuid, StoreError> {
        Err(self.error())
    }

    async fn find(&self, _collection: Collection, _filter: FilterData) -> Result<Vec<Document>, StoreError> {
        Err(self.error())
    }

    async fn update_one(&self, _collection: Collection, _id: Uuid, _patch: Map<String, Value>) -> Result<UpdateResult, StoreError> {
        Err(self.error())
    }

    async fn delete_one(&self, _collection: Collection, _id: Uuid) -> Result<u64, StoreError> {
        Err(self.error())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Err(self.error())
    }
}
