use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::{
    postgres::{PgArguments, PgRow},
    query::Query,
    PgPool, Postgres, Row,
};
use tracing::{debug, info};
use uuid::Uuid;

use super::store::{apply_patch, Collection, Document, DocumentStore, StoreError, UpdateResult};
use crate::filter::{Filter, FilterData, FilterValue};

/// Document store over Postgres: one JSONB table per collection
#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Table definition for a collection. `seq` preserves insertion order.
    pub fn collection_ddl(collection: Collection) -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS \"{}\" (seq BIGSERIAL NOT NULL, id UUID PRIMARY KEY, data JSONB NOT NULL)",
            collection.name()
        )
    }

    /// Create any missing collection tables
    pub async fn ensure_collections(&self) -> Result<(), StoreError> {
        for collection in Collection::ALL {
            sqlx::query(&Self::collection_ddl(collection)).execute(&self.pool).await?;
            debug!("Ensured collection table: {}", collection);
        }
        Ok(())
    }

    fn bind_param<'q>(query: Query<'q, Postgres, PgArguments>, value: &FilterValue) -> Query<'q, Postgres, PgArguments> {
        match value {
            FilterValue::Null => query.bind(Option::<String>::None),
            FilterValue::Bool(b) => query.bind(*b),
            FilterValue::Number(n) => query.bind(*n),
            FilterValue::Timestamp(dt) => query.bind(*dt),
            FilterValue::Text(s) => query.bind(s.clone()),
        }
    }

    fn row_to_document(row: PgRow) -> Result<Document, StoreError> {
        let id: Uuid = row.try_get("id")?;
        let data: Value = row.try_get("data")?;
        let fields = match data {
            Value::Object(map) => map,
            other => {
                let mut map = Map::new();
                map.insert("value".into(), other);
                map
            }
        };
        Ok(Document { id, fields })
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    fn name(&self) -> &'static str {
        "postgres"
    }

    async fn insert_one(&self, collection: Collection, fields: Map<String, Value>) -> Result<Uuid, StoreError> {
        let sql = format!("INSERT INTO \"{}\" (id, data) VALUES ($1, $2) RETURNING id", collection.name());
        let row = sqlx::query(&sql)
            .bind(Uuid::new_v4())
            .bind(Value::Object(fields))
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("id")?)
    }

    async fn find(&self, collection: Collection, filter: FilterData) -> Result<Vec<Document>, StoreError> {
        let mut query_filter = Filter::new(collection.name())?;
        query_filter.assign(filter)?;
        let sql = query_filter.to_sql()?;
        debug!("find on {}: {}", collection, sql.query);

        let mut query = sqlx::query(&sql.query);
        for param in &sql.params {
            query = Self::bind_param(query, param);
        }

        query
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Self::row_to_document)
            .collect()
    }

    async fn update_one(&self, collection: Collection, id: Uuid, patch: Map<String, Value>) -> Result<UpdateResult, StoreError> {
        let mut tx = self.pool.begin().await?;

        let select = format!("SELECT id, data FROM \"{}\" WHERE id = $1 FOR UPDATE", collection.name());
        let Some(row) = sqlx::query(&select).bind(id).fetch_optional(&mut *tx).await? else {
            tx.rollback().await?;
            return Ok(UpdateResult::default());
        };

        let mut document = Self::row_to_document(row)?;
        if !apply_patch(&mut document.fields, patch) {
            tx.rollback().await?;
            return Ok(UpdateResult { matched_count: 1, modified_count: 0 });
        }

        let update = format!("UPDATE \"{}\" SET data = $2 WHERE id = $1", collection.name());
        let result = sqlx::query(&update)
            .bind(id)
            .bind(Value::Object(document.fields))
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(UpdateResult {
            matched_count: 1,
            modified_count: result.rows_affected(),
        })
    }

    async fn delete_one(&self, collection: Collection, id: Uuid) -> Result<u64, StoreError> {
        let sql = format!("DELETE FROM \"{}\" WHERE id = $1", collection.name());
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }
}
