#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::{json, Map, Value};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use uuid::Uuid;

use campus_api::config::AppConfig;
use campus_api::database::{Collection, DocumentStore, MemoryDocumentStore};
use campus_api::AppState;

pub struct TestServer {
    pub base_url: String,
    pub client: reqwest::Client,
    handle: JoinHandle<()>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Start the router on a free port, backed by `store`
pub async fn spawn_server(store: Arc<dyn DocumentStore>) -> Result<TestServer> {
    // Pick an unused port for isolation
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind test listener")?;

    let router = campus_api::app(AppState::new(store), &AppConfig::from_env());
    let handle = tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    Ok(TestServer {
        base_url: format!("http://127.0.0.1:{}", port),
        client: reqwest::Client::new(),
        handle,
    })
}

/// Server over a fresh in-memory store; the store is returned for seeding and inspection
pub async fn memory_server() -> Result<(TestServer, Arc<MemoryDocumentStore>)> {
    let store = Arc::new(MemoryDocumentStore::new());
    let server = spawn_server(store.clone()).await?;
    Ok((server, store))
}

pub fn class_payload() -> Value {
    json!({
        "subject": "Data Structures",
        "instructor": "Prof. Akter",
        "dayOfWeek": "Tuesday",
        "startTime": "10:00",
        "endTime": "11:30"
    })
}

pub async fn seed_transaction(store: &MemoryDocumentStore, date: &str, amount: i64) -> Result<Uuid> {
    let mut fields = Map::new();
    fields.insert("date".into(), json!(date));
    fields.insert("amount".into(), json!(amount));
    fields.insert("category".into(), json!("books"));
    Ok(store.insert_one(Collection::Transactions, fields).await?)
}

/// Assert the `{success, data, error}` shape and return the body
pub async fn envelope(res: reqwest::Response) -> Result<Value> {
    let body = res.json::<Value>().await?;
    let obj = body.as_object().context("response body is not an object")?;
    assert_eq!(obj.len(), 3, "envelope must have exactly three keys: {}", body);
    assert!(obj.get("success").map_or(false, Value::is_boolean), "missing success flag: {}", body);
    assert!(obj.contains_key("data"), "missing data field: {}", body);
    assert!(obj.contains_key("error"), "missing error field: {}", body);
    Ok(body)
}
