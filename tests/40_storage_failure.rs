mod common;

use std::sync::Arc;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;
use uuid::Uuid;

use campus_api::database::UnavailableStore;

async fn unavailable_server() -> Result<common::TestServer> {
    common::spawn_server(Arc::new(UnavailableStore::new("connection refused"))).await
}

#[tokio::test]
async fn storage_calls_answer_500_in_envelope() -> Result<()> {
    let server = unavailable_server().await?;
    let id = Uuid::new_v4();

    let requests = vec![
        server.client.get(server.url("/api/classes")),
        server.client.post(server.url("/api/classes")).json(&common::class_payload()),
        server.client.put(server.url(&format!("/api/classes/{}", id))).json(&json!({ "subject": "x" })),
        server.client.delete(server.url(&format!("/api/classes/{}", id))),
        server.client.get(server.url("/api/transactions?month=2024-03-01")),
    ];

    for request in requests {
        let res = request.send().await?;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = common::envelope(res).await?;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "database unavailable: connection refused");
    }

    Ok(())
}

#[tokio::test]
async fn validation_still_runs_before_storage() -> Result<()> {
    let server = unavailable_server().await?;

    let res = server.client.post(server.url("/api/classes")).json(&json!({ "subject": "Math" })).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = server.client.delete(server.url("/api/classes/bogus")).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn health_degrades_and_root_stays_up() -> Result<()> {
    let server = unavailable_server().await?;

    let res = server.client.get(server.url("/health")).send().await?;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = common::envelope(res).await?;
    assert_eq!(body["error"], "database unavailable");

    let res = server.client.get(server.url("/")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    Ok(())
}
