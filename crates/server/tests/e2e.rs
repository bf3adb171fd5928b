use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use serde_json::json;
use service::file::invoice_store::InvoiceStore;
use tokio::net::TcpListener;
use uuid::Uuid;

use server::{routes, startup};

struct TestApp {
    base_url: String,
}

async fn start_server() -> anyhow::Result<TestApp> {
    // Isolated temp data file per test run
    let data_path = format!("target/test-data/{}/invoices.json", Uuid::new_v4());
    let store = InvoiceStore::new(&data_path).await;

    let cors = startup::build_cors(&["http://localhost:4200".to_string()]);
    let app: Router = routes::build_router(Arc::clone(&store), cors);

    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {}", e);
        }
    });

    Ok(TestApp { base_url })
}

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

#[tokio::test]
async fn e2e_health() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client().get(format!("{}/health", app.base_url)).send().await?;
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    let body: serde_json::Value = res.json().await?;
    assert_eq!(body, json!({"status": "ok"}));
    Ok(())
}

#[tokio::test]
async fn e2e_invoice_crud_flow() -> anyhow::Result<()> {
    let app = start_server().await?;
    let client = client();
    let base = format!("{}/api/invoices", app.base_url);

    // empty collection to start
    let res = client.get(&base).send().await?;
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    let body: serde_json::Value = res.json().await?;
    assert_eq!(body, json!([]));

    // create
    let res = client
        .post(&base)
        .json(&json!({"id": "A", "total": 100}))
        .send()
        .await?;
    assert_eq!(res.status(), reqwest::StatusCode::CREATED);
    let created: serde_json::Value = res.json().await?;
    assert_eq!(created, json!({"id": "A", "total": 100}));

    // get by id
    let res = client.get(format!("{}/A", base)).send().await?;
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    let fetched: serde_json::Value = res.json().await?;
    assert_eq!(fetched, json!({"id": "A", "total": 100}));

    // partial update merges over existing fields
    let res = client
        .put(format!("{}/A", base))
        .json(&json!({"total": 150}))
        .send()
        .await?;
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    let merged: serde_json::Value = res.json().await?;
    assert_eq!(merged, json!({"id": "A", "total": 150}));

    // delete returns the removed record
    let res = client.delete(format!("{}/A", base)).send().await?;
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    let removed: serde_json::Value = res.json().await?;
    assert_eq!(removed, json!({"id": "A", "total": 150}));

    // gone afterwards
    let res = client.get(format!("{}/A", base)).send().await?;
    assert_eq!(res.status(), reqwest::StatusCode::NOT_FOUND);
    let body: serde_json::Value = res.json().await?;
    assert_eq!(body, json!({"message": "Invoice not found"}));

    Ok(())
}

#[tokio::test]
async fn e2e_not_found_payloads() -> anyhow::Result<()> {
    let app = start_server().await?;
    let client = client();
    let base = format!("{}/api/invoices", app.base_url);

    for res in [
        client.get(format!("{}/missing", base)).send().await?,
        client
            .put(format!("{}/missing", base))
            .json(&json!({"total": 1}))
            .send()
            .await?,
        client.delete(format!("{}/missing", base)).send().await?,
    ] {
        assert_eq!(res.status(), reqwest::StatusCode::NOT_FOUND);
        let body: serde_json::Value = res.json().await?;
        assert_eq!(body, json!({"message": "Invoice not found"}));
    }

    Ok(())
}

#[tokio::test]
async fn e2e_create_without_id() -> anyhow::Result<()> {
    let app = start_server().await?;
    let client = client();
    let base = format!("{}/api/invoices", app.base_url);

    // any JSON object is a valid invoice, id included or not
    let res = client.post(&base).json(&json!({"total": 42})).send().await?;
    assert_eq!(res.status(), reqwest::StatusCode::CREATED);

    let res = client.get(&base).send().await?;
    let body: serde_json::Value = res.json().await?;
    assert_eq!(body, json!([{"total": 42}]));

    Ok(())
}
