use std::net::SocketAddr;

use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use service::items::MemoryItemStore;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use server::routes::{self, ServerState};

struct TestApp {
    base_url: String,
    shutdown: Option<oneshot::Sender<()>>,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

async fn start_server() -> anyhow::Result<TestApp> {
    let app = routes::build_router(ServerState::new(MemoryItemStore::new()));
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    let (tx, rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        let shutdown = async move {
            let _ = rx.await;
        };
        if let Err(e) = server::serve(listener, app, shutdown).await {
            eprintln!("server error: {}", e);
        }
    });

    Ok(TestApp { base_url, shutdown: Some(tx) })
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = reqwest::get(format!("{}/health", app.base_url)).await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn e2e_item_lifecycle_over_tcp() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = reqwest::Client::new();

    let res = c.post(format!("{}/items", app.base_url))
        .json(&json!({"name": "A", "description": "d1"}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let created = res.json::<Value>().await?;
    assert_eq!(created, json!({"id": 1, "name": "A", "description": "d1"}));

    let res = c.put(format!("{}/item?id=1", app.base_url))
        .json(&json!({"name": "A2", "description": "d1b"}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?["name"], "A2");

    let res = c.get(format!("{}/items", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!([{"id": 1, "name": "A2", "description": "d1b"}]));

    let res = c.delete(format!("{}/item?id=1", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NO_CONTENT);

    let res = c.get(format!("{}/item?id=1", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    assert!(res.headers()["content-type"].to_str()?.starts_with("text/plain"));
    assert_eq!(res.text().await?, "Item not found\n");
    Ok(())
}

#[tokio::test]
async fn e2e_concurrent_creates_get_distinct_ids() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = reqwest::Client::new();

    let mut handles = Vec::new();
    for n in 0..16 {
        let c = c.clone();
        let url = format!("{}/items", app.base_url);
        handles.push(tokio::spawn(async move {
            let res = c.post(url).json(&json!({"name": n.to_string(), "description": ""})).send().await?;
            anyhow::ensure!(res.status() == HttpStatusCode::CREATED, "status {}", res.status());
            let item = res.json::<Value>().await?;
            item["id"].as_i64().ok_or_else(|| anyhow::anyhow!("missing id"))
        }));
    }
    let mut ids = Vec::new();
    for h in handles {
        ids.push(h.await??);
    }
    ids.sort_unstable();
    assert_eq!(ids, (1..=16).collect::<Vec<i64>>());
    Ok(())
}
