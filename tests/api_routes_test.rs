use httpmock::prelude::*;
use pubchem_proxy::{build_router, AppState, DocumentPreviewer, PubChemClient};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

async fn spawn_app(upstream: &MockServer) -> SocketAddr {
    let client = PubChemClient::new(upstream.base_url(), Duration::from_secs(5)).unwrap();
    let previewer = DocumentPreviewer::new(Duration::from_secs(5)).unwrap();
    let app = build_router(AppState::new(Arc::new(client), previewer, 4));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    addr
}

#[tokio::test]
async fn test_health_and_root() {
    let upstream = MockServer::start();
    let addr = spawn_app(&upstream).await;

    let health: serde_json::Value = reqwest::get(format!("http://{}/health", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "ok");

    let root: serde_json::Value = reqwest::get(format!("http://{}/", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(root["Hello"], "World");
}

#[tokio::test]
async fn test_augment_endpoint_returns_records() {
    let upstream = MockServer::start();
    upstream.mock(|when, then| {
        when.method(GET).path("/compound/name/64-17-5/cids/JSON");
        then.status(200)
            .json_body(serde_json::json!({"IdentifierList": {"CID": [702]}}));
    });
    upstream.mock(|when, then| {
        when.method(GET).path_contains("/compound/cid/702/property/");
        then.status(200).json_body(serde_json::json!({
            "PropertyTable": {"Properties": [
                {"CID": 702, "CanonicalSMILES": "CCO", "MolecularWeight": "46.07"}
            ]}
        }));
    });
    let addr = spawn_app(&upstream).await;

    let response = reqwest::Client::new()
        .post(format!("http://{}/compounds/augment", addr))
        .json(&serde_json::json!([{"identifier": "64-17-5", "quantity": 12.5}]))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["identifier"], "64-17-5");
    assert_eq!(body[0]["normalized_quantity"], 100.0);
    assert_eq!(body[0]["canonical_structure"], "CCO");
    assert!(body[0]["log_p"].is_null());
}

#[tokio::test]
async fn test_augment_endpoint_rejects_bad_input() {
    let upstream = MockServer::start();
    let addr = spawn_app(&upstream).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("http://{}/compounds/augment", addr))
        .json(&serde_json::json!([{"identifier": "50-00-0", "quantity": 0}]))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "invalid_input");

    let response = client
        .post(format!("http://{}/compounds/augment", addr))
        .json(&serde_json::json!({"identifier": "50-00-0"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_compound_record_is_proxied_unmodified() {
    let upstream = MockServer::start();
    let record = serde_json::json!({"PC_Compounds": [{"id": {"id": {"cid": 712}}, "charge": 0}]});
    let mock = upstream.mock(|when, then| {
        when.method(GET).path("/compound/cid/712/JSON");
        then.status(200).json_body(record.clone());
    });
    let addr = spawn_app(&upstream).await;

    let response = reqwest::get(format!("http://{}/compounds/cid/712", addr))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();

    mock.assert();
    assert_eq!(body, record);
}

#[tokio::test]
async fn test_compound_record_errors() {
    let upstream = MockServer::start();
    upstream.mock(|when, then| {
        when.method(GET).path("/compound/name/nothing/JSON");
        then.status(404);
    });
    let addr = spawn_app(&upstream).await;

    let response = reqwest::get(format!("http://{}/compounds/name/nothing", addr))
        .await
        .unwrap();
    assert_eq!(response.status(), 404);

    let response = reqwest::get(format!("http://{}/compounds/formula/H2O", addr))
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_preview_endpoint() {
    let upstream = MockServer::start();
    upstream.mock(|when, then| {
        when.method(GET).path("/posts");
        then.status(200).json_body(serde_json::Value::Array(
            (1..=8).map(|i| serde_json::json!({"id": i})).collect(),
        ));
    });
    upstream.mock(|when, then| {
        when.method(GET).path("/down");
        then.status(503).body("internal details");
    });
    let addr = spawn_app(&upstream).await;
    let client = reqwest::Client::new();

    let preview: serde_json::Value = client
        .get(format!("http://{}/preview", addr))
        .query(&[("url", upstream.url("/posts"))])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(preview["item_count"], 8);
    assert_eq!(preview["items"].as_array().unwrap().len(), 5);

    let response = client
        .get(format!("http://{}/preview", addr))
        .query(&[("url", upstream.url("/down"))])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 502);
    let text = response.text().await.unwrap();
    assert!(!text.contains("internal details"));
}
