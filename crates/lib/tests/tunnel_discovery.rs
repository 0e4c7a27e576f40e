//! Tunnel discovery against a mocked ngrok management endpoint.
//! Does not launch ngrok; only the single-attempt discovery query is covered.

use axum::{routing::get, Json, Router};
use lib::tunnel::discover_public_url;
use serde_json::{json, Value};

async fn spawn_mock_api(body: Value) -> String {
    let app = Router::new().route(
        "/api/tunnels",
        get(move || async move { Json(body) }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock api");
    let addr = listener.local_addr().expect("local_addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn discovery_returns_first_public_url() {
    let base = spawn_mock_api(json!({
        "tunnels": [
            { "public_url": "https://abc.ngrok.io", "proto": "https", "config": {} },
            { "public_url": "http://abc.ngrok.io", "proto": "http", "config": {} }
        ]
    }))
    .await;

    let url = discover_public_url(Some(&base)).await.expect("discovery");
    assert_eq!(url.as_deref(), Some("https://abc.ngrok.io"));
}

#[tokio::test]
async fn discovery_with_no_tunnels_returns_none() {
    let base = spawn_mock_api(json!({ "tunnels": [] })).await;
    let url = discover_public_url(Some(&base)).await.expect("discovery");
    assert_eq!(url, None);
}

#[tokio::test]
async fn discovery_tolerates_a_missing_tunnels_field() {
    let base = spawn_mock_api(json!({})).await;
    let url = discover_public_url(Some(&base)).await.expect("discovery");
    assert_eq!(url, None);
}

#[tokio::test]
async fn discovery_errors_when_the_management_api_is_unreachable() {
    // Grab a free port and release it so nothing is listening there.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind free port");
        listener.local_addr().expect("local_addr").port()
    };
    let base = format!("http://127.0.0.1:{}", port);
    assert!(discover_public_url(Some(&base)).await.is_err());
}
