use serde_json::{Value, json};
use tokio::net::TcpListener;

use stylist::{
    config::ServerConfig,
    server::{bind, router},
};

use crate::support::{Behaviour, REPLY, request_body, state};

async fn spawn_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("ephemeral port should bind");
    let addr = listener.local_addr().expect("listener address");
    let app = router(state(Behaviour::Reply(REPLY), None));
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server should run");
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn given_running_server_when_posting_outfit_then_json_round_trips_over_http() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{base}/generate-outfit"))
        .json(&request_body())
        .send()
        .await
        .expect("request should be sent");

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body: Value = response.json().await.expect("body should be JSON");
    assert_eq!(body["itemIds"], json!(["uuid-2", "uuid-1"]));
}

#[tokio::test]
async fn given_running_server_when_body_is_not_json_then_400_detail() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{base}/generate-outfit"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .expect("request should be sent");

    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("body should be JSON");
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn given_cross_origin_request_when_probing_health_then_any_origin_is_allowed() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{base}/health"))
        .header("origin", "http://localhost:5173")
        .send()
        .await
        .expect("request should be sent");

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|value| value.to_str().ok()),
        Some("*")
    );
    let body: Value = response.json().await.expect("body should be JSON");
    assert_eq!(body, json!({ "status": "healthy" }));
}

#[tokio::test]
async fn given_host_name_in_config_when_binding_then_it_is_resolved() {
    let config = ServerConfig {
        host: "localhost".to_string(),
        port: 0,
        ..ServerConfig::default()
    };

    let listener = bind(&config).await.expect("localhost should resolve and bind");
    let addr = listener.local_addr().expect("listener address");
    assert!(addr.ip().is_loopback(), "{addr}");
    assert_ne!(addr.port(), 0);
}

#[tokio::test]
async fn given_unresolvable_host_when_binding_then_error_names_the_address() {
    let config = ServerConfig {
        host: "no-such-host.invalid".to_string(),
        port: 0,
        ..ServerConfig::default()
    };

    let err = bind(&config).await.expect_err("unresolvable host must fail");
    assert!(err.to_string().contains("no-such-host.invalid:0"), "{err}");
}
