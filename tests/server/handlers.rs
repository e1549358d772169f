use std::time::Duration;

use axum::{
    Json,
    body::Body,
    extract::{FromRequest, State},
    http::{Request, StatusCode, header},
};
use serde_json::json;

use stylist::{
    ai_gateway::error::{GatewayError, GatewayErrorKind},
    server::{generate_outfit, health},
    stylist::types::OutfitRequest,
};

use crate::support::{Behaviour, REPLY, json_body, request_body, state};

async fn extract(body: &str) -> Result<Json<OutfitRequest>, axum::extract::rejection::JsonRejection> {
    let request = Request::builder()
        .method("POST")
        .uri("/generate-outfit")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request should build");
    Json::<OutfitRequest>::from_request(request, &()).await
}

#[tokio::test]
async fn given_health_check_when_called_then_status_is_healthy() {
    let Json(body) = health().await;
    assert_eq!(body, json!({ "status": "healthy" }));
}

#[tokio::test]
async fn given_valid_request_when_generating_then_200_with_reconciled_ids() {
    let payload = extract(&request_body().to_string()).await;
    let response = generate_outfit(State(state(Behaviour::Reply(REPLY), None)), payload).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(
        body,
        json!({
            "title": "Office Ready",
            "description": "Crisp.",
            "itemIds": ["uuid-2", "uuid-1"],
            "styleCategory": "smart"
        })
    );
}

#[tokio::test]
async fn given_flat_body_from_legacy_client_when_generating_then_200_in_snake_case() {
    let body = json!({
        "items": [
            {"id": "uuid-1", "name": "White Shirt", "category": "tops", "sub_category": "shirt", "tags": []},
            {"id": "uuid-2", "name": "Black Jeans", "category": "bottoms", "color": "Levi's", "tags": []}
        ],
        "weather": {"temp": 3, "condition": "snow", "city": "Beijing"},
        "vibe": "casual"
    });
    let payload = extract(&body.to_string()).await;
    let response = generate_outfit(State(state(Behaviour::Reply(REPLY), None)), payload).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({
            "title": "Office Ready",
            "description": "Crisp.",
            "item_ids": ["uuid-2", "uuid-1"],
            "style_category": "smart"
        })
    );
}

#[tokio::test]
async fn given_empty_items_when_generating_then_400_with_detail() {
    let payload = extract(r#"{"items": [], "context": {"vibe": "casual"}}"#).await;
    let response = generate_outfit(State(state(Behaviour::Reply(REPLY), None)), payload).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await,
        json!({ "detail": "No items provided for recommendation" })
    );
}

#[tokio::test]
async fn given_body_missing_items_when_generating_then_400_without_model_call() {
    let payload = extract(r#"{"context": {}}"#).await;
    assert!(payload.is_err(), "missing items must be rejected by the extractor");

    let response = generate_outfit(State(state(Behaviour::Reply(REPLY), None)), payload).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["detail"].as_str().is_some_and(|detail| detail.contains("items")));
}

#[tokio::test]
async fn given_unparseable_reply_when_generating_then_500_with_prefixed_detail() {
    let payload = extract(&request_body().to_string()).await;
    let response = generate_outfit(
        State(state(Behaviour::Reply("no json here"), None)),
        payload,
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    let detail = body["detail"].as_str().expect("detail should be a string");
    assert!(detail.starts_with("Failed to generate outfit: "), "{detail}");
}

#[tokio::test]
async fn given_gateway_failure_when_generating_then_500_includes_upstream_message() {
    let payload = extract(&request_body().to_string()).await;
    let failure = GatewayError::new(GatewayErrorKind::BackendTransient, "upstream 503");
    let response = generate_outfit(State(state(Behaviour::Fail(failure), None)), payload).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    let detail = body["detail"].as_str().expect("detail should be a string");
    assert!(detail.starts_with("Failed to generate outfit: "), "{detail}");
    assert!(detail.contains("upstream 503"), "{detail}");
}

#[tokio::test]
async fn given_stalled_model_when_deadline_expires_then_500_timeout() {
    let payload = extract(&request_body().to_string()).await;
    let response = generate_outfit(
        State(state(
            Behaviour::Stall(Duration::from_secs(60)),
            Some(Duration::from_millis(50)),
        )),
        payload,
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(
        body,
        json!({ "detail": "Failed to generate outfit: timed out after 50ms" })
    );
}

#[tokio::test]
async fn given_deadline_longer_than_model_when_generating_then_200() {
    let payload = extract(&request_body().to_string()).await;
    let response = generate_outfit(
        State(state(
            Behaviour::Stall(Duration::from_millis(5)),
            Some(Duration::from_secs(5)),
        )),
        payload,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
}
