use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use axum::{body::to_bytes, response::Response};
use serde_json::{Value, json};

use stylist::{
    ai_gateway::error::GatewayError,
    server::AppState,
    stylist::{OutfitRecommender, ports::OutfitModelPort, prompts::PromptLocale},
};

pub const REPLY: &str = r#"{"title": "Office Ready", "description": "Crisp.", "itemIds": ["Black Jeans", "uuid-1"], "styleCategory": "smart"}"#;

pub enum Behaviour {
    Reply(&'static str),
    Fail(GatewayError),
    Stall(Duration),
}

pub struct StubModel {
    behaviour: Behaviour,
}

#[async_trait]
impl OutfitModelPort for StubModel {
    async fn generate(&self, _request_id: &str, _prompt: String) -> Result<String, GatewayError> {
        match &self.behaviour {
            Behaviour::Reply(text) => Ok(text.to_string()),
            Behaviour::Fail(err) => Err(err.clone()),
            Behaviour::Stall(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(REPLY.to_string())
            }
        }
    }
}

pub fn state(behaviour: Behaviour, request_timeout: Option<Duration>) -> AppState {
    AppState {
        recommender: OutfitRecommender::new(Arc::new(StubModel { behaviour }), PromptLocale::En),
        request_timeout,
    }
}

pub fn request_body() -> Value {
    json!({
        "items": [
            {"id": "uuid-1", "name": "White Shirt", "category": "tops"},
            {"id": "uuid-2", "name": "Black Jeans", "category": "bottoms", "color": "black"}
        ],
        "context": {"vibe": "office", "weather": {"temperature": 18}}
    })
}

pub async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    serde_json::from_slice(&bytes).expect("body should be JSON")
}
