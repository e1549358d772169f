use async_trait::async_trait;
use reqwest::{Client, header};
use serde_json::{Value, json};

use crate::ai_gateway::{
    adapters::{BackendAdapter, http_common},
    error::{GatewayError, protocol_violation},
    types::{
        AdapterCompletion, AdapterContext, BackendDialect, CompletionRequest, OutputMode,
        UsageStats,
    },
};

pub const DEFAULT_OLLAMA_ENDPOINT: &str = "http://localhost:11434";
const DIALECT_LABEL: &str = "ollama";

#[derive(Clone)]
pub struct OllamaAdapter {
    client: Client,
}

impl OllamaAdapter {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BackendAdapter for OllamaAdapter {
    fn dialect(&self) -> BackendDialect {
        BackendDialect::Ollama
    }

    async fn complete(
        &self,
        ctx: AdapterContext,
        req: &CompletionRequest,
    ) -> Result<AdapterCompletion, GatewayError> {
        let endpoint = ctx
            .profile
            .endpoint
            .as_deref()
            .unwrap_or(DEFAULT_OLLAMA_ENDPOINT)
            .trim_end_matches('/')
            .to_string();
        let url = format!("{}/api/chat", endpoint);

        let mut body = json!({
            "model": ctx.model,
            "messages": [{"role": "user", "content": req.prompt}],
            "stream": false,
        });
        if matches!(req.output_mode, OutputMode::JsonObject) {
            body["format"] = Value::String("json".to_string());
        }
        if let Some(max_output_tokens) = ctx.profile.max_output_tokens {
            body["options"] = json!({"num_predict": max_output_tokens});
        }

        let mut builder = self
            .client
            .post(url)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&body);
        if let Some(api_key) = &ctx.credential.api_key {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", api_key));
        }

        let payload = http_common::send_json(builder, &ctx, DIALECT_LABEL).await?;
        parse_chat_payload(&payload, &ctx.backend_id)
    }
}

fn parse_chat_payload(payload: &Value, backend_id: &str) -> Result<AdapterCompletion, GatewayError> {
    let message = payload.get("message").ok_or_else(|| {
        protocol_violation("ollama response missing message").with_backend_id(backend_id.to_string())
    })?;
    let text = message
        .get("content")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let output_text = http_common::non_empty_text(text, backend_id, DIALECT_LABEL)?;

    let input_tokens = payload.get("prompt_eval_count").and_then(Value::as_u64);
    let output_tokens = payload.get("eval_count").and_then(Value::as_u64);
    let usage = (input_tokens.is_some() || output_tokens.is_some()).then(|| UsageStats {
        input_tokens,
        output_tokens,
        total_tokens: input_tokens.zip(output_tokens).map(|(i, o)| i + o),
    });

    Ok(AdapterCompletion { output_text, usage })
}
