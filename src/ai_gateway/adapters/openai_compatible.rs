use async_trait::async_trait;
use reqwest::{Client, header};
use serde_json::{Value, json};

use crate::ai_gateway::{
    adapters::{BackendAdapter, http_common},
    error::{GatewayError, GatewayErrorKind, protocol_violation},
    types::{AdapterCompletion, AdapterContext, BackendDialect, CompletionRequest, OutputMode},
};

const DIALECT_LABEL: &str = "openai-compatible";

#[derive(Clone)]
pub struct OpenAiCompatibleAdapter {
    client: Client,
}

impl OpenAiCompatibleAdapter {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BackendAdapter for OpenAiCompatibleAdapter {
    fn dialect(&self) -> BackendDialect {
        BackendDialect::OpenAiCompatible
    }

    async fn complete(
        &self,
        ctx: AdapterContext,
        req: &CompletionRequest,
    ) -> Result<AdapterCompletion, GatewayError> {
        let endpoint = ctx.profile.endpoint.clone().ok_or_else(|| {
            GatewayError::new(
                GatewayErrorKind::InvalidRequest,
                "openai-compatible backend requires endpoint",
            )
            .with_retryable(false)
            .with_backend_id(ctx.backend_id.clone())
        })?;

        let url = format!("{}/chat/completions", endpoint.trim_end_matches('/'));
        let body = build_request_body(&ctx.model, req, ctx.profile.max_output_tokens);

        let mut builder = self
            .client
            .post(url)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&body);
        if let Some(api_key) = &ctx.credential.api_key {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", api_key));
        }

        let payload = http_common::send_json(builder, &ctx, DIALECT_LABEL).await?;
        parse_chat_completion_payload(&payload, &ctx.backend_id)
    }
}

pub fn build_request_body(
    model: &str,
    req: &CompletionRequest,
    max_output_tokens: Option<u64>,
) -> Value {
    let mut body = json!({
        "model": model,
        "messages": [{"role": "user", "content": req.prompt}],
        "stream": false,
    });

    if matches!(req.output_mode, OutputMode::JsonObject) {
        body["response_format"] = json!({"type": "json_object"});
    }

    if let Some(max_tokens) = max_output_tokens {
        body["max_tokens"] = Value::Number(max_tokens.into());
    }

    body
}

pub fn parse_chat_completion_payload(
    payload: &Value,
    backend_id: &str,
) -> Result<AdapterCompletion, GatewayError> {
    let choice = payload
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .ok_or_else(|| {
            protocol_violation("openai-compatible response missing choices")
                .with_backend_id(backend_id.to_string())
        })?;

    let text = choice
        .get("message")
        .and_then(|message| message.get("content"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let output_text = http_common::non_empty_text(text, backend_id, DIALECT_LABEL)?;

    let usage = payload.get("usage").map(|usage| {
        http_common::usage_from_keys(usage, "prompt_tokens", "completion_tokens", "total_tokens")
    });

    Ok(AdapterCompletion { output_text, usage })
}
