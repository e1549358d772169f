use async_trait::async_trait;
use reqwest::{Client, header};
use serde_json::{Map, Value, json};

use crate::ai_gateway::{
    adapters::{BackendAdapter, http_common},
    error::{GatewayError, GatewayErrorKind, protocol_violation},
    types::{AdapterCompletion, AdapterContext, BackendDialect, CompletionRequest, OutputMode},
};

pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
const DIALECT_LABEL: &str = "gemini";

#[derive(Clone)]
pub struct GeminiAdapter {
    client: Client,
}

impl GeminiAdapter {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BackendAdapter for GeminiAdapter {
    fn dialect(&self) -> BackendDialect {
        BackendDialect::Gemini
    }

    async fn complete(
        &self,
        ctx: AdapterContext,
        req: &CompletionRequest,
    ) -> Result<AdapterCompletion, GatewayError> {
        let api_key = ctx.credential.api_key.clone().ok_or_else(|| {
            GatewayError::new(
                GatewayErrorKind::Authentication,
                "gemini backend requires an api key credential",
            )
            .with_retryable(false)
            .with_backend_id(ctx.backend_id.clone())
        })?;

        let endpoint = ctx
            .profile
            .endpoint
            .as_deref()
            .unwrap_or(DEFAULT_GEMINI_ENDPOINT)
            .trim_end_matches('/')
            .to_string();
        let url = format!("{}/v1beta/models/{}:generateContent", endpoint, ctx.model);
        let body = build_request_body(req, ctx.profile.max_output_tokens);

        let builder = self
            .client
            .post(url)
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-goog-api-key", api_key)
            .json(&body);

        let payload = http_common::send_json(builder, &ctx, DIALECT_LABEL).await?;
        parse_generate_content_payload(&payload, &ctx.backend_id)
    }
}

pub fn build_request_body(req: &CompletionRequest, max_output_tokens: Option<u64>) -> Value {
    let mut generation_config = Map::new();
    if matches!(req.output_mode, OutputMode::JsonObject) {
        generation_config.insert(
            "responseMimeType".to_string(),
            Value::String("application/json".to_string()),
        );
    }
    if let Some(max_output_tokens) = max_output_tokens {
        generation_config.insert(
            "maxOutputTokens".to_string(),
            Value::Number(max_output_tokens.into()),
        );
    }

    let mut body = json!({
        "contents": [
            {
                "role": "user",
                "parts": [{"text": req.prompt}]
            }
        ]
    });
    if !generation_config.is_empty() {
        body["generationConfig"] = Value::Object(generation_config);
    }
    body
}

pub fn parse_generate_content_payload(
    payload: &Value,
    backend_id: &str,
) -> Result<AdapterCompletion, GatewayError> {
    if let Some(reason) = payload
        .get("promptFeedback")
        .and_then(|feedback| feedback.get("blockReason"))
        .and_then(Value::as_str)
    {
        return Err(GatewayError::new(
            GatewayErrorKind::BackendPermanent,
            format!("gemini blocked the prompt: {}", reason),
        )
        .with_retryable(false)
        .with_backend_id(backend_id.to_string()));
    }

    let candidate = payload
        .get("candidates")
        .and_then(Value::as_array)
        .and_then(|candidates| candidates.first())
        .ok_or_else(|| {
            protocol_violation("gemini response missing candidates")
                .with_backend_id(backend_id.to_string())
        })?;

    let text = candidate
        .get("content")
        .and_then(|content| content.get("parts"))
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part.get("text").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();
    let output_text = http_common::non_empty_text(text, backend_id, DIALECT_LABEL)?;

    let usage = payload.get("usageMetadata").map(|usage| {
        http_common::usage_from_keys(
            usage,
            "promptTokenCount",
            "candidatesTokenCount",
            "totalTokenCount",
        )
    });

    Ok(AdapterCompletion { output_text, usage })
}
