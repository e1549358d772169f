use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use stylist::ai_gateway::{
    adapters::BackendAdapter,
    error::GatewayError,
    telemetry::{GatewayTelemetryEvent, TelemetrySink},
    types::{
        AIGatewayConfig, AdapterCompletion, AdapterContext, BackendDialect, BackendProfile,
        CompletionRequest, CredentialRef, OutputMode, UsageStats,
    },
};

pub fn profile(id: &str, credential: CredentialRef) -> BackendProfile {
    BackendProfile {
        id: id.to_string(),
        dialect: BackendDialect::OpenAiCompatible,
        endpoint: Some("http://localhost:9999/v1".to_string()),
        credential,
        default_model: format!("{id}-model"),
        max_output_tokens: None,
        timeout_ms: None,
    }
}

pub fn config(backends: Vec<BackendProfile>, default_backend: &str) -> AIGatewayConfig {
    AIGatewayConfig {
        backends,
        default_backend: default_backend.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct SeenCall {
    pub backend_id: String,
    pub model: String,
    pub request_id: String,
    pub has_api_key: bool,
    pub output_mode: OutputMode,
}

/// Replays a fixed outcome and records what the gateway handed it.
pub struct ScriptedAdapter {
    outcome: Result<String, GatewayError>,
    pub calls: Mutex<Vec<SeenCall>>,
}

impl ScriptedAdapter {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            outcome: Ok(text.to_string()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(err: GatewayError) -> Arc<Self> {
        Arc::new(Self {
            outcome: Err(err),
            calls: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl BackendAdapter for ScriptedAdapter {
    fn dialect(&self) -> BackendDialect {
        BackendDialect::OpenAiCompatible
    }

    async fn complete(
        &self,
        ctx: AdapterContext,
        req: &CompletionRequest,
    ) -> Result<AdapterCompletion, GatewayError> {
        self.calls.lock().expect("calls lock").push(SeenCall {
            backend_id: ctx.backend_id,
            model: ctx.model,
            request_id: ctx.request_id,
            has_api_key: ctx.credential.api_key.is_some(),
            output_mode: req.output_mode,
        });
        self.outcome.clone().map(|output_text| AdapterCompletion {
            output_text,
            usage: Some(UsageStats {
                input_tokens: Some(12),
                output_tokens: Some(3),
                total_tokens: Some(15),
            }),
        })
    }
}

#[derive(Default)]
pub struct RecordingTelemetrySink {
    pub events: Mutex<Vec<GatewayTelemetryEvent>>,
}

impl TelemetrySink for RecordingTelemetrySink {
    fn on_event(&self, event: GatewayTelemetryEvent) {
        self.events.lock().expect("events lock").push(event);
    }
}
