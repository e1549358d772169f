use crate::ai_gateway::{
    error::GatewayErrorKind,
    types::{BackendId, ModelId, RequestId, UsageStats},
};

#[derive(Debug, Clone)]
pub enum GatewayTelemetryEvent {
    RequestStarted {
        request_id: RequestId,
        backend_id: BackendId,
        model: ModelId,
    },
    RequestCompleted {
        request_id: RequestId,
        elapsed_ms: u64,
        usage: Option<UsageStats>,
    },
    RequestFailed {
        request_id: RequestId,
        elapsed_ms: u64,
        error_kind: GatewayErrorKind,
        provider_http_status: Option<u16>,
    },
}

pub trait TelemetrySink: Send + Sync {
    fn on_event(&self, event: GatewayTelemetryEvent);
}

#[derive(Default)]
pub struct NoopTelemetrySink;

impl TelemetrySink for NoopTelemetrySink {
    fn on_event(&self, _event: GatewayTelemetryEvent) {}
}

#[derive(Default)]
pub struct TracingTelemetrySink;

impl TelemetrySink for TracingTelemetrySink {
    fn on_event(&self, event: GatewayTelemetryEvent) {
        match event {
            GatewayTelemetryEvent::RequestStarted {
                request_id,
                backend_id,
                model,
            } => {
                tracing::debug!(
                    target: "ai_gateway",
                    request_id = %request_id,
                    backend_id = %backend_id,
                    model = %model,
                    "gateway_request_started"
                );
            }
            GatewayTelemetryEvent::RequestCompleted {
                request_id,
                elapsed_ms,
                usage,
            } => {
                let (input_tokens, output_tokens, total_tokens) = usage
                    .as_ref()
                    .map(|u| (u.input_tokens, u.output_tokens, u.total_tokens))
                    .unwrap_or((None, None, None));
                tracing::info!(
                    target: "ai_gateway",
                    request_id = %request_id,
                    elapsed_ms,
                    input_tokens = ?input_tokens,
                    output_tokens = ?output_tokens,
                    total_tokens = ?total_tokens,
                    "gateway_request_completed"
                );
            }
            GatewayTelemetryEvent::RequestFailed {
                request_id,
                elapsed_ms,
                error_kind,
                provider_http_status,
            } => {
                tracing::warn!(
                    target: "ai_gateway",
                    request_id = %request_id,
                    elapsed_ms,
                    error_kind = ?error_kind,
                    provider_http_status = ?provider_http_status,
                    "gateway_request_failed"
                );
            }
        }
    }
}
