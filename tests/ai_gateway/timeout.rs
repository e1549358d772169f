use std::{sync::Arc, time::Instant};

use stylist::ai_gateway::{
    credentials::EnvCredentialProvider,
    error::GatewayErrorKind,
    gateway::AIGateway,
    telemetry::GatewayTelemetryEvent,
    types::{BackendDialect, CompletionRequest, CredentialRef},
};
use tokio::net::TcpListener;

use crate::support::{RecordingTelemetrySink, config, profile};

/// Accepts connections and never answers them.
async fn silent_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("ephemeral port should bind");
    let addr = listener.local_addr().expect("listener address");
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn given_backend_timeout_when_endpoint_stalls_then_timeout_error_is_returned() {
    let mut local = profile("local", CredentialRef::None);
    local.dialect = BackendDialect::Ollama;
    local.endpoint = Some(silent_endpoint().await);
    local.timeout_ms = Some(100);

    let telemetry = Arc::new(RecordingTelemetrySink::default());
    let gateway = AIGateway::new(
        config(vec![local], "local"),
        Arc::new(EnvCredentialProvider),
        telemetry.clone(),
    )
    .expect("gateway should build");
    gateway.preflight().await.expect("ollama adapter is registered");

    let started = Instant::now();
    let err = match gateway.complete(CompletionRequest::new("req-timeout", "prompt")).await {
        Ok(_) => panic!("stalled endpoint must time out"),
        Err(err) => err,
    };

    assert_eq!(err.kind, GatewayErrorKind::Timeout);
    assert!(err.retryable);
    assert_eq!(err.backend_id.as_deref(), Some("local"));
    assert!(started.elapsed().as_secs() < 10, "deadline was not applied");

    let events = telemetry.events.lock().expect("events lock");
    assert!(matches!(
        events.last(),
        Some(GatewayTelemetryEvent::RequestFailed {
            error_kind: GatewayErrorKind::Timeout,
            ..
        })
    ));
}
