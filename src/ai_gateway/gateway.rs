use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use tracing::Instrument;

use crate::ai_gateway::{
    adapters::{self, BackendAdapter},
    credentials::CredentialProvider,
    error::{GatewayError, GatewayErrorKind},
    router::BackendRouter,
    telemetry::{GatewayTelemetryEvent, TelemetrySink},
    types::{
        AIGatewayConfig, AdapterContext, BackendDialect, CompletionRequest, CompletionResponse,
    },
};

/// Long-lived handle to the configured model backends. Holds no per-call
/// state, so one instance is shared by every concurrent request.
pub struct AIGateway {
    router: BackendRouter,
    adapters: HashMap<BackendDialect, Arc<dyn BackendAdapter>>,
    credential_provider: Arc<dyn CredentialProvider>,
    telemetry: Arc<dyn TelemetrySink>,
}

impl AIGateway {
    pub fn new(
        config: AIGatewayConfig,
        credential_provider: Arc<dyn CredentialProvider>,
        telemetry: Arc<dyn TelemetrySink>,
    ) -> Result<Self, GatewayError> {
        let client = adapters::build_http_client()?;
        Self::with_adapters(
            config,
            credential_provider,
            telemetry,
            adapters::build_default_adapters(client),
        )
    }

    /// Adapters are keyed by the dialect they report; a later adapter
    /// replaces an earlier one for the same dialect.
    pub fn with_adapters(
        config: AIGatewayConfig,
        credential_provider: Arc<dyn CredentialProvider>,
        telemetry: Arc<dyn TelemetrySink>,
        adapters: Vec<Arc<dyn BackendAdapter>>,
    ) -> Result<Self, GatewayError> {
        Ok(Self {
            router: BackendRouter::new(&config)?,
            adapters: adapters
                .into_iter()
                .map(|adapter| (adapter.dialect(), adapter))
                .collect(),
            credential_provider,
            telemetry,
        })
    }

    /// Resolves the default backend's credential without calling the model,
    /// so a missing API key surfaces at startup instead of on first request.
    pub async fn preflight(&self) -> Result<(), GatewayError> {
        let profile = self.router.default_profile();
        self.credential_provider
            .resolve(&profile.credential, profile)
            .await?;
        if !self.adapters.contains_key(&profile.dialect) {
            return Err(GatewayError::new(
                GatewayErrorKind::InvalidRequest,
                format!("adapter for dialect {:?} is not registered", profile.dialect),
            )
            .with_retryable(false)
            .with_backend_id(profile.id.clone()));
        }
        Ok(())
    }

    pub async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, GatewayError> {
        let selected = self.router.select(&request)?;
        let credential = self
            .credential_provider
            .resolve(&selected.profile.credential, &selected.profile)
            .await?;

        let adapter = self
            .adapters
            .get(&selected.profile.dialect)
            .cloned()
            .ok_or_else(|| {
                GatewayError::new(
                    GatewayErrorKind::InvalidRequest,
                    format!(
                        "adapter for dialect {:?} is not registered",
                        selected.profile.dialect
                    ),
                )
                .with_retryable(false)
                .with_backend_id(selected.backend_id.clone())
            })?;

        let request_span = tracing::info_span!(
            target: "ai_gateway",
            "gateway_request",
            request_id = %request.request_id,
            backend_id = %selected.backend_id,
            model = %selected.resolved_model,
        );

        self.telemetry.on_event(GatewayTelemetryEvent::RequestStarted {
            request_id: request.request_id.clone(),
            backend_id: selected.backend_id.clone(),
            model: selected.resolved_model.clone(),
        });

        let ctx = AdapterContext {
            backend_id: selected.backend_id.clone(),
            model: selected.resolved_model.clone(),
            timeout: selected.profile.timeout_ms.map(Duration::from_millis),
            profile: selected.profile,
            credential,
            request_id: request.request_id.clone(),
        };

        let started_at = Instant::now();
        let result = adapter
            .complete(ctx, &request)
            .instrument(request_span)
            .await;
        let elapsed_ms = u64::try_from(started_at.elapsed().as_millis()).unwrap_or(u64::MAX);

        match result {
            Ok(completion) => {
                self.telemetry
                    .on_event(GatewayTelemetryEvent::RequestCompleted {
                        request_id: request.request_id.clone(),
                        elapsed_ms,
                        usage: completion.usage.clone(),
                    });
                Ok(CompletionResponse {
                    request_id: request.request_id,
                    backend_id: selected.backend_id,
                    model: selected.resolved_model,
                    output_text: completion.output_text,
                    usage: completion.usage,
                })
            }
            Err(err) => {
                self.telemetry.on_event(GatewayTelemetryEvent::RequestFailed {
                    request_id: request.request_id,
                    elapsed_ms,
                    error_kind: err.kind,
                    provider_http_status: err.provider_http_status,
                });
                Err(err)
            }
        }
    }
}
