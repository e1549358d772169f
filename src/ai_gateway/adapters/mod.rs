use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::Client;

use crate::ai_gateway::{
    error::{GatewayError, internal_error},
    types::{AdapterCompletion, AdapterContext, BackendDialect, CompletionRequest},
};

pub mod gemini;
pub mod http_common;
pub mod ollama;
pub mod openai_compatible;

#[async_trait]
pub trait BackendAdapter: Send + Sync {
    fn dialect(&self) -> BackendDialect;

    async fn complete(
        &self,
        ctx: AdapterContext,
        req: &CompletionRequest,
    ) -> Result<AdapterCompletion, GatewayError>;
}

pub fn build_http_client() -> Result<Client, GatewayError> {
    Client::builder()
        .pool_idle_timeout(Duration::from_secs(30))
        .build()
        .map_err(|err| internal_error(format!("failed to build http client: {}", err)))
}

/// All dialect adapters share one connection pool.
pub fn build_default_adapters(client: Client) -> Vec<Arc<dyn BackendAdapter>> {
    vec![
        Arc::new(gemini::GeminiAdapter::new(client.clone())) as Arc<dyn BackendAdapter>,
        Arc::new(openai_compatible::OpenAiCompatibleAdapter::new(client.clone()))
            as Arc<dyn BackendAdapter>,
        Arc::new(ollama::OllamaAdapter::new(client)) as Arc<dyn BackendAdapter>,
    ]
}
