use std::sync::Arc;

use async_trait::async_trait;

use crate::ai_gateway::{
    error::GatewayError,
    gateway::AIGateway,
    types::{CompletionRequest, OutputMode},
};

/// The only capability the recommender needs from a model: prompt in,
/// text out.
#[async_trait]
pub trait OutfitModelPort: Send + Sync {
    async fn generate(&self, request_id: &str, prompt: String) -> Result<String, GatewayError>;
}

#[derive(Clone)]
pub struct GatewayOutfitModel {
    gateway: Arc<AIGateway>,
    backend_id: Option<String>,
    model: Option<String>,
    output_mode: OutputMode,
}

impl GatewayOutfitModel {
    pub fn new(gateway: Arc<AIGateway>) -> Self {
        Self {
            gateway,
            backend_id: None,
            model: None,
            output_mode: OutputMode::JsonObject,
        }
    }

    pub fn with_route(mut self, backend_id: Option<String>, model: Option<String>) -> Self {
        self.backend_id = backend_id;
        self.model = model;
        self
    }

    /// JSON mode is on by default; plain text still goes through extraction.
    pub fn with_output_mode(mut self, output_mode: OutputMode) -> Self {
        self.output_mode = output_mode;
        self
    }
}

#[async_trait]
impl OutfitModelPort for GatewayOutfitModel {
    async fn generate(&self, request_id: &str, prompt: String) -> Result<String, GatewayError> {
        let mut request =
            CompletionRequest::new(request_id, prompt).with_output_mode(self.output_mode);
        request.backend_hint = self.backend_id.clone();
        request.model_override = self.model.clone();

        let response = self.gateway.complete(request).await?;
        Ok(response.output_text)
    }
}
