use std::time::Duration;

use serde::{Deserialize, Serialize};

pub type BackendId = String;
pub type ModelId = String;
pub type RequestId = String;

pub const DEFAULT_BACKEND_ID: &str = "gemini";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_GEMINI_CREDENTIAL_VAR: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BackendDialect {
    #[serde(rename = "gemini")]
    Gemini,
    #[serde(rename = "openai_compatible")]
    OpenAiCompatible,
    #[serde(rename = "ollama")]
    Ollama,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CredentialRef {
    Env { var: String },
    InlineToken { token: String },
    None,
}

/// Secret material resolved for one call. Adapters decide how to put it on
/// the wire (bearer header, `x-goog-api-key`, ...).
#[derive(Clone)]
pub struct ResolvedCredential {
    pub api_key: Option<String>,
}

impl ResolvedCredential {
    pub fn none() -> Self {
        Self { api_key: None }
    }

    pub fn api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
        }
    }
}

impl std::fmt::Debug for ResolvedCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedCredential")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendProfile {
    pub id: BackendId,
    pub dialect: BackendDialect,
    #[serde(default)]
    pub endpoint: Option<String>,
    pub credential: CredentialRef,
    pub default_model: ModelId,
    #[serde(default)]
    pub max_output_tokens: Option<u64>,
    /// Per-call HTTP deadline. Expiry surfaces as `GatewayErrorKind::Timeout`.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AIGatewayConfig {
    #[serde(default = "default_backends")]
    pub backends: Vec<BackendProfile>,
    #[serde(default = "default_backend_id")]
    pub default_backend: BackendId,
}

impl Default for AIGatewayConfig {
    fn default() -> Self {
        Self {
            backends: default_backends(),
            default_backend: default_backend_id(),
        }
    }
}

fn default_backends() -> Vec<BackendProfile> {
    vec![BackendProfile {
        id: DEFAULT_BACKEND_ID.to_string(),
        dialect: BackendDialect::Gemini,
        endpoint: None,
        credential: CredentialRef::Env {
            var: DEFAULT_GEMINI_CREDENTIAL_VAR.to_string(),
        },
        default_model: DEFAULT_GEMINI_MODEL.to_string(),
        max_output_tokens: None,
        timeout_ms: None,
    }]
}

fn default_backend_id() -> BackendId {
    DEFAULT_BACKEND_ID.to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    Text,
    JsonObject,
}

/// A single prompt-in, text-out call. There is no chat history and no tool use.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub request_id: RequestId,
    pub backend_hint: Option<BackendId>,
    pub model_override: Option<ModelId>,
    pub prompt: String,
    pub output_mode: OutputMode,
}

impl CompletionRequest {
    pub fn new(request_id: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            backend_hint: None,
            model_override: None,
            prompt: prompt.into(),
            output_mode: OutputMode::Text,
        }
    }

    pub fn with_output_mode(mut self, output_mode: OutputMode) -> Self {
        self.output_mode = output_mode;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsageStats {
    pub input_tokens: Option<u64>,
    pub output_tokens: Option<u64>,
    pub total_tokens: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct AdapterCompletion {
    pub output_text: String,
    pub usage: Option<UsageStats>,
}

#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub request_id: RequestId,
    pub backend_id: BackendId,
    pub model: ModelId,
    pub output_text: String,
    pub usage: Option<UsageStats>,
}

#[derive(Debug, Clone)]
pub struct AdapterContext {
    pub backend_id: BackendId,
    pub model: ModelId,
    pub profile: BackendProfile,
    pub credential: ResolvedCredential,
    pub request_id: RequestId,
    pub timeout: Option<Duration>,
}
