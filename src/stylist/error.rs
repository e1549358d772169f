use thiserror::Error;

use crate::ai_gateway::error::GatewayError;

/// Caller-visible error category. Both upstream variants of [`StylistError`]
/// collapse to `Upstream`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StylistErrorKind {
    InvalidRequest,
    Upstream,
}

#[derive(Debug, Clone, Error)]
pub enum StylistError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("model call failed: {0}")]
    ModelUnavailable(#[from] GatewayError),

    #[error("malformed model response: {0}")]
    MalformedResponse(String),
}

impl StylistError {
    pub fn kind(&self) -> StylistErrorKind {
        match self {
            Self::InvalidRequest(_) => StylistErrorKind::InvalidRequest,
            Self::ModelUnavailable(_) | Self::MalformedResponse(_) => StylistErrorKind::Upstream,
        }
    }
}
