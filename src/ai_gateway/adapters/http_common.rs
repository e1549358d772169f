use reqwest::{RequestBuilder, Response};
use serde_json::Value;

use crate::ai_gateway::{
    error::{GatewayError, GatewayErrorKind, protocol_violation},
    types::{AdapterContext, UsageStats},
};

const ERROR_BODY_LIMIT: usize = 240;

pub fn map_http_error(status: u16, backend_id: &str, body: &str) -> GatewayError {
    let normalized_body = body.trim().chars().take(ERROR_BODY_LIMIT).collect::<String>();

    let mut err = if status == 401 {
        GatewayError::new(GatewayErrorKind::Authentication, "authentication failed")
            .with_retryable(false)
    } else if status == 403 {
        GatewayError::new(GatewayErrorKind::Authorization, "authorization failed")
            .with_retryable(false)
    } else if status == 408 || status == 429 {
        GatewayError::new(
            GatewayErrorKind::RateLimited,
            format!("backend returned status {}", status),
        )
        .with_retryable(true)
    } else if (400..500).contains(&status) {
        GatewayError::new(
            GatewayErrorKind::InvalidRequest,
            format!("backend returned status {}", status),
        )
        .with_retryable(false)
    } else {
        GatewayError::new(
            GatewayErrorKind::BackendTransient,
            format!("backend returned status {}", status),
        )
        .with_retryable(true)
    };

    err = err
        .with_backend_id(backend_id.to_string())
        .with_provider_http_status(status);

    if !normalized_body.is_empty() {
        err.message = format!("{}: {}", err.message, normalized_body);
    }

    err
}

/// Sends a prepared request and decodes a successful JSON body, mapping
/// transport failures and non-2xx statuses onto gateway errors.
pub async fn send_json(
    builder: RequestBuilder,
    ctx: &AdapterContext,
    dialect_label: &str,
) -> Result<Value, GatewayError> {
    let builder = match ctx.timeout {
        Some(timeout) => builder.timeout(timeout),
        None => builder,
    };

    let response = builder
        .header("x-request-id", ctx.request_id.as_str())
        .send()
        .await
        .map_err(|err| transport_error(err, &ctx.backend_id, dialect_label))?;

    decode_response(response, &ctx.backend_id, dialect_label).await
}

async fn decode_response(
    response: Response,
    backend_id: &str,
    dialect_label: &str,
) -> Result<Value, GatewayError> {
    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        return Err(map_http_error(status, backend_id, &body));
    }

    response.json::<Value>().await.map_err(|err| {
        protocol_violation(format!("{} body decode failed: {}", dialect_label, err))
            .with_backend_id(backend_id.to_string())
    })
}

fn transport_error(err: reqwest::Error, backend_id: &str, dialect_label: &str) -> GatewayError {
    let kind = if err.is_timeout() {
        GatewayErrorKind::Timeout
    } else {
        GatewayErrorKind::BackendTransient
    };
    GatewayError::new(kind, format!("{} request failed: {}", dialect_label, err))
        .with_retryable(true)
        .with_backend_id(backend_id.to_string())
}

pub fn non_empty_text(
    text: String,
    backend_id: &str,
    dialect_label: &str,
) -> Result<String, GatewayError> {
    if text.trim().is_empty() {
        return Err(
            protocol_violation(format!("{} response contained no text", dialect_label))
                .with_backend_id(backend_id.to_string()),
        );
    }
    Ok(text)
}

pub fn usage_from_keys(usage: &Value, input: &str, output: &str, total: &str) -> UsageStats {
    UsageStats {
        input_tokens: usage.get(input).and_then(Value::as_u64),
        output_tokens: usage.get(output).and_then(Value::as_u64),
        total_tokens: usage.get(total).and_then(Value::as_u64),
    }
}
