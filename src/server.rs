use std::time::Duration;

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::{MatchedPath, State, rejection::JsonRejection},
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use serde_json::json;
use tokio::{
    net::TcpListener,
    signal::unix::{SignalKind, signal},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::Span;

use crate::{
    config::ServerConfig,
    stylist::{
        OutfitRecommender, StylistError, StylistErrorKind,
        types::{OutfitRequest, RequestShape},
    },
};

#[derive(Clone)]
pub struct AppState {
    pub recommender: OutfitRecommender,
    /// Caller-side deadline around the whole generation. `None` waits forever.
    pub request_timeout: Option<Duration>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

fn error_response(status: StatusCode, detail: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            detail: detail.into(),
        }),
    )
        .into_response()
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/generate-outfit", post(generate_outfit))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    let matched_path = request
                        .extensions()
                        .get::<MatchedPath>()
                        .map(MatchedPath::as_str)
                        .unwrap_or(request.uri().path());
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %matched_path,
                    )
                })
                .on_request(|_request: &Request<_>, _span: &Span| {})
                .on_response(
                    |response: &axum::http::Response<_>, latency: Duration, _span: &Span| {
                        let status = response.status().as_u16();
                        if status >= 500 {
                            tracing::error!(
                                target: "server",
                                status = status,
                                latency_ms = whole_millis(latency),
                                "http_request_failed"
                            );
                        } else {
                            tracing::info!(
                                target: "server",
                                status = status,
                                latency_ms = whole_millis(latency),
                                "http_request_completed"
                            );
                        }
                    },
                ),
        )
}

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy" }))
}

pub async fn generate_outfit(
    State(state): State<AppState>,
    payload: Result<Json<OutfitRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            tracing::info!(
                target: "server",
                error = %rejection.body_text(),
                "request_body_rejected"
            );
            return error_response(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };

    let shape = request.shape;
    let generation = state.recommender.generate_outfit(request);
    let outcome = match state.request_timeout {
        Some(deadline) => match tokio::time::timeout(deadline, generation).await {
            Ok(outcome) => outcome,
            Err(_) => {
                tracing::warn!(
                    target: "server",
                    timeout_ms = whole_millis(deadline),
                    "outfit_generation_timed_out"
                );
                return error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!(
                        "Failed to generate outfit: timed out after {}ms",
                        whole_millis(deadline)
                    ),
                );
            }
        },
        None => generation.await,
    };

    match outcome {
        Ok(recommendation) => match shape {
            RequestShape::Nested => (StatusCode::OK, Json(recommendation)).into_response(),
            RequestShape::Flat => {
                (StatusCode::OK, Json(recommendation.as_snake_case())).into_response()
            }
        },
        Err(err) => stylist_error_response(&err),
    }
}

fn stylist_error_response(err: &StylistError) -> Response {
    match err.kind() {
        StylistErrorKind::InvalidRequest => error_response(StatusCode::BAD_REQUEST, err.to_string()),
        StylistErrorKind::Upstream => {
            tracing::error!(target: "server", error = %err, "outfit_generation_failed");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to generate outfit: {err}"),
            )
        }
    }
}

pub fn whole_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Host names are resolved; every resolved address is tried in turn.
pub async fn bind(server_config: &ServerConfig) -> Result<TcpListener> {
    TcpListener::bind((server_config.host.as_str(), server_config.port))
        .await
        .with_context(|| {
            format!(
                "unable to bind {}:{}",
                server_config.host, server_config.port
            )
        })
}

pub async fn run(server_config: &ServerConfig, state: AppState) -> Result<()> {
    let listener = bind(server_config).await?;

    let mut sigint =
        signal(SignalKind::interrupt()).context("unable to listen for SIGINT (Ctrl+C)")?;
    let mut sigterm = signal(SignalKind::terminate()).context("unable to listen for SIGTERM")?;

    tracing::info!(
        target: "server",
        addr = %listener.local_addr().context("listener has no local address")?,
        "server_listening"
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move {
            let signal_name = tokio::select! {
                _ = sigint.recv() => "SIGINT",
                _ = sigterm.recv() => "SIGTERM",
            };
            tracing::info!(target: "server", signal = signal_name, "shutdown_requested");
        })
        .await
        .context("http server failed")?;

    tracing::info!(target: "server", "server_stopped");
    Ok(())
}
