use std::sync::Arc;

use anyhow::{Context, Result};

use stylist::{
    ai_gateway::{
        credentials::EnvCredentialProvider,
        gateway::AIGateway,
        telemetry::TracingTelemetrySink,
        types::OutputMode,
    },
    cli::config_path_from_args,
    config::Config,
    logging::init_tracing,
    server::{self, AppState},
    stylist::{OutfitRecommender, ports::GatewayOutfitModel},
};

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = config_path_from_args()?;
    let config = Config::resolve(config_path.as_deref()).with_context(|| match &config_path {
        Some(path) => format!("failed to load config from {}", path.display()),
        None => "failed to load default config".to_string(),
    })?;

    let _logging_guard = init_tracing(&config.logging, config.server.debug)?;

    let gateway = Arc::new(
        AIGateway::new(
            config.ai_gateway.clone(),
            Arc::new(EnvCredentialProvider),
            Arc::new(TracingTelemetrySink),
        )
        .context("failed to construct ai gateway")?,
    );
    gateway
        .preflight()
        .await
        .context("ai gateway preflight failed")?;

    let output_mode = if config.stylist.json_mode {
        OutputMode::JsonObject
    } else {
        OutputMode::Text
    };
    let model = GatewayOutfitModel::new(Arc::clone(&gateway))
        .with_route(config.stylist.backend.clone(), config.stylist.model.clone())
        .with_output_mode(output_mode);
    let recommender = OutfitRecommender::new(Arc::new(model), config.stylist.locale);

    let state = AppState {
        recommender,
        request_timeout: config.server.request_timeout(),
    };

    server::run(&config.server, state).await
}
