//! `palaver serve` — Start the HTTP API server.

use palaver_agent::TurnRunner;
use palaver_config::AppConfig;
use palaver_core::tool::ToolRegistry;
use palaver_gateway::GatewayState;
use palaver_history::SqliteHistory;
use palaver_model::InferenceClient;
use palaver_search::{HybridSearchClient, RetrievalTool};
use std::sync::Arc;
use tracing::info;

pub async fn run(port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    let model = Arc::new(InferenceClient::new(&config.inference)?);
    let index = Arc::new(HybridSearchClient::new(&config.search, model.clone())?);
    let history = Arc::new(SqliteHistory::new(&config.history.path).await?);

    let mut tools = ToolRegistry::new();
    tools.register(Box::new(RetrievalTool::new(index)));

    let runner = Arc::new(
        TurnRunner::new(model, history.clone(), Arc::new(tools))
            .with_replay_window(config.history.replay_window),
    );

    let state = Arc::new(GatewayState { runner, history });

    info!(
        chat_model = %config.inference.chat_model,
        index = %config.search.index_name,
        history = %config.history.path,
        "Palaver configured"
    );
    println!("Palaver v{}", env!("CARGO_PKG_VERSION"));
    println!(
        "   Listening: {}:{}",
        config.gateway.host, config.gateway.port
    );

    palaver_gateway::start(state, &config.gateway.host, config.gateway.port).await?;

    Ok(())
}
