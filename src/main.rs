// src/main.rs

use anyhow::Context;
use chatpane::{
    api::{CompletionClient, GroqClient},
    config::initialize_config,
    logging::init_logging,
    ui::run_ui,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = initialize_config().context("failed to load configuration")?;
    let _logger = init_logging(config).context("failed to start logging")?;

    log::info!("starting chatpane with {config:?}");
    if config.api_key.is_empty() {
        log::warn!("no API key configured, every request will fail");
    }

    let groq = GroqClient::from_config(config);
    log::info!("using model {}", groq.model());
    let client: Arc<dyn CompletionClient> = Arc::new(groq);
    run_ui(client).await.context("terminal UI failed")?;

    log::info!("session closed");
    Ok(())
}
