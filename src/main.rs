use std::sync::Arc;

use anyhow::Context;
use noun_forge::config::AppConfig;
use noun_forge::core::llm::create_provider;
use noun_forge::core::server::WordService;
use noun_forge::core::words::WordGenerator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    let _log_guard = noun_forge::core::logging::init(&config.logging);
    log::info!("{} v{} starting", noun_forge::NAME, noun_forge::VERSION);

    if config.provider.has_api_key() {
        log::info!("OpenAI API key loaded");
    } else {
        log::warn!("OpenAI API key is not set; word generation requests will fail");
    }

    let provider = create_provider(&config.provider).context("Failed to build provider client")?;
    let generator = WordGenerator::from_settings(provider, &config.generation)
        .context("Invalid generation settings")?;
    log::info!(
        "Exclusion store seeded with {} banned words (serialized generation: {})",
        generator.store().banned_len(),
        generator.is_serialized()
    );

    let mut service = WordService::new(
        config.server.host.clone(),
        config.server.port,
        Arc::new(generator),
    );
    service
        .start()
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr()))?;

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    service.stop().await;

    Ok(())
}
