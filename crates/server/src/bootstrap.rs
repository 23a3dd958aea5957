use std::sync::Arc;

use cryptoprice_core::config::{AppConfig, ConfigError};
use cryptoprice_skill::{CoinbaseClient, SkillDispatcher};
use thiserror::Error;
use tracing::info;

pub struct Application {
    pub config: AppConfig,
    pub dispatcher: Arc<SkillDispatcher>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("price api client construction failed: {0}")]
    HttpClient(#[source] reqwest::Error),
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let price_source =
        CoinbaseClient::from_config(&config.price_api).map_err(BootstrapError::HttpClient)?;
    info!(
        event_name = "system.bootstrap.price_source_ready",
        correlation_id = "bootstrap",
        base_url = %config.price_api.base_url,
        timeout_ms = config.price_api.timeout_ms,
        "price source configured"
    );

    let dispatcher = SkillDispatcher::with_price_source(
        config.skill.application_id.clone(),
        Arc::new(price_source),
    );

    Ok(Application { config, dispatcher: Arc::new(dispatcher) })
}
