//! Startup wiring check: builds every client from the environment and stops
//! on fatal configuration errors.

use platform_util::{ServiceConfig, exit_on_fatal, new_identifier};
use serde_json::Value;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    platform_util::setup_logging();

    let config = ServiceConfig::from_env()?;
    config.log_env_configs();

    let mut storage = config.build_storage_client();
    exit_on_fatal(storage.init().await)?;

    let queue = config.build_queue_client();
    let table = config.build_key_value_client::<Value>();
    let binding = table.binding();
    info!(
        "Table {} keyed by {} in {}",
        binding.table, binding.search_param, binding.region
    );
    info!("Queue bound to {}", queue.queue_url().unwrap_or_default());
    info!("Wiring check id {}", new_identifier()?);

    Ok(())
}
