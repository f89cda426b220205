//! Twinforge server binary.
//!
//! Wires together the entity store, the generation adapter, the realtime
//! ticker and the HTTP API, then serves until `Ctrl-C`.
//!
//! # Startup Sequence
//!
//! 1. Load layered configuration
//! 2. Initialize structured logging (tracing)
//! 3. Build the entity store, seeded with sample data unless disabled
//! 4. Build the generation service for the configured provider
//! 5. Start the synthetic reading ticker
//! 6. Serve HTTP and `WebSocket` traffic

mod config;
mod error;

use std::sync::Arc;

use anyhow::Context;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;
use tracing_subscriber::EnvFilter;
use twinforge_api::{AppState, RandomReadings, spawn_ticker, start_server};
use twinforge_genai::GenerationService;
use twinforge_store::EntityStore;

use crate::config::{AppConfig, LoggingConfig};

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the generation service
/// cannot be built, or the server fails to bind or serve.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load configuration.
    let config = AppConfig::load().context("failed to load configuration")?;

    // 2. Initialize structured logging.
    init_tracing(&config.logging);
    info!("twinforge-server starting");
    info!(
        host = %config.server.host,
        port = config.server.port,
        seed_sample_data = config.store.seed_sample_data,
        default_user_id = config.store.default_user_id,
        realtime_interval_secs = config.realtime.interval_secs,
        max_upload_bytes = config.upload.max_file_bytes,
        "Configuration loaded"
    );

    // 3. Entity store.
    let store = if config.store.seed_sample_data {
        EntityStore::with_sample_data()
    } else {
        EntityStore::new()
    };

    // 4. Generation adapter.
    let generation = GenerationService::new(&config.generation)
        .context("failed to build generation service")?;
    info!(
        backend = generation.backend_name(),
        fast_model = %config.generation.fast_model,
        reasoning_model = %config.generation.reasoning_model,
        "Generation service ready"
    );

    let state = Arc::new(AppState::new(store, generation, config.api_settings()));

    // 5. Realtime ticker.
    let readings = RandomReadings::new(
        StdRng::from_os_rng(),
        config.realtime.device_ids(),
        config.realtime.value_min,
        config.realtime.value_max,
    )
    .context("invalid realtime configuration")?;
    let ticker = spawn_ticker(Arc::clone(&state), config.realtime.interval(), readings)
        .context("failed to start realtime ticker")?;

    // 6. Serve until Ctrl-C.
    let result = start_server(&config.server, state)
        .await
        .context("HTTP server failed");
    ticker.abort();

    info!("twinforge-server stopped");
    result
}

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}
