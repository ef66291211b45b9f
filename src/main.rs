//! ==============================================================================
//! main.rs - light sensor host entry point
//! ==============================================================================
//!
//! purpose:
//!     collects periodic light readings pushed by the esp32 sensor board,
//!     keeps them in a sqlite file and serves a live dashboard.
//!
//! responsibilities:
//!     - load light-sensor.toml (or defaults: 0.0.0.0:5000, light_sensor.db)
//!     - install the tracing subscriber
//!     - create the readings table once, before the first request arrives
//!     - build the server context and serve until ctrl-c
//!
//! relationships:
//!     - uses: config.rs (HostConfig), storage.rs (schema init)
//!     - uses: server.rs (router, handlers, ServerContext)
//!
//! architecture:
//!
//!     ┌──────────────┐  POST /light-sensor   ┌───────────────────────────┐
//!     │ esp32 sensor │ ────────────────────▶ │        rust host          │
//!     └──────────────┘                       │  ┌─────────┐  ┌────────┐  │
//!                                            │  │ handlers│─▶│ sqlite │  │
//!     ┌──────────────┐  GET / , /data        │  └─────────┘  └────────┘  │
//!     │   browser    │ ◀───────────────────▶ │   (ServerContext)         │
//!     └──────────────┘                       └───────────────────────────┘
//!
//! ==============================================================================

mod config;
mod dashboard;
mod domain;
mod error;
mod server;
mod stats;
mod storage;

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // startup banner
    println!("===========================================================");
    println!("  Light Sensor Host");
    println!("  ingest -> sqlite -> dashboard");
    println!("===========================================================");

    // step 1: load configuration
    let config = config::HostConfig::load_or_default();
    config.print_summary();

    // step 2: logging (RUST_LOG wins over the config file)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // step 3: schema, once, up front
    let storage = storage::Storage::new(&config.storage.db_path);
    storage
        .ensure_schema_blocking()
        .await
        .with_context(|| format!("failed to initialize {}", storage.path().display()))?;
    let existing = tokio::task::spawn_blocking({
        let storage = storage.clone();
        move || storage.count()
    })
    .await??;
    tracing::info!("[STARTUP] ✓ Database ready at {} ({} readings)", storage.path().display(), existing);

    // step 4: serve
    let ctx = server::ServerContext::new(storage, Arc::new(domain::SystemClock))
        .with_sensor_logging(config.logging.show_sensor_data);
    let addr = config.server.socket_addr()?;
    if let Err(e) = server::run_server(ctx, addr).await {
        tracing::error!("[ERROR] Web server error: {:#}", e);
        return Err(e);
    }

    Ok(())
}
