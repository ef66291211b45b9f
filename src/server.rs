//! ==============================================================================
//! server.rs - http surface of the light sensor host
//! ==============================================================================
//!
//! routes:
//!     POST /light-sensor        ingest one reading  -> 201 {"status":"success"}
//!     GET  /light-sensor/data   every reading        -> 200 [{"light_value", "timestamp"}]
//!     GET  /light-sensor/stats  dashboard figures    -> 200 {"count", "min", ...}
//!     GET  /                    dashboard html
//!
//! every failure is turned into a json `{"error": ...}` body at this boundary;
//! nothing here can take the process down.
//!
//! relationships:
//!     - uses: storage.rs (sqlite), stats.rs (summary), dashboard.rs (page)
//!     - uses: domain.rs (Clock seam, timestamp format)
//!     - used by: main.rs (run_server)
//!
//! ==============================================================================

use crate::dashboard::dashboard_handler;
use crate::domain::{format_timestamp, Clock, ReadingView};
use crate::error::ApiError;
use crate::stats::{Summary, SummaryDisplay};
use crate::storage::Storage;

use anyhow::Result;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

const MISSING_LIGHT_VALUE: &str = "Missing 'light_value' in request";
const NON_NUMERIC_LIGHT_VALUE: &str = "'light_value' must be a number";

// ==============================================================================
// server context
// ==============================================================================
// built once in main.rs and cloned into every handler by axum's State
// extractor. clones share the clock; storage is just a path.

#[derive(Clone)]
pub struct ServerContext {
    pub storage: Storage,
    pub clock: Arc<dyn Clock>,
    /// log every accepted reading at info (otherwise debug)
    pub show_sensor_data: bool,
}

impl ServerContext {
    pub fn new(storage: Storage, clock: Arc<dyn Clock>) -> Self {
        Self { storage, clock, show_sensor_data: false }
    }

    pub fn with_sensor_logging(mut self, enabled: bool) -> Self {
        self.show_sensor_data = enabled;
        self
    }
}

pub fn app(ctx: ServerContext) -> Router {
    Router::new()
        .route("/", get(dashboard_handler))
        .route("/light-sensor", post(ingest_handler))
        .route("/light-sensor/data", get(data_handler))
        .route("/light-sensor/stats", get(stats_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(ctx)
}

pub async fn run_server(ctx: ServerContext, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Dashboard live at http://{}", addr);
    axum::serve(listener, app(ctx))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested, draining connections");
}

// ==============================================================================
// handlers
// ==============================================================================

/// POST /light-sensor
///
/// body is taken as raw bytes so a malformed payload becomes a json error
/// instead of axum's plain-text rejection.
async fn ingest_handler(
    State(ctx): State<ServerContext>,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let payload: Value =
        serde_json::from_slice(&body).map_err(|e| ApiError::Unexpected(e.to_string()))?;
    let light_value = light_value_from(&payload)?;
    let timestamp = format_timestamp(ctx.clock.now());

    match ctx.storage.append_blocking(light_value, timestamp.clone()).await {
        Ok(id) => {
            if ctx.show_sensor_data {
                tracing::info!(id, light_value, %timestamp, "[LIGHT] reading stored");
            } else {
                tracing::debug!(id, light_value, %timestamp, "reading stored");
            }
            Ok((StatusCode::CREATED, Json(serde_json::json!({ "status": "success" }))))
        }
        Err(e) if e.is_operational() => {
            // schema is re-created for the next request; this reading is dropped
            tracing::warn!("storage fault on ingest, reinitializing schema: {}", e);
            if let Err(init_err) = ctx.storage.ensure_schema_blocking().await {
                tracing::error!("schema reinitialization failed: {}", init_err);
            }
            Err(ApiError::StorageOperational(e.to_string()))
        }
        Err(e) => {
            tracing::error!("ingest failed: {}", e);
            Err(e.into())
        }
    }
}

fn light_value_from(payload: &Value) -> Result<f64, ApiError> {
    match payload.get("light_value") {
        None | Some(Value::Null) => Err(ApiError::Validation(MISSING_LIGHT_VALUE.to_string())),
        Some(v) => v
            .as_f64()
            .ok_or_else(|| ApiError::Validation(NON_NUMERIC_LIGHT_VALUE.to_string())),
    }
}

/// GET /light-sensor/data
async fn data_handler(State(ctx): State<ServerContext>) -> Result<Json<Vec<ReadingView>>, ApiError> {
    let readings = ctx.storage.list_all_blocking().await.map_err(|e| {
        tracing::error!("query failed: {}", e);
        ApiError::from(e)
    })?;
    Ok(Json(readings.into_iter().map(ReadingView::from).collect()))
}

/// GET /light-sensor/stats
async fn stats_handler(State(ctx): State<ServerContext>) -> Result<Json<SummaryDisplay>, ApiError> {
    let readings = ctx.storage.list_all_blocking().await.map_err(|e| {
        tracing::error!("stats query failed: {}", e);
        ApiError::from(e)
    })?;
    let values: Vec<f64> = readings.iter().map(|r| r.light_value).collect();
    Ok(Json(Summary::from_values(&values).display()))
}
