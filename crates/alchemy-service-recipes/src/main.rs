//! Recipe decomposition HTTP service.
//!
//! # Configuration
//!
//! - `ALCHEMY_CATALOG_PATH` - Path to the recipe catalog JSON (default: elements.json)
//! - `SERVICE_PORT` or `PORT` - HTTP port (default: 8080)
//! - `TRAVERSAL_MAX_CONCURRENCY` - Concurrent branch tasks per traversal (default: 5)
//! - `TRAVERSAL_TIMEOUT_MS` - Per-request traversal deadline (default: 10000)
//! - `RUST_LOG` - Log level (default: info)
//! - `LOG_FORMAT` - Log format: json (default) or text
//! - `METRICS_ENABLED`, `METRICS_PATH` - Prometheus endpoint settings

use std::net::SocketAddr;

use tracing::{error, info};

use alchemy_service_recipes::router;
use alchemy_service_shared::{
    init_logging, init_metrics, AppState, LoggingConfig, MetricsConfig, ServiceConfig,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(&LoggingConfig::from_env().with_service("recipes"));

    let metrics_config = MetricsConfig::from_env();
    if metrics_config.enabled {
        if let Err(e) = init_metrics(&metrics_config) {
            tracing::warn!(error = %e, "failed to initialize metrics, continuing without metrics");
        }
    }

    let config = ServiceConfig::from_env();
    info!(
        catalog = %config.catalog_path.display(),
        port = config.port,
        max_concurrency = config.max_concurrency,
        timeout_ms = config.traversal_timeout.as_millis() as u64,
        "starting recipes service"
    );

    let state = AppState::load(&config).map_err(|e| {
        error!(error = %e, path = %config.catalog_path.display(), "failed to load application state");
        e
    })?;
    info!(
        elements = state.graph().len(),
        recipes = state.graph().recipe_count(),
        "application state loaded"
    );

    let app = router(state, &metrics_config);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(addr = %addr, "listening on");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
