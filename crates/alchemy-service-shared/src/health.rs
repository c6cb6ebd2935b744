//! Health check handlers for Kubernetes liveness and readiness checks.
//!
//! Provides `/health/live` and `/health/ready` endpoints that return JSON
//! status responses for liveness and readiness checks.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::AppState;

/// Health status response for liveness and readiness checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Status indicator: "ok" or "not_ready: <reason>".
    pub status: String,

    /// Service name for identification.
    pub service: String,

    /// Service version from build-time.
    pub version: String,

    /// Number of elements in the recipe graph (readiness only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elements_loaded: Option<usize>,

    /// Number of recipes in the recipe graph (readiness only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipes_loaded: Option<usize>,
}

impl HealthStatus {
    /// Create a healthy liveness status.
    pub fn alive(service: &str, version: &str) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.to_string(),
            version: version.to_string(),
            elements_loaded: None,
            recipes_loaded: None,
        }
    }

    /// Create a ready status with graph information.
    pub fn ready(service: &str, version: &str, elements: usize, recipes: usize) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.to_string(),
            version: version.to_string(),
            elements_loaded: Some(elements),
            recipes_loaded: Some(recipes),
        }
    }

    /// Create a not-ready status.
    pub fn not_ready(service: &str, version: &str, reason: &str) -> Self {
        Self {
            status: format!("not_ready: {}", reason),
            service: service.to_string(),
            version: version.to_string(),
            elements_loaded: None,
            recipes_loaded: None,
        }
    }
}

/// Liveness check handler.
///
/// Returns 200 OK if the service is running.
///
/// ```text
/// GET /health/live
/// {"status":"ok","service":"alchemy-service-shared","version":"0.1.0"}
/// ```
pub async fn health_live() -> impl IntoResponse {
    let status = HealthStatus::alive(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    (StatusCode::OK, Json(status))
}

/// Readiness check handler.
///
/// Returns 200 OK once the recipe graph holds at least one element.
///
/// ```text
/// GET /health/ready
/// {"status":"ok","service":"alchemy-service-shared","version":"0.1.0","elements_loaded":16,"recipes_loaded":13}
/// ```
pub async fn health_ready(State(state): State<AppState>) -> Response {
    let service = env!("CARGO_PKG_NAME");
    let version = env!("CARGO_PKG_VERSION");

    let graph = state.graph();
    if graph.is_empty() {
        let status = HealthStatus::not_ready(service, version, "no elements loaded");
        return (StatusCode::SERVICE_UNAVAILABLE, Json(status)).into_response();
    }

    let status = HealthStatus::ready(service, version, graph.len(), graph.recipe_count());
    (StatusCode::OK, Json(status)).into_response()
}
