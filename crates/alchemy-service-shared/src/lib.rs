//! Shared infrastructure for the recipe traversal HTTP service.
//!
//! This crate provides the HTTP glue around `alchemy-lib`:
//!
//! - [`AppState`]: Pre-built recipe graph and traversal engine
//! - [`ServiceConfig`]: Environment-driven service configuration
//! - [`health`]: Health check handlers for liveness/readiness checks
//! - [`ProblemDetails`]: RFC 9457 Problem Details for consistent error responses
//! - [`metrics`]: Prometheus metrics infrastructure
//! - [`logging`]: Structured JSON logging setup
//! - [`middleware`]: Request tracking and metrics middleware
//! - [`TraversalRequest`]: Request body with validation
//!
//! # Architecture
//!
//! The service follows a thin-handler pattern where all traversal logic
//! resides in `alchemy-lib`. This crate provides only HTTP glue:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  axum Handler                                               │
//! │  - Parse request JSON                                       │
//! │  - Validate element and type                                │
//! │  - Call TraversalEngine::run with a deadline token          │
//! │  - Return { name, content }                                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Testing Support
//!
//! The [`test_utils`] module provides a fixture-backed state for handler
//! testing. Enable the `test-utils` feature to access it from dependent crates.

#![deny(warnings)]

mod config;
mod health;
pub mod logging;
pub mod metrics;
pub mod middleware;
mod problem;
mod request;
mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::ServiceConfig;
pub use health::{health_live, health_ready, HealthStatus};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use metrics::{
    init_metrics, metrics_handler, record_element_not_found, record_traversal_completed,
    record_traversal_failed, record_traversal_groups, MetricsConfig, MetricsError,
};
pub use middleware::{extract_or_generate_request_id, MetricsLayer, RequestId};
pub use problem::{
    from_lib_error, ProblemDetails, PROBLEM_INTERNAL_ERROR, PROBLEM_INVALID_REQUEST,
    PROBLEM_SERVICE_UNAVAILABLE, PROBLEM_TRAVERSAL_TIMEOUT,
};
pub use request::{TraversalRequest, Validate};
pub use state::{AppState, AppStateError};
