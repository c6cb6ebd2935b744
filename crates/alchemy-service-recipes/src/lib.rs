//! Recipe decomposition HTTP service.
//!
//! # Endpoints
//!
//! - `POST /dfs`, `POST /api/v1/dfs` - Depth-first decomposition of an element
//! - `POST /bfs`, `POST /api/v1/bfs` - Breadth-first decomposition of an element
//! - `GET /metrics` - Prometheus metrics endpoint (path set by `METRICS_PATH`)
//! - `GET /health/live` - Liveness check
//! - `GET /health/ready` - Readiness check
//!
//! Both traversal endpoints take `{ "element": "Steam", "type": "one" | "all" }`
//! and answer `{ "name": ..., "content": [[merger, ingredient, ingredient], ...] }`.
//! Unknown elements are answered with `200` and a `"<name> not found!"` name.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use alchemy_lib::{
    CancellationToken, Error as LibError, Recipe, Result as LibResult, ThreadRngPicker,
    TraversalEngine, TraversalMode, TraversalOrder,
};
use alchemy_service_shared::{
    from_lib_error, health_live, health_ready, metrics_handler, record_element_not_found,
    record_traversal_completed, record_traversal_failed, record_traversal_groups, AppState,
    MetricsConfig, MetricsLayer, ProblemDetails, RequestId, TraversalRequest, Validate,
};

/// HTTP response - either the decomposition or an RFC 9457 error.
#[derive(Debug)]
pub enum TraversalResponse {
    Success(Recipe),
    Error(ProblemDetails),
}

impl IntoResponse for TraversalResponse {
    fn into_response(self) -> axum::response::Response {
        match self {
            TraversalResponse::Success(recipe) => (StatusCode::OK, Json(recipe)).into_response(),
            TraversalResponse::Error(problem) => problem.into_response(),
        }
    }
}

/// Build the service router.
pub fn router(state: AppState, metrics: &MetricsConfig) -> Router {
    let mut app = Router::new()
        .route("/dfs", post(dfs_handler))
        .route("/bfs", post(bfs_handler))
        .route("/api/v1/dfs", post(dfs_handler))
        .route("/api/v1/bfs", post(bfs_handler))
        .route("/health/live", get(health_live))
        .route("/health/ready", get(health_ready));

    if metrics.enabled {
        app = app.route(&metrics.path, get(metrics_handler));
    }

    app.layer(CorsLayer::permissive())
        .layer(MetricsLayer)
        .with_state(state)
}

async fn dfs_handler(
    State(state): State<AppState>,
    request_id: Option<Extension<RequestId>>,
    payload: Result<Json<TraversalRequest>, JsonRejection>,
) -> TraversalResponse {
    handle_traversal(state, TraversalOrder::Dfs, request_id, payload).await
}

async fn bfs_handler(
    State(state): State<AppState>,
    request_id: Option<Extension<RequestId>>,
    payload: Result<Json<TraversalRequest>, JsonRejection>,
) -> TraversalResponse {
    handle_traversal(state, TraversalOrder::Bfs, request_id, payload).await
}

async fn handle_traversal(
    state: AppState,
    order: TraversalOrder,
    request_id: Option<Extension<RequestId>>,
    payload: Result<Json<TraversalRequest>, JsonRejection>,
) -> TraversalResponse {
    let request_id = request_id
        .map(|Extension(id)| id)
        .unwrap_or_else(RequestId::generate);

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            record_traversal_failed("invalid_request");
            return TraversalResponse::Error(ProblemDetails::bad_request(
                rejection.body_text(),
                request_id.as_str(),
            ));
        }
    };

    if let Err(problem) = request.validate(request_id.as_str()) {
        record_traversal_failed("invalid_request");
        return TraversalResponse::Error(*problem);
    }
    let mode = match request.mode(request_id.as_str()) {
        Ok(mode) => mode,
        Err(problem) => return TraversalResponse::Error(*problem),
    };

    info!(
        request_id = %request_id,
        element = %request.element,
        %order,
        %mode,
        "handling traversal request"
    );

    let cancel = CancellationToken::new();
    let deadline = {
        let cancel = cancel.clone();
        let timeout = state.traversal_timeout();
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            cancel.cancel();
        })
    };
    let result = run_traversal(state.engine(), &request.element, order, mode, &cancel).await;
    deadline.abort();

    match result {
        Ok(recipe) => {
            if recipe.is_found() {
                record_traversal_completed(order, mode);
                record_traversal_groups(recipe.content.len(), order);
            } else {
                record_element_not_found(order);
            }
            info!(
                request_id = %request_id,
                name = %recipe.name,
                groups = recipe.content.len(),
                "traversal completed"
            );
            TraversalResponse::Success(recipe)
        }
        Err(e) => {
            let reason = match e {
                LibError::TraversalCancelled { .. } => "timeout",
                _ => "internal",
            };
            error!(request_id = %request_id, error = %e, reason, "traversal failed");
            record_traversal_failed(reason);
            TraversalResponse::Error(from_lib_error(&e, request_id.as_str()))
        }
    }
}

/// Run one traversal without stalling the async workers.
///
/// The single-path variants are synchronous loops, so they go to the blocking
/// pool; the exhaustive variants schedule their own tasks.
pub async fn run_traversal(
    engine: &TraversalEngine,
    element: &str,
    order: TraversalOrder,
    mode: TraversalMode,
    cancel: &CancellationToken,
) -> LibResult<Recipe> {
    match mode {
        TraversalMode::All => engine.run(element, order, mode, cancel).await,
        TraversalMode::One => {
            let engine = engine.clone();
            let name = element.to_string();
            let cancel = cancel.clone();
            tokio::task::spawn_blocking(move || {
                let mut picker = ThreadRngPicker;
                match order {
                    TraversalOrder::Dfs => engine.single_dfs(&name, &mut picker, &cancel),
                    TraversalOrder::Bfs => engine.single_bfs(&name, &mut picker, &cancel),
                }
            })
            .await
            .unwrap_or_else(|err| {
                Err(LibError::TraversalTask {
                    element: element.to_string(),
                    message: err.to_string(),
                })
            })
        }
    }
}
