//! Application state for the traversal service.
//!
//! The recipe graph is built once at startup and shared, read-only, by every
//! request through the [`TraversalEngine`].

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use alchemy_lib::{
    build_graph, load_catalog, CatalogRecord, EngineConfig, Error as LibError, Graph,
    TraversalEngine,
};

use crate::ServiceConfig;

/// Error during application state initialization.
#[derive(Debug)]
pub enum AppStateError {
    /// Catalog file not found.
    CatalogNotFound(String),

    /// Failed to read or parse the catalog.
    CatalogLoad(LibError),
}

impl std::fmt::Display for AppStateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CatalogNotFound(path) => write!(f, "recipe catalog not found: {}", path),
            Self::CatalogLoad(e) => write!(f, "failed to load recipe catalog: {}", e),
        }
    }
}

impl std::error::Error for AppStateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::CatalogLoad(e) => Some(e),
            Self::CatalogNotFound(_) => None,
        }
    }
}

impl From<LibError> for AppStateError {
    fn from(err: LibError) -> Self {
        Self::CatalogLoad(err)
    }
}

/// Shared application state for all axum handlers.
///
/// Cheaply cloneable (`Arc` internally); share it via axum's `State`
/// extractor.
///
/// # Example
///
/// ```ignore
/// use axum::{Router, routing::post, extract::State};
/// use alchemy_service_shared::{AppState, ServiceConfig};
///
/// async fn handler(State(state): State<AppState>) {
///     let graph = state.graph();
///     // ... use graph
/// }
///
/// let state = AppState::load(&ServiceConfig::from_env()).unwrap();
/// let app = Router::new()
///     .route("/dfs", post(handler))
///     .with_state(state);
/// ```
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    engine: TraversalEngine,
    traversal_timeout: Duration,
}

impl AppState {
    /// Load the catalog named by `config` and build the recipe graph.
    pub fn load(config: &ServiceConfig) -> Result<Self, AppStateError> {
        Self::load_catalog(&config.catalog_path, config.engine_config())
            .map(|state| state.with_traversal_timeout(config.traversal_timeout))
    }

    /// Load a catalog file and build the recipe graph with the given engine
    /// settings.
    pub fn load_catalog(
        catalog_path: impl AsRef<Path>,
        engine_config: EngineConfig,
    ) -> Result<Self, AppStateError> {
        let catalog_path = catalog_path.as_ref();

        if !catalog_path.exists() {
            return Err(AppStateError::CatalogNotFound(
                catalog_path.display().to_string(),
            ));
        }

        tracing::info!(path = %catalog_path.display(), "loading recipe catalog");
        let records = load_catalog(catalog_path)?;
        let state = Self::from_records(&records, engine_config);
        tracing::info!(
            elements = state.graph().len(),
            recipes = state.graph().recipe_count(),
            "recipe graph built"
        );
        Ok(state)
    }

    /// Build state from catalog records already in memory.
    pub fn from_records(records: &[CatalogRecord], engine_config: EngineConfig) -> Self {
        Self::from_graph(build_graph(records), engine_config)
    }

    /// Wrap a pre-built graph.
    pub fn from_graph(graph: Graph, engine_config: EngineConfig) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                engine: TraversalEngine::with_config(Arc::new(graph), engine_config),
                traversal_timeout: ServiceConfig::default().traversal_timeout,
            }),
        }
    }

    /// Replace the per-request traversal deadline.
    pub fn with_traversal_timeout(self, timeout: Duration) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                engine: self.inner.engine.clone(),
                traversal_timeout: timeout,
            }),
        }
    }

    /// Engine shared by all requests.
    pub fn engine(&self) -> &TraversalEngine {
        &self.inner.engine
    }

    /// The loaded recipe graph.
    pub fn graph(&self) -> &Graph {
        self.inner.engine.graph()
    }

    /// Deadline applied to each traversal request.
    pub fn traversal_timeout(&self) -> Duration {
        self.inner.traversal_timeout
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("element_count", &self.graph().len())
            .field("recipe_count", &self.graph().recipe_count())
            .field("traversal_timeout", &self.inner.traversal_timeout)
            .finish()
    }
}
