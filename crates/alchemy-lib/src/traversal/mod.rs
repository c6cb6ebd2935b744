//! Traversal engine over the recipe graph.
//!
//! Four variants share one output shape ([`Recipe`]) and one id discipline:
//!
//! | order | mode  | behaviour                                                  |
//! |-------|-------|------------------------------------------------------------|
//! | DFS   | `all` | every recipe, ingredient branches run as gated tokio tasks |
//! | DFS   | `one` | one random recipe per element, sequential                  |
//! | BFS   | `all` | every recipe, queue items processed as gated tokio tasks   |
//! | BFS   | `one` | every root recipe, then one random recipe per element;     |
//! |       |       | stops once a root branch has both paths resolved           |
//!
//! Each call owns its id counter, visited set and group list. The graph is
//! shared read-only between calls.

mod bfs;
mod dfs;
mod picker;

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::graph::{ElementIndex, Graph};
use crate::output::{GroupSink, IdAllocator, NodeGroup, Recipe};

pub use picker::{RecipePicker, SeededPicker, ThreadRngPicker};

/// Default number of branch tasks allowed to run at once in the exhaustive
/// variants.
pub const DEFAULT_MAX_CONCURRENCY: usize = 5;

/// Order in which the recipe graph is explored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraversalOrder {
    /// Depth-first.
    Dfs,
    /// Breadth-first through a work queue.
    Bfs,
}

impl fmt::Display for TraversalOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TraversalOrder::Dfs => "dfs",
            TraversalOrder::Bfs => "bfs",
        })
    }
}

impl FromStr for TraversalOrder {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "dfs" => Ok(TraversalOrder::Dfs),
            "bfs" => Ok(TraversalOrder::Bfs),
            other => Err(Error::UnsupportedTraversal {
                kind: "order",
                value: other.to_string(),
            }),
        }
    }
}

/// Whether to expand every recipe or follow a single path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraversalMode {
    /// One randomly chosen recipe per element.
    One,
    /// Every recipe of every element.
    All,
}

impl fmt::Display for TraversalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TraversalMode::One => "one",
            TraversalMode::All => "all",
        })
    }
}

impl FromStr for TraversalMode {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "one" => Ok(TraversalMode::One),
            "all" => Ok(TraversalMode::All),
            other => Err(Error::UnsupportedTraversal {
                kind: "type",
                value: other.to_string(),
            }),
        }
    }
}

/// Tunables for the traversal engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Admission gate size for the exhaustive variants. Zero is treated as one.
    pub max_concurrency: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}

/// Runs traversals against a shared, immutable [`Graph`].
#[derive(Debug, Clone)]
pub struct TraversalEngine {
    graph: Arc<Graph>,
    config: EngineConfig,
}

impl TraversalEngine {
    pub fn new(graph: Arc<Graph>) -> Self {
        Self::with_config(graph, EngineConfig::default())
    }

    pub fn with_config(graph: Arc<Graph>, config: EngineConfig) -> Self {
        Self { graph, config }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    /// Dispatch to the variant selected by `order` and `mode`, picking random
    /// recipes from the thread-local generator.
    pub async fn run(
        &self,
        element: &str,
        order: TraversalOrder,
        mode: TraversalMode,
        cancel: &CancellationToken,
    ) -> Result<Recipe> {
        self.run_with_picker(element, order, mode, &mut ThreadRngPicker, cancel)
            .await
    }

    /// Like [`TraversalEngine::run`] with a caller-supplied recipe picker.
    ///
    /// Single-path modes run inline on the calling task; async callers that
    /// must not block a worker should call [`TraversalEngine::single_dfs`] or
    /// [`TraversalEngine::single_bfs`] from a blocking thread instead.
    pub async fn run_with_picker<P>(
        &self,
        element: &str,
        order: TraversalOrder,
        mode: TraversalMode,
        picker: &mut P,
        cancel: &CancellationToken,
    ) -> Result<Recipe>
    where
        P: RecipePicker + ?Sized,
    {
        match (order, mode) {
            (TraversalOrder::Dfs, TraversalMode::All) => self.all_dfs(element, cancel).await,
            (TraversalOrder::Dfs, TraversalMode::One) => self.single_dfs(element, picker, cancel),
            (TraversalOrder::Bfs, TraversalMode::All) => self.all_bfs(element, cancel).await,
            (TraversalOrder::Bfs, TraversalMode::One) => self.single_bfs(element, picker, cancel),
        }
    }

    /// Expand every recipe depth-first, one gated task per ingredient branch.
    pub async fn all_dfs(&self, element: &str, cancel: &CancellationToken) -> Result<Recipe> {
        let Some(start) = self.resolve(element) else {
            return Ok(Recipe::not_found(element));
        };
        let state = Arc::new(TraversalState::new());
        dfs::exhaustive(
            Arc::clone(&self.graph),
            Arc::clone(&state),
            self.gate(),
            start,
            cancel.child_token(),
        )
        .await
        .map_err(|failure| failure.into_error(element))?;
        Ok(self.finish(element, TraversalOrder::Dfs, TraversalMode::All, &state))
    }

    /// Follow one random recipe per element depth-first.
    pub fn single_dfs<P>(
        &self,
        element: &str,
        picker: &mut P,
        cancel: &CancellationToken,
    ) -> Result<Recipe>
    where
        P: RecipePicker + ?Sized,
    {
        let Some(start) = self.resolve(element) else {
            return Ok(Recipe::not_found(element));
        };
        let state = TraversalState::new();
        dfs::single_path(&self.graph, &state, start, picker, cancel)
            .map_err(|failure| failure.into_error(element))?;
        Ok(self.finish(element, TraversalOrder::Dfs, TraversalMode::One, &state))
    }

    /// Expand every recipe breadth-first, processing queue items as gated
    /// tasks.
    pub async fn all_bfs(&self, element: &str, cancel: &CancellationToken) -> Result<Recipe> {
        let Some(start) = self.resolve(element) else {
            return Ok(Recipe::not_found(element));
        };
        let state = Arc::new(TraversalState::new());
        bfs::exhaustive(
            Arc::clone(&self.graph),
            Arc::clone(&state),
            self.gate(),
            start,
            cancel.child_token(),
        )
        .await
        .map_err(|failure| failure.into_error(element))?;
        Ok(self.finish(element, TraversalOrder::Bfs, TraversalMode::All, &state))
    }

    /// Breadth-first from every root recipe, one random recipe per element
    /// afterwards, stopping early once a root branch resolves.
    pub fn single_bfs<P>(
        &self,
        element: &str,
        picker: &mut P,
        cancel: &CancellationToken,
    ) -> Result<Recipe>
    where
        P: RecipePicker + ?Sized,
    {
        let Some(start) = self.resolve(element) else {
            return Ok(Recipe::not_found(element));
        };
        let state = TraversalState::new();
        bfs::single_path(&self.graph, &state, start, picker, cancel)
            .map_err(|failure| failure.into_error(element))?;
        Ok(self.finish(element, TraversalOrder::Bfs, TraversalMode::One, &state))
    }

    fn resolve(&self, element: &str) -> Option<ElementIndex> {
        let index = self.graph.lookup(element);
        if index.is_none() {
            warn!(element = %element, "element not found in recipe graph");
        }
        index
    }

    fn gate(&self) -> Arc<Semaphore> {
        Arc::new(Semaphore::new(self.config.max_concurrency.max(1)))
    }

    fn finish(
        &self,
        element: &str,
        order: TraversalOrder,
        mode: TraversalMode,
        state: &TraversalState,
    ) -> Recipe {
        let content: Vec<NodeGroup> = state.sink.take();
        debug!(
            element = %element,
            order = %order,
            mode = %mode,
            groups = content.len(),
            ids_issued = state.ids.issued(),
            "traversal complete"
        );
        Recipe::new(element, content)
    }
}

/// State owned by one traversal call and shared by its branches.
///
/// Each cell is synchronised on its own so branches only contend on the
/// cell they touch.
#[derive(Debug, Default)]
pub(crate) struct TraversalState {
    pub(crate) ids: IdAllocator,
    pub(crate) sink: GroupSink,
    visited: Mutex<HashSet<ElementIndex>>,
}

impl TraversalState {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Mark `index` as expanded. Returns `false` when it already was.
    pub(crate) fn mark_visited(&self, index: ElementIndex) -> bool {
        self.visited
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(index)
    }
}

/// Reason a traversal stopped before completing.
#[derive(Debug)]
pub(crate) enum BranchFailure {
    Cancelled,
    Task(String),
}

impl BranchFailure {
    fn into_error(self, element: &str) -> Error {
        match self {
            BranchFailure::Cancelled => Error::TraversalCancelled {
                element: element.to_string(),
            },
            BranchFailure::Task(message) => Error::TraversalTask {
                element: element.to_string(),
                message,
            },
        }
    }
}

impl From<tokio::task::JoinError> for BranchFailure {
    fn from(err: tokio::task::JoinError) -> Self {
        if err.is_cancelled() {
            BranchFailure::Cancelled
        } else {
            BranchFailure::Task(err.to_string())
        }
    }
}
