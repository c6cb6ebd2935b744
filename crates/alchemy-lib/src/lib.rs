//! Alchemy library entry points.
//!
//! This crate loads a recipe catalog, builds the indexed recipe graph and runs
//! the crafting-tree traversals over it. Higher-level consumers (CLI, HTTP
//! service) should only depend on the functions exported here instead of
//! reimplementing behavior.
//!

#![deny(warnings)]

pub mod catalog;
pub mod error;
pub mod graph;
pub mod output;
pub mod traversal;

pub use catalog::{load_catalog, parse_catalog, CatalogRecord};
pub use error::{Error, Result};
pub use graph::{build_graph, ElementIndex, Graph, GraphSummary, RecipePair};
pub use output::{NodeGroup, Recipe, TreeNode, MERGER_NAME, ROOT_PARENT};
pub use tokio_util::sync::CancellationToken;
pub use traversal::{
    EngineConfig, RecipePicker, SeededPicker, ThreadRngPicker, TraversalEngine, TraversalMode,
    TraversalOrder, DEFAULT_MAX_CONCURRENCY,
};
