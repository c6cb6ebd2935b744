// One module per subcommand; main.rs parses arguments and dispatches here.

pub mod craft;
pub mod stats;

use std::path::Path;

use alchemy_lib::{build_graph, load_catalog, Graph};
use anyhow::{Context, Result};

/// Load the catalog at `path` and build the recipe graph.
pub fn load_graph(path: &Path) -> Result<Graph> {
    let records = load_catalog(path)
        .with_context(|| format!("failed to load recipe catalog from {}", path.display()))?;
    Ok(build_graph(&records))
}
