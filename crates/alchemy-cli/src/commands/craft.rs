//! `craft <ELEMENT>`: decompose an element into node groups.

use std::path::Path;
use std::sync::Arc;

use alchemy_lib::{
    CancellationToken, Recipe, SeededPicker, ThreadRngPicker, TraversalEngine, TraversalMode,
    TraversalOrder,
};
use anyhow::{Context, Result};

use super::load_graph;
use crate::output::{render_recipe, OutputFormat};

/// Arguments of the `craft` subcommand.
#[derive(Debug, Clone)]
pub struct CraftArgs {
    pub element: String,
    pub order: TraversalOrder,
    pub mode: TraversalMode,
    /// Fixes random recipe choices for `--mode one`.
    pub seed: Option<u64>,
    pub format: OutputFormat,
}

pub fn handle_craft(catalog: &Path, args: &CraftArgs) -> Result<()> {
    let graph = load_graph(catalog)?;
    let engine = TraversalEngine::new(Arc::new(graph));

    let recipe = run_traversal(&engine, args)?;
    if !recipe.is_found() {
        tracing::warn!(element = %args.element, "element not present in catalog");
    }

    println!("{}", render_recipe(&recipe, args.format)?);
    Ok(())
}

/// Drive one traversal to completion on a private runtime.
pub fn run_traversal(engine: &TraversalEngine, args: &CraftArgs) -> Result<Recipe> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start the traversal runtime")?;
    let cancel = CancellationToken::new();

    let recipe = runtime.block_on(async {
        match args.seed {
            Some(seed) => {
                engine
                    .run_with_picker(
                        &args.element,
                        args.order,
                        args.mode,
                        &mut SeededPicker::new(seed),
                        &cancel,
                    )
                    .await
            }
            None => {
                engine
                    .run_with_picker(
                        &args.element,
                        args.order,
                        args.mode,
                        &mut ThreadRngPicker,
                        &cancel,
                    )
                    .await
            }
        }
    })?;

    tracing::debug!(
        element = %args.element,
        order = %args.order,
        mode = %args.mode,
        groups = recipe.content.len(),
        "traversal finished"
    );
    Ok(recipe)
}
