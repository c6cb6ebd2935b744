//! Output formats for traversal results.

use anyhow::Result;
use clap::ValueEnum;

use alchemy_lib::Recipe;

/// How `craft` prints its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// `{ "name", "content" }` exactly as the HTTP service returns it.
    #[default]
    Json,
    /// Indented tree rebuilt from parent ids.
    Tree,
}

/// Render a traversal result in the requested format.
pub fn render_recipe(recipe: &Recipe, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(recipe)?),
        OutputFormat::Tree => Ok(recipe.render_tree().trim_end().to_string()),
    }
}
