//! `stats`: report the size of the loaded recipe graph.

use std::path::Path;

use alchemy_lib::GraphSummary;
use anyhow::Result;

use super::load_graph;

pub fn handle_stats(catalog: &Path, dump: bool) -> Result<()> {
    let graph = load_graph(catalog)?;

    if dump {
        println!("{}", graph.dump());
    } else {
        println!("{}", format_summary(&graph.summary()));
    }
    Ok(())
}

pub fn format_summary(summary: &GraphSummary) -> String {
    format!(
        "Elements: {}\nTerminal elements: {}\nRecipes: {}\nEdges: {}",
        summary.elements, summary.terminal_elements, summary.recipes, summary.edges
    )
}
