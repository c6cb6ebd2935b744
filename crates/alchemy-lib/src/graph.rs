use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::catalog::CatalogRecord;

/// Dense index assigned to an element at first insertion.
pub type ElementIndex = usize;

/// Two ingredient indices that combine into an element, in catalog order.
pub type RecipePair = [ElementIndex; 2];

/// Element stored in the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
}

/// Indexed recipe graph.
///
/// Built once through [`Graph::add_node`] and [`Graph::build_from_elements`],
/// then only read. Wrap it in an `Arc` to share it between concurrent
/// traversals; no locking is required because nothing mutates it after
/// construction.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<Element>,
    name_to_index: HashMap<String, ElementIndex>,
    recipes: HashMap<ElementIndex, Vec<RecipePair>>,
}

impl Graph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the index for `name`, appending a new element the first time
    /// the name is seen.
    pub fn add_node(&mut self, name: &str) -> ElementIndex {
        if let Some(&index) = self.name_to_index.get(name) {
            return index;
        }
        let index = self.nodes.len();
        self.nodes.push(Element {
            name: name.to_string(),
        });
        self.name_to_index.insert(name.to_string(), index);
        index
    }

    /// Insert every record and its ingredient pairs in input order.
    ///
    /// Ingredients that were never declared become placeholder elements
    /// without recipes. Pairs that do not hold exactly two names are skipped.
    pub fn build_from_elements(&mut self, records: &[CatalogRecord]) {
        let mut skipped = 0usize;
        for record in records {
            let element = self.add_node(&record.name);
            for pair in &record.recipe {
                let [first, second] = pair.as_slice() else {
                    skipped += 1;
                    debug!(
                        element = %record.name,
                        arity = pair.len(),
                        "skipping malformed ingredient pair"
                    );
                    continue;
                };
                let first = self.add_node(first);
                let second = self.add_node(second);
                self.recipes
                    .entry(element)
                    .or_default()
                    .push([first, second]);
            }
        }

        debug!(
            elements = self.nodes.len(),
            recipes = self.recipe_count(),
            skipped_pairs = skipped,
            "recipe graph built"
        );
    }

    /// Resolve an element name to its index.
    pub fn lookup(&self, name: &str) -> Option<ElementIndex> {
        self.name_to_index.get(name).copied()
    }

    /// Ingredient pairs for an element; empty for terminal elements.
    pub fn recipes_of(&self, index: ElementIndex) -> &[RecipePair] {
        self.recipes
            .get(&index)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Name of the element at `index`.
    pub fn name_of(&self, index: ElementIndex) -> Option<&str> {
        self.nodes.get(index).map(|element| element.name.as_str())
    }

    /// `true` when the element has no recipes.
    pub fn is_terminal(&self, index: ElementIndex) -> bool {
        self.recipes_of(index).is_empty()
    }

    /// Number of distinct elements.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Total number of recipes across all elements.
    pub fn recipe_count(&self) -> usize {
        self.recipes.values().map(Vec::len).sum()
    }

    /// Number of ingredient edges (two per recipe).
    pub fn edge_count(&self) -> usize {
        self.recipe_count() * 2
    }

    /// Iterate elements in insertion order.
    pub fn elements(&self) -> impl Iterator<Item = (ElementIndex, &Element)> {
        self.nodes.iter().enumerate()
    }

    /// Counts describing the graph.
    pub fn summary(&self) -> GraphSummary {
        let terminal = (0..self.nodes.len())
            .filter(|&index| self.is_terminal(index))
            .count();
        GraphSummary {
            elements: self.nodes.len(),
            terminal_elements: terminal,
            recipes: self.recipe_count(),
            edges: self.edge_count(),
        }
    }

    /// Adapter that renders one line per element with its recipes.
    pub fn dump(&self) -> GraphDump<'_> {
        GraphDump { graph: self }
    }
}

/// Build a graph from catalog records.
pub fn build_graph(records: &[CatalogRecord]) -> Graph {
    let mut graph = Graph::new();
    graph.build_from_elements(records);
    graph
}

/// Aggregate counts for a [`Graph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GraphSummary {
    pub elements: usize,
    pub terminal_elements: usize,
    pub recipes: usize,
    pub edges: usize,
}

/// Display adapter returned by [`Graph::dump`].
pub struct GraphDump<'a> {
    graph: &'a Graph,
}

impl fmt::Display for GraphDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let graph = self.graph;
        for (index, element) in graph.elements() {
            write!(f, "[{}] {} →", index, element.name)?;
            let rendered: Vec<String> = graph
                .recipes_of(index)
                .iter()
                .map(|&[a, b]| {
                    format!(
                        "[{} + {}]",
                        graph.name_of(a).unwrap_or("?"),
                        graph.name_of(b).unwrap_or("?")
                    )
                })
                .collect();
            if !rendered.is_empty() {
                write!(f, " {}", rendered.join(", "))?;
            }
            writeln!(f)?;
        }
        writeln!(f, "Number of Nodes: {}", graph.len())?;
        write!(f, "Number of Edges: {}", graph.edge_count())
    }
}
