#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

use alchemy_lib::{build_graph, CatalogRecord, Recipe, RecipePicker, TraversalEngine};

/// Path to the catalog fixture shared across the workspace.
pub fn fixture_catalog_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures/elements.json")
}

pub fn engine(records: &[CatalogRecord]) -> TraversalEngine {
    TraversalEngine::new(Arc::new(build_graph(records)))
}

pub fn mud_catalog() -> Vec<CatalogRecord> {
    vec![
        CatalogRecord::with_recipes("Mud", [("Water", "Earth")]),
        CatalogRecord::terminal("Water"),
        CatalogRecord::terminal("Earth"),
    ]
}

pub fn steam_catalog() -> Vec<CatalogRecord> {
    vec![
        CatalogRecord::with_recipes("Steam", [("Water", "Fire"), ("Water", "Air")]),
        CatalogRecord::terminal("Water"),
        CatalogRecord::terminal("Fire"),
        CatalogRecord::terminal("Air"),
    ]
}

pub fn cyclic_catalog() -> Vec<CatalogRecord> {
    vec![
        CatalogRecord::with_recipes("A", [("B", "Seed")]),
        CatalogRecord::with_recipes("B", [("A", "Seed")]),
        CatalogRecord::terminal("Seed"),
    ]
}

/// Acyclic catalog with shared sub-ingredients and several alternatives.
pub fn layered_catalog() -> Vec<CatalogRecord> {
    vec![
        CatalogRecord::with_recipes("Steel", [("Metal", "Fire"), ("Metal", "Coal")]),
        CatalogRecord::with_recipes("Metal", [("Stone", "Fire")]),
        CatalogRecord::with_recipes("Coal", [("Stone", "Pressure")]),
        CatalogRecord::with_recipes("Stone", [("Lava", "Air"), ("Lava", "Water")]),
        CatalogRecord::with_recipes("Lava", [("Earth", "Fire")]),
        CatalogRecord::with_recipes("Pressure", [("Air", "Air")]),
        CatalogRecord::terminal("Fire"),
        CatalogRecord::terminal("Air"),
        CatalogRecord::terminal("Water"),
        CatalogRecord::terminal("Earth"),
    ]
}

/// Catalog where every level has `width` alternatives pointing at the next
/// level, to exercise the admission gate.
pub fn wide_catalog(levels: usize, width: usize) -> Vec<CatalogRecord> {
    let mut records = Vec::new();
    for level in 0..levels {
        let pairs: Vec<(String, String)> = (0..width)
            .map(|i| {
                (
                    format!("L{}-{}", level + 1, i),
                    format!("L{}-{}", level + 1, (i + 1) % width),
                )
            })
            .collect();
        for i in 0..width {
            records.push(CatalogRecord::with_recipes(
                format!("L{}-{}", level, i),
                pairs.clone(),
            ));
        }
    }
    records
}

/// Check the structural invariants every traversal result must satisfy:
/// merger/ingredient parent links and pairwise-distinct ids.
pub fn assert_consistent(recipe: &Recipe) {
    let mut ids = HashSet::new();
    for group in &recipe.content {
        let [merger, first, second] = group;
        assert_eq!(merger.name, "merger");
        assert_eq!(first.parent, merger.id);
        assert_eq!(second.parent, merger.id);
        assert_ne!(merger.id, 0);
        for node in group {
            assert!(ids.insert(node.id), "duplicate id {}", node.id);
        }
    }
    for group in &recipe.content {
        let parent = group[0].parent;
        assert!(
            parent == 0 || ids.contains(&parent),
            "merger {} attaches to unknown parent {}",
            group[0].id,
            parent
        );
    }
}

/// Names of the elements that were expanded (own at least one merger),
/// resolved through parent links.
pub fn expanded_elements(recipe: &Recipe) -> HashSet<String> {
    let by_id: HashMap<usize, &str> = recipe
        .nodes()
        .map(|node| (node.id, node.name.as_str()))
        .collect();
    recipe
        .content
        .iter()
        .map(|group| match group[0].parent {
            0 => recipe.name.clone(),
            parent => by_id[&parent].to_string(),
        })
        .collect()
}

/// Picker that replays a fixed script of choices, then falls back to zero.
pub struct ScriptedPicker {
    choices: Vec<usize>,
    position: usize,
}

impl ScriptedPicker {
    pub fn new(choices: Vec<usize>) -> Self {
        Self {
            choices,
            position: 0,
        }
    }

    pub fn calls(&self) -> usize {
        self.position
    }
}

impl RecipePicker for ScriptedPicker {
    fn pick(&mut self, recipe_count: usize) -> usize {
        let choice = self.choices.get(self.position).copied().unwrap_or(0);
        self.position += 1;
        choice.min(recipe_count - 1)
    }
}
