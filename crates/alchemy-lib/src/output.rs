//! Traversal output shape and the call-scoped helpers that assemble it.
//!
//! Every expansion of a recipe produces one [`NodeGroup`]: a synthetic merger
//! node plus the two ingredient nodes hanging off it. Groups are collected in
//! a flat list; clients rebuild the tree from parent ids alone.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::graph::{Graph, RecipePair};

/// Name given to the synthetic node that combines two ingredients.
pub const MERGER_NAME: &str = "merger";

/// Parent id carried by nodes attached directly to the queried element.
pub const ROOT_PARENT: usize = 0;

/// Node in the flattened output tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TreeNode {
    pub name: String,
    pub id: usize,
    pub parent: usize,
}

/// Merger node followed by its two ingredient nodes.
pub type NodeGroup = [TreeNode; 3];

/// Result of a single traversal call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recipe {
    /// Queried element, or a not-found message when the lookup failed.
    pub name: String,
    /// Node groups in traversal order.
    pub content: Vec<NodeGroup>,
    #[serde(skip)]
    found: bool,
}

impl Recipe {
    pub(crate) fn new(name: impl Into<String>, content: Vec<NodeGroup>) -> Self {
        Self {
            name: name.into(),
            content,
            found: true,
        }
    }

    /// Sentinel result for an element that is not in the graph.
    pub fn not_found(name: &str) -> Self {
        Self {
            name: format!("{name} not found!"),
            content: Vec::new(),
            found: false,
        }
    }

    /// `false` when this is the not-found sentinel.
    pub fn is_found(&self) -> bool {
        self.found
    }

    /// Iterate over every node in every group.
    pub fn nodes(&self) -> impl Iterator<Item = &TreeNode> {
        self.content.iter().flat_map(|group| group.iter())
    }

    /// Render the groups as an indented tree rebuilt from parent ids.
    pub fn render_tree(&self) -> String {
        let mut children: BTreeMap<usize, Vec<&TreeNode>> = BTreeMap::new();
        for node in self.nodes() {
            children.entry(node.parent).or_default().push(node);
        }
        for siblings in children.values_mut() {
            siblings.sort_by_key(|node| node.id);
        }

        let mut out = String::new();
        let _ = writeln!(out, "{}", self.name);
        render_children(&children, ROOT_PARENT, "", &mut out);
        out
    }
}

fn render_children(
    children: &BTreeMap<usize, Vec<&TreeNode>>,
    parent: usize,
    prefix: &str,
    out: &mut String,
) {
    let Some(siblings) = children.get(&parent) else {
        return;
    };
    for (position, node) in siblings.iter().enumerate() {
        let last = position + 1 == siblings.len();
        let branch = if last { "└─ " } else { "├─ " };
        let _ = writeln!(out, "{prefix}{branch}{} #{}", node.name, node.id);
        // Parent 0 is the root sentinel, never a real node.
        if node.id != ROOT_PARENT {
            let nested = format!("{prefix}{}", if last { "   " } else { "│  " });
            render_children(children, node.id, &nested, out);
        }
    }
}

/// Call-scoped id source; hands out merger/ingredient id triples.
#[derive(Debug, Default)]
pub(crate) struct IdAllocator {
    current: AtomicUsize,
}

impl IdAllocator {
    /// Reserve three consecutive ids `[merger, first, second]`.
    ///
    /// The reservation is a single atomic step, so concurrent branches of the
    /// same call never observe overlapping triples.
    pub(crate) fn reserve_triple(&self) -> [usize; 3] {
        let base = self.current.fetch_add(3, Ordering::Relaxed);
        [base + 1, base + 2, base + 3]
    }

    /// Highest id handed out so far.
    pub(crate) fn issued(&self) -> usize {
        self.current.load(Ordering::Relaxed)
    }
}

/// Append-only list of node groups shared by the branches of one call.
#[derive(Debug, Default)]
pub(crate) struct GroupSink {
    groups: Mutex<Vec<NodeGroup>>,
}

impl GroupSink {
    /// Append a whole group atomically.
    pub(crate) fn push(&self, group: NodeGroup) {
        self.groups
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(group);
    }

    /// Take the collected groups out of a shared sink.
    pub(crate) fn take(&self) -> Vec<NodeGroup> {
        std::mem::take(&mut *self.groups.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

/// Expand one recipe: reserve ids, emit the group and return the ids of the
/// two ingredient nodes so callers can attach deeper expansions to them.
pub(crate) fn expand_recipe(
    graph: &Graph,
    pair: RecipePair,
    parent: usize,
    ids: &IdAllocator,
    sink: &GroupSink,
) -> [usize; 2] {
    let [merger, first, second] = ids.reserve_triple();
    let [a, b] = pair;
    sink.push([
        TreeNode {
            name: MERGER_NAME.to_string(),
            id: merger,
            parent,
        },
        TreeNode {
            name: graph.name_of(a).unwrap_or_default().to_string(),
            id: first,
            parent: merger,
        },
        TreeNode {
            name: graph.name_of(b).unwrap_or_default().to_string(),
            id: second,
            parent: merger,
        },
    ]);
    [first, second]
}
