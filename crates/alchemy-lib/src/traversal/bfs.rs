use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::{BranchFailure, RecipePicker, TraversalState};
use crate::graph::{ElementIndex, Graph};
use crate::output::{expand_recipe, ROOT_PARENT};

/// Pending expansion: the element and the node id its groups attach to.
#[derive(Debug, Clone, Copy)]
struct QueueItem {
    index: ElementIndex,
    parent: usize,
}

/// Work queue shared by the BFS worker tasks of one call.
#[derive(Debug, Default)]
struct WorkQueue {
    items: Mutex<VecDeque<QueueItem>>,
}

impl WorkQueue {
    fn push(&self, item: QueueItem) {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(item);
    }

    fn pop(&self) -> Option<QueueItem> {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
    }
}

pub(super) async fn exhaustive(
    graph: Arc<Graph>,
    state: Arc<TraversalState>,
    gate: Arc<Semaphore>,
    start: ElementIndex,
    cancel: CancellationToken,
) -> Result<(), BranchFailure> {
    let queue = Arc::new(WorkQueue::default());
    queue.push(QueueItem {
        index: start,
        parent: ROOT_PARENT,
    });

    let mut workers = JoinSet::new();
    loop {
        while let Some(item) = queue.pop() {
            workers.spawn(process(
                Arc::clone(&graph),
                Arc::clone(&state),
                Arc::clone(&queue),
                Arc::clone(&gate),
                cancel.clone(),
                item,
            ));
        }

        // Workers only enqueue before they finish, so an empty set after a
        // drain means the queue is exhausted too.
        let Some(joined) = workers.join_next().await else {
            break;
        };
        let result = joined.unwrap_or_else(|err| Err(BranchFailure::from(err)));
        if let Err(failure) = result {
            cancel.cancel();
            workers.shutdown().await;
            return Err(failure);
        }
    }

    Ok(())
}

async fn process(
    graph: Arc<Graph>,
    state: Arc<TraversalState>,
    queue: Arc<WorkQueue>,
    gate: Arc<Semaphore>,
    cancel: CancellationToken,
    item: QueueItem,
) -> Result<(), BranchFailure> {
    let _permit = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(BranchFailure::Cancelled),
        permit = gate.acquire() => permit.map_err(|_| BranchFailure::Cancelled)?,
    };

    if !state.mark_visited(item.index) {
        return Ok(());
    }

    for &pair in graph.recipes_of(item.index) {
        let [first, second] = expand_recipe(&graph, pair, item.parent, &state.ids, &state.sink);
        queue.push(QueueItem {
            index: pair[0],
            parent: first,
        });
        queue.push(QueueItem {
            index: pair[1],
            parent: second,
        });
    }

    Ok(())
}

/// Queue entry for the single-path variant, tagged with its root branch.
#[derive(Debug, Clone, Copy)]
struct RootedItem {
    index: ElementIndex,
    parent: usize,
    root: usize,
}

/// Number of resolved ingredient paths that completes a root branch.
const PATHS_PER_ROOT: usize = 2;

/// Every recipe of the start element is expanded as a root branch; the picker
/// only chooses among recipes of deeper elements.
pub(super) fn single_path<P>(
    graph: &Graph,
    state: &TraversalState,
    start: ElementIndex,
    picker: &mut P,
    cancel: &CancellationToken,
) -> Result<(), BranchFailure>
where
    P: RecipePicker + ?Sized,
{
    state.mark_visited(start);

    let roots = graph.recipes_of(start);
    let mut resolved = vec![0usize; roots.len()];
    let mut queue = VecDeque::new();

    for (root, &pair) in roots.iter().enumerate() {
        let [first, second] = expand_recipe(graph, pair, ROOT_PARENT, &state.ids, &state.sink);
        queue.push_back(RootedItem {
            index: pair[0],
            parent: first,
            root,
        });
        queue.push_back(RootedItem {
            index: pair[1],
            parent: second,
            root,
        });
    }

    while let Some(item) = queue.pop_front() {
        if cancel.is_cancelled() {
            return Err(BranchFailure::Cancelled);
        }

        let recipes = graph.recipes_of(item.index);
        let newly_visited = state.mark_visited(item.index);
        if !newly_visited || recipes.is_empty() {
            resolved[item.root] += 1;
            if resolved[item.root] >= PATHS_PER_ROOT {
                debug!(
                    root = item.root,
                    pending = queue.len(),
                    "root branch resolved, stopping early"
                );
                break;
            }
            continue;
        }

        let pair = recipes[picker.pick(recipes.len())];
        let [first, second] = expand_recipe(graph, pair, item.parent, &state.ids, &state.sink);
        queue.push_back(RootedItem {
            index: pair[0],
            parent: first,
            root: item.root,
        });
        queue.push_back(RootedItem {
            index: pair[1],
            parent: second,
            root: item.root,
        });
    }

    Ok(())
}
