use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use super::{BranchFailure, RecipePicker, TraversalState};
use crate::graph::{ElementIndex, Graph};
use crate::output::{expand_recipe, ROOT_PARENT};

type BranchFuture = Pin<Box<dyn Future<Output = Result<(), BranchFailure>> + Send>>;

/// Everything a DFS branch task needs; cloned into every spawned child.
#[derive(Clone)]
struct Branch {
    graph: Arc<Graph>,
    state: Arc<TraversalState>,
    gate: Arc<Semaphore>,
    cancel: CancellationToken,
}

pub(super) async fn exhaustive(
    graph: Arc<Graph>,
    state: Arc<TraversalState>,
    gate: Arc<Semaphore>,
    start: ElementIndex,
    cancel: CancellationToken,
) -> Result<(), BranchFailure> {
    let branch = Branch {
        graph,
        state,
        gate,
        cancel,
    };
    explore(branch, start, ROOT_PARENT).await
}

fn explore(branch: Branch, index: ElementIndex, parent: usize) -> BranchFuture {
    Box::pin(async move {
        let children = {
            let _permit = tokio::select! {
                biased;
                _ = branch.cancel.cancelled() => return Err(BranchFailure::Cancelled),
                permit = branch.gate.acquire() => {
                    permit.map_err(|_| BranchFailure::Cancelled)?
                }
            };

            if !branch.state.mark_visited(index) {
                return Ok(());
            }

            let recipes = branch.graph.recipes_of(index);
            let mut children = Vec::with_capacity(recipes.len() * 2);
            for &pair in recipes {
                let [first, second] =
                    expand_recipe(&branch.graph, pair, parent, &branch.state.ids, &branch.state.sink);
                children.push((pair[0], first));
                children.push((pair[1], second));
            }
            children
        };

        // The permit is released before waiting on children so a full gate
        // can never deadlock on its own descendants.
        let handles: Vec<_> = children
            .into_iter()
            .map(|(child, child_parent)| tokio::spawn(explore(branch.clone(), child, child_parent)))
            .collect();

        let mut outcome = Ok(());
        for handle in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(err) => Err(BranchFailure::from(err)),
            };
            if let Err(failure) = result {
                // Remaining siblings bail out at their next gate.
                branch.cancel.cancel();
                if outcome.is_ok() {
                    outcome = Err(failure);
                }
            }
        }
        outcome
    })
}

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
    let mut stack = vec![(start, ROOT_PARENT)];

    while let Some((index, parent)) = stack.pop() {
        if cancel.is_cancelled() {
            return Err(BranchFailure::Cancelled);
        }
        if !state.mark_visited(index) {
            continue;
        }

        let recipes = graph.recipes_of(index);
        if recipes.is_empty() {
            continue;
        }

        let pair = recipes[picker.pick(recipes.len())];
        let [first, second] = expand_recipe(graph, pair, parent, &state.ids, &state.sink);
        // Second pushed first so the first ingredient is explored first.
        stack.push((pair[1], second));
        stack.push((pair[0], first));
    }

    Ok(())
}
