mod common;

use std::collections::HashSet;
use std::sync::Arc;

use alchemy_lib::{
    build_graph, CancellationToken, EngineConfig, Error, Recipe, SeededPicker, ThreadRngPicker,
    TraversalEngine, TraversalMode, TraversalOrder, TreeNode,
};

use common::{
    assert_consistent, cyclic_catalog, engine, expanded_elements, layered_catalog, mud_catalog,
    steam_catalog, wide_catalog, ScriptedPicker,
};

const ORDERS: [TraversalOrder; 2] = [TraversalOrder::Dfs, TraversalOrder::Bfs];
const MODES: [TraversalMode; 2] = [TraversalMode::One, TraversalMode::All];

fn flatten(recipe: &Recipe) -> Vec<(String, usize, usize)> {
    recipe
        .nodes()
        .map(|node| (node.name.clone(), node.id, node.parent))
        .collect()
}

fn node(name: &str, id: usize, parent: usize) -> TreeNode {
    TreeNode {
        name: name.to_string(),
        id,
        parent,
    }
}

fn group_signatures(recipe: &Recipe) -> Vec<(String, String, String)> {
    let by_id: std::collections::HashMap<usize, &str> = recipe
        .nodes()
        .map(|node| (node.id, node.name.as_str()))
        .collect();
    let mut signatures: Vec<_> = recipe
        .content
        .iter()
        .map(|[merger, first, second]| {
            let owner = match merger.parent {
                0 => recipe.name.clone(),
                parent => by_id[&parent].to_string(),
            };
            (owner, first.name.clone(), second.name.clone())
        })
        .collect();
    signatures.sort();
    signatures
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn mud_all_yields_single_group_in_both_orders() {
    let engine = engine(&mud_catalog());
    let cancel = CancellationToken::new();

    for order in ORDERS {
        let recipe = engine
            .run("Mud", order, TraversalMode::All, &cancel)
            .await
            .unwrap();

        assert_eq!(recipe.name, "Mud");
        assert!(recipe.is_found());
        assert_eq!(
            recipe.content,
            vec![[node("merger", 1, 0), node("Water", 2, 1), node("Earth", 3, 1)]],
            "order {order}"
        );
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn steam_all_yields_one_group_per_recipe() {
    let engine = engine(&steam_catalog());
    let cancel = CancellationToken::new();

    for order in ORDERS {
        let recipe = engine
            .run("Steam", order, TraversalMode::All, &cancel)
            .await
            .unwrap();

        assert_eq!(recipe.content.len(), 2);
        assert!(recipe.content.iter().all(|group| group[0].parent == 0));
        assert_ne!(recipe.content[0][0].id, recipe.content[1][0].id);

        let partners: HashSet<&str> = recipe
            .content
            .iter()
            .map(|group| group[2].name.as_str())
            .collect();
        assert_eq!(partners, HashSet::from(["Fire", "Air"]));
        assert_consistent(&recipe);
    }
}

#[test]
fn steam_one_dfs_follows_the_picked_recipe() {
    let engine = engine(&steam_catalog());
    let cancel = CancellationToken::new();

    let recipe = engine
        .single_dfs("Steam", &mut ScriptedPicker::new(vec![1]), &cancel)
        .unwrap();

    assert_eq!(
        recipe.content,
        vec![[node("merger", 1, 0), node("Water", 2, 1), node("Air", 3, 1)]]
    );
}

#[test]
fn steam_one_dfs_chooses_both_recipes_over_many_calls() {
    let engine = engine(&steam_catalog());
    let cancel = CancellationToken::new();

    let mut seen = HashSet::new();
    for _ in 0..200 {
        let recipe = engine
            .single_dfs("Steam", &mut ThreadRngPicker, &cancel)
            .unwrap();
        assert_eq!(recipe.content.len(), 1);
        seen.insert(recipe.content[0][2].name.clone());
    }
    assert_eq!(seen, HashSet::from(["Fire".to_string(), "Air".to_string()]));
}

#[test]
fn steam_one_bfs_expands_every_root_recipe() {
    let engine = engine(&steam_catalog());
    let cancel = CancellationToken::new();

    let recipe = engine
        .single_bfs("Steam", &mut ThreadRngPicker, &cancel)
        .unwrap();

    assert_eq!(recipe.content.len(), 2);
    assert!(recipe.content.iter().all(|group| group[0].parent == 0));
    assert_consistent(&recipe);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn unknown_element_returns_not_found_sentinel_for_every_variant() {
    let engine = engine(&mud_catalog());
    let cancel = CancellationToken::new();

    for order in ORDERS {
        for mode in MODES {
            let recipe = engine.run("Plasma", order, mode, &cancel).await.unwrap();
            assert!(recipe.content.is_empty(), "{order}/{mode}");
            assert!(recipe.name.contains("not found"), "{order}/{mode}");
            assert!(!recipe.is_found());
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn terminal_element_returns_empty_content_for_every_variant() {
    let engine = engine(&mud_catalog());
    let cancel = CancellationToken::new();

    for order in ORDERS {
        for mode in MODES {
            let recipe = engine.run("Water", order, mode, &cancel).await.unwrap();
            assert_eq!(recipe.name, "Water", "{order}/{mode}");
            assert!(recipe.content.is_empty(), "{order}/{mode}");
            assert!(recipe.is_found());
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn exhaustive_dfs_and_bfs_visit_the_same_elements() {
    let engine = engine(&layered_catalog());
    let cancel = CancellationToken::new();

    let dfs = engine.all_dfs("Steel", &cancel).await.unwrap();
    let bfs = engine.all_bfs("Steel", &cancel).await.unwrap();

    assert_consistent(&dfs);
    assert_consistent(&bfs);
    assert_eq!(dfs.content.len(), 8);
    assert_eq!(expanded_elements(&dfs), expanded_elements(&bfs));
    assert_eq!(group_signatures(&dfs), group_signatures(&bfs));
    assert_eq!(
        expanded_elements(&dfs),
        ["Steel", "Metal", "Coal", "Stone", "Lava", "Pressure"]
            .into_iter()
            .map(String::from)
            .collect()
    );
}

#[test]
fn single_dfs_matches_scripted_choices_exactly() {
    let engine = engine(&layered_catalog());
    let cancel = CancellationToken::new();
    // Steel -> (Metal, Coal), Metal -> only, Stone -> (Lava, Water), Lava -> only.
    let mut picker = ScriptedPicker::new(vec![1, 0, 1, 0]);

    let recipe = engine.single_dfs("Steel", &mut picker, &cancel).unwrap();

    let expected: Vec<(String, usize, usize)> = [
        ("merger", 1, 0),
        ("Metal", 2, 1),
        ("Coal", 3, 1),
        ("merger", 4, 2),
        ("Stone", 5, 4),
        ("Fire", 6, 4),
        ("merger", 7, 5),
        ("Lava", 8, 7),
        ("Water", 9, 7),
        ("merger", 10, 8),
        ("Earth", 11, 10),
        ("Fire", 12, 10),
        ("merger", 13, 3),
        ("Stone", 14, 13),
        ("Pressure", 15, 13),
        ("merger", 16, 15),
        ("Air", 17, 16),
        ("Air", 18, 16),
    ]
    .into_iter()
    .map(|(name, id, parent)| (name.to_string(), id, parent))
    .collect();

    assert_eq!(flatten(&recipe), expected);
    assert_eq!(picker.calls(), 6);
}

#[test]
fn single_bfs_stops_once_a_root_branch_resolves() {
    let engine = engine(&layered_catalog());
    let cancel = CancellationToken::new();
    let mut picker = ScriptedPicker::new(Vec::new());

    let recipe = engine.single_bfs("Steel", &mut picker, &cancel).unwrap();

    assert_consistent(&recipe);
    assert_eq!(recipe.content.len(), 5);
    assert_eq!(picker.calls(), 3, "Metal, Coal and Stone were expanded");
    let last = &recipe.content[4];
    assert_eq!(
        [last[0].name.as_str(), last[1].name.as_str(), last[2].name.as_str()],
        ["merger", "Lava", "Air"]
    );
    assert_eq!(last[0].parent, 8, "attached to the first Stone node");
}

#[test]
fn seeded_single_path_is_repeatable() {
    let engine = engine(&layered_catalog());
    let cancel = CancellationToken::new();

    for _ in 0..5 {
        let first = engine
            .single_dfs("Steel", &mut SeededPicker::new(11), &cancel)
            .unwrap();
        let second = engine
            .single_dfs("Steel", &mut SeededPicker::new(11), &cancel)
            .unwrap();
        assert_eq!(first, second);

        let first = engine
            .single_bfs("Steel", &mut SeededPicker::new(3), &cancel)
            .unwrap();
        let second = engine
            .single_bfs("Steel", &mut SeededPicker::new(3), &cancel)
            .unwrap();
        assert_eq!(first, second);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn cycles_terminate_in_every_variant() {
    let engine = engine(&cyclic_catalog());
    let cancel = CancellationToken::new();

    for order in ORDERS {
        for mode in MODES {
            let recipe = engine.run("A", order, mode, &cancel).await.unwrap();
            assert_consistent(&recipe);
            assert_eq!(recipe.content.len(), 2, "{order}/{mode}");
            assert_eq!(
                expanded_elements(&recipe),
                HashSet::from(["A".to_string(), "B".to_string()]),
                "{order}/{mode}"
            );
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn self_referencing_recipe_is_expanded_once() {
    let engine = engine(&[alchemy_lib::CatalogRecord::with_recipes(
        "Life",
        [("Life", "Spark")],
    )]);
    let cancel = CancellationToken::new();

    for order in ORDERS {
        for mode in MODES {
            let recipe = engine.run("Life", order, mode, &cancel).await.unwrap();
            assert_eq!(recipe.content.len(), 1, "{order}/{mode}");
            assert_consistent(&recipe);
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn wide_fan_out_respects_ids_under_a_small_gate() {
    let graph = Arc::new(build_graph(&wide_catalog(4, 6)));
    let cancel = CancellationToken::new();

    for max_concurrency in [1, 2, 5] {
        let engine = TraversalEngine::with_config(
            Arc::clone(&graph),
            EngineConfig { max_concurrency },
        );
        // L0-0 expands 6 recipes, then each of the 18 elements on levels 1-3
        // expands 6 more.
        let dfs = engine.all_dfs("L0-0", &cancel).await.unwrap();
        let bfs = engine.all_bfs("L0-0", &cancel).await.unwrap();

        assert_eq!(dfs.content.len(), 114);
        assert_eq!(bfs.content.len(), 114);
        assert_consistent(&dfs);
        assert_consistent(&bfs);
        assert_eq!(group_signatures(&dfs), group_signatures(&bfs));

        let max_id = dfs.nodes().map(|node| node.id).max().unwrap();
        assert_eq!(max_id, 114 * 3, "ids are dense within one call");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_calls_share_the_graph_independently() {
    let engine = engine(&wide_catalog(3, 5));
    let cancel = CancellationToken::new();

    let mut handles = Vec::new();
    for i in 0..16 {
        let engine = engine.clone();
        let cancel = cancel.clone();
        let order = if i % 2 == 0 {
            TraversalOrder::Dfs
        } else {
            TraversalOrder::Bfs
        };
        handles.push(tokio::spawn(async move {
            engine
                .run("L0-0", order, TraversalMode::All, &cancel)
                .await
        }));
    }

    for handle in handles {
        let recipe = handle.await.unwrap().unwrap();
        // 5 root recipes plus 5 recipes for each of the 10 elements below.
        assert_eq!(recipe.content.len(), 55);
        assert_consistent(&recipe);
        assert_eq!(recipe.content.iter().filter(|g| g[0].parent == 0).count(), 5);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn cancelled_token_aborts_every_variant() {
    let engine = engine(&layered_catalog());
    let cancel = CancellationToken::new();
    cancel.cancel();

    for order in ORDERS {
        for mode in MODES {
            let err = engine.run("Steel", order, mode, &cancel).await.unwrap_err();
            assert!(
                matches!(err, Error::TraversalCancelled { ref element } if element == "Steel"),
                "{order}/{mode}: {err}"
            );
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn cancellation_does_not_leak_into_the_callers_token() {
    let engine = engine(&layered_catalog());
    let cancel = CancellationToken::new();

    engine.all_dfs("Steel", &cancel).await.unwrap();
    engine.all_bfs("Steel", &cancel).await.unwrap();
    assert!(!cancel.is_cancelled());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn render_tree_rebuilds_mud() {
    let engine = engine(&mud_catalog());
    let recipe = engine
        .all_bfs("Mud", &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(
        recipe.render_tree(),
        "Mud\n└─ merger #1\n   ├─ Water #2\n   └─ Earth #3\n"
    );
}
