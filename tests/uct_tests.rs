//! Integration tests for the Monte-Carlo (UCT) strategy.

use std::sync::Arc;

use gamesearch::game_tree::{GameTree, TreePosition, example_tree};
use gamesearch::options::SearchOptions;
use gamesearch::strategy::{SearchStrategy, UctStrategy};
use gamesearch::weights::Weights;

// =============================================================================
// Helper functions
// =============================================================================

fn example() -> Arc<GameTree> {
    Arc::new(example_tree().expect("built-in tree parses"))
}

/// Ten simulations with deterministic playouts (always the best reply).
fn ten_simulations(seed: u64) -> SearchOptions {
    SearchOptions::default()
        .with_max_simulations(10)
        .with_explore_exploit_ratio(1.0)
        .with_percent_less_than_best_thresh(0)
        .with_random_look_ahead(10)
        .with_seed(seed)
}

/// Three replies everywhere, all valued 0 until the last ply, so playouts
/// choose at random. Each fifth-ply group shares a +3 or -3 outcome.
fn even_tree() -> Arc<GameTree> {
    let mut text = String::from("root 0\n");
    let mut level = vec![String::new()];
    for depth in 1..=5 {
        let mut next = Vec::new();
        for parent in &level {
            for digit in ['0', '1', '2'] {
                let id = format!("{parent}{digit}");
                let value = if depth < 5 {
                    0
                } else {
                    let sum: u32 = parent.chars().filter_map(|c| c.to_digit(10)).sum();
                    if sum % 2 == 0 { 3 } else { -3 }
                };
                text.push_str(&format!("{id} {value}\n"));
                next.push(id);
            }
        }
        level = next;
    }
    Arc::new(GameTree::parse(&text).expect("generated tree parses"))
}

/// Visits and wins of every root child, plus the search result.
fn seeded_run(tree: &Arc<GameTree>, seed: u64) -> (Vec<(u32, u32)>, (String, i32, u64)) {
    let weights = Weights::default();
    let options = SearchOptions::default()
        .with_max_simulations(200)
        .with_explore_exploit_ratio(1.0)
        .with_percent_less_than_best_thresh(50)
        .with_random_look_ahead(10)
        .with_seed(seed);
    let mut strategy = UctStrategy::new(options.clone(), &weights).unwrap();
    let mut position = TreePosition::new(Arc::clone(tree));

    let root = strategy.build_tree(&mut position, &tree.root_move());
    let children = root
        .children()
        .iter()
        .map(|c| (c.num_visits(), c.num_wins()))
        .collect();

    let mut strategy = UctStrategy::new(options, &weights).unwrap();
    let best = strategy.search(&mut position, &tree.root_move()).unwrap();
    assert_eq!(position.current().id, "");
    let triple = (best.action, best.inherited_value, SearchStrategy::<TreePosition>::stats(&strategy).moves_considered);
    (children, triple)
}

// =============================================================================
// Search results
// =============================================================================

#[test]
fn test_ten_simulations_on_example_tree() {
    let tree = example();
    let weights = Weights::default();
    let mut strategy = UctStrategy::new(ten_simulations(0), &weights).unwrap();
    let mut position = TreePosition::new(Arc::clone(&tree));

    let best = strategy.search(&mut position, &tree.root_move()).unwrap();
    assert_eq!(best.action, "0");
    assert_eq!(best.value, -8);
    assert_eq!(best.inherited_value, -8);
    assert!(best.selected);
    assert_eq!(SearchStrategy::<TreePosition>::stats(&strategy).moves_considered, 10);
    assert_eq!(SearchStrategy::<TreePosition>::stats(&strategy).percent_done, 100);
    assert_eq!(position.current().id, "", "search must restore the position");
}

#[test]
fn test_visit_counts_are_reproducible() {
    let tree = example();
    let weights = Weights::default();
    for seed in [0, 1, 42, 12345] {
        let mut strategy = UctStrategy::new(ten_simulations(seed), &weights).unwrap();
        let mut position = TreePosition::new(Arc::clone(&tree));
        let root = strategy.build_tree(&mut position, &tree.root_move());

        assert_eq!(root.num_visits(), 10, "seed {seed}");
        let visits: Vec<u32> = root.children().iter().map(|c| c.num_visits()).collect();
        assert_eq!(visits, vec![6, 3], "seed {seed}");
        let best = root.best_node().unwrap();
        assert_eq!(best.mv.action, "0");
        assert_eq!(best.num_wins(), 1, "only the \"01\" playout favours player one");
    }
}

#[test]
fn test_random_playouts_follow_the_seed() {
    let tree = even_tree();
    let (children, triple) = seeded_run(&tree, 5);
    assert_eq!(children.len(), 3);
    assert_eq!(children.iter().map(|c| c.0).sum::<u32>(), 199);
    assert_eq!(seeded_run(&tree, 5), (children.clone(), triple.clone()), "same seed, same search");

    let differs = (6..14).any(|seed| seeded_run(&tree, seed).0 != children);
    assert!(differs, "other seeds should change the playout statistics");
}

#[test]
fn test_playout_threshold_still_finds_a_move() {
    let tree = example();
    let weights = Weights::default();
    let options = ten_simulations(7)
        .with_max_simulations(200)
        .with_percent_less_than_best_thresh(100);
    let mut strategy = UctStrategy::new(options, &weights).unwrap();
    let mut position = TreePosition::new(Arc::clone(&tree));

    let root = strategy.build_tree(&mut position, &tree.root_move());
    assert_eq!(root.num_visits(), 200);
    let child_visits: u32 = root.children().iter().map(|c| c.num_visits()).sum();
    assert_eq!(child_visits, 199, "the first simulation plays out the root itself");
}

#[test]
fn test_parallel_workers_share_the_tree() {
    let tree = example();
    let weights = Weights::default();
    let options = ten_simulations(3).with_max_simulations(400).with_workers(4);
    let mut strategy = UctStrategy::new(options, &weights).unwrap();
    let mut position = TreePosition::new(Arc::clone(&tree));

    let root = strategy.build_tree(&mut position, &tree.root_move());
    assert_eq!(root.num_visits(), 400, "no visit may be lost");
    assert!(root.best_node().is_some());
    assert_eq!(SearchStrategy::<TreePosition>::stats(&strategy).percent_done, 100);
    assert_eq!(position.current().id, "");
}

#[test]
fn test_terminal_root_has_no_move() {
    let tree = Arc::new(GameTree::parse("root 3\n").unwrap());
    let weights = Weights::default();
    let mut strategy = UctStrategy::new(ten_simulations(0), &weights).unwrap();
    let mut position = TreePosition::new(Arc::clone(&tree));

    assert!(strategy.search(&mut position, &tree.root_move()).is_none());
    assert_eq!(SearchStrategy::<TreePosition>::stats(&strategy).moves_considered, 1, "only the first visit plays out");
}
