//! Nodes of the UCT search tree.
//!
//! Statistics are atomic so that several workers can share one tree:
//! - `num_visits` / `num_wins` are updated with relaxed increments
//! - children are created exactly once, by whichever worker expands first
//! - the cached best child is an index refreshed after every update

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

use crate::constants::{UCT_EXPLORATION_DIVISOR, UNVISITED_UCT_VALUE};
use crate::moves::Move;

const NO_BEST: usize = usize::MAX;

/// A move in the UCT tree together with its playout statistics.
#[derive(Debug)]
pub struct UctNode<A> {
    /// The move leading to this node.
    pub mv: Move<A>,
    num_visits: AtomicU32,
    /// Playouts won by the player who made `mv`.
    num_wins: AtomicU32,
    children: OnceLock<Vec<UctNode<A>>>,
    best: AtomicUsize,
}

impl<A> UctNode<A> {
    pub fn new(mv: Move<A>) -> Self {
        Self {
            mv,
            num_visits: AtomicU32::new(0),
            num_wins: AtomicU32::new(0),
            children: OnceLock::new(),
            best: AtomicUsize::new(NO_BEST),
        }
    }

    #[inline]
    pub fn num_visits(&self) -> u32 {
        self.num_visits.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn num_wins(&self) -> u32 {
        self.num_wins.load(Ordering::Relaxed)
    }

    /// Fraction of playouts won by this node's mover, 0 when unvisited.
    pub fn win_rate(&self) -> f64 {
        let visits = self.num_visits();
        if visits == 0 {
            0.0
        } else {
            f64::from(self.num_wins()) / f64::from(visits)
        }
    }

    /// UCB1 selection value.
    ///
    /// Unvisited nodes score above every visited node.
    pub fn uct_value(&self, explore_exploit_ratio: f64, parent_visits: u32) -> f64 {
        let visits = self.num_visits();
        if visits == 0 {
            return UNVISITED_UCT_VALUE;
        }
        let exploration = (f64::from(parent_visits).ln()
            / (UCT_EXPLORATION_DIVISOR * f64::from(visits)))
        .sqrt();
        self.win_rate() + explore_exploit_ratio * exploration
    }

    pub fn increment_visits(&self) {
        self.num_visits.fetch_add(1, Ordering::Relaxed);
    }

    /// Credit a win if the playout winner is this node's mover.
    pub fn update_win(&self, player1_won: bool) {
        if player1_won == self.mv.player1 {
            self.num_wins.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Children in insertion order, empty until expanded.
    pub fn children(&self) -> &[UctNode<A>] {
        self.children.get().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_children(&self) -> bool {
        !self.children().is_empty()
    }

    /// Create the children with `make` unless another worker already did.
    pub fn expand_with<F>(&self, make: F) -> &[UctNode<A>]
    where
        F: FnOnce() -> Vec<UctNode<A>>,
    {
        self.children.get_or_init(make)
    }

    /// Child with the highest UCB1 value. Ties go to the earliest child.
    pub fn uct_select(&self, explore_exploit_ratio: f64) -> Option<&UctNode<A>> {
        let parent_visits = self.num_visits();
        let mut best: Option<&UctNode<A>> = None;
        let mut best_value = -1.0;
        for child in self.children() {
            let value = child.uct_value(explore_exploit_ratio, parent_visits);
            if value > best_value {
                best_value = value;
                best = Some(child);
            }
        }
        best
    }

    /// Cache the most visited child. Ties go to the earliest child.
    pub fn set_best_node(&self) {
        let mut best = NO_BEST;
        let mut most = 0;
        for (i, child) in self.children().iter().enumerate() {
            let visits = child.num_visits();
            if best == NO_BEST || visits > most {
                best = i;
                most = visits;
            }
        }
        self.best.store(best, Ordering::Relaxed);
    }

    /// The cached most visited child.
    pub fn best_node(&self) -> Option<&UctNode<A>> {
        self.children().get(self.best.load(Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_with(visits: u32, wins: u32, player1: bool) -> UctNode<u8> {
        let node = UctNode::new(Move::new(0, player1, 0));
        node.num_visits.store(visits, Ordering::Relaxed);
        node.num_wins.store(wins, Ordering::Relaxed);
        node
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-4,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_uct_value_single_visit() {
        let node = node_with(1, 0, true);
        assert_close(node.uct_value(1.0, 2), 0.3723297411);
        assert_close(node.uct_value(1.0, 32), 0.83255461);
    }

    #[test]
    fn test_uct_value_scales_with_ratio() {
        let node = node_with(10, 1, true);
        assert_close(node.uct_value(0.1, 32), 0.12633);
        assert_close(node.uct_value(1.0, 32), 0.36328);
        assert_close(node.uct_value(10.0, 32), 2.73277);
    }

    #[test]
    fn test_unvisited_beats_visited() {
        let unvisited = node_with(0, 0, true);
        let strong = node_with(1, 1, true);
        assert!(unvisited.uct_value(1.0, 100) > strong.uct_value(100.0, 100));
    }

    #[test]
    fn test_win_rate_and_update() {
        let node = node_with(0, 0, false);
        assert_eq!(node.win_rate(), 0.0);
        node.increment_visits();
        node.update_win(false);
        node.increment_visits();
        node.update_win(true);
        assert_eq!(node.num_visits(), 2);
        assert_eq!(node.num_wins(), 1);
        assert_close(node.win_rate(), 0.5);
    }

    #[test]
    fn test_best_node_prefers_first_on_tie() {
        let root = node_with(6, 0, false);
        root.expand_with(|| vec![node_with(2, 0, true), node_with(3, 0, true), node_with(3, 3, true)]);
        assert!(root.best_node().is_none());
        root.set_best_node();
        let best = root.best_node().unwrap();
        assert_eq!(best.num_wins(), 0, "tie on visits goes to the earlier child");
        assert_eq!(best.num_visits(), 3);
    }

    #[test]
    fn test_select_prefers_unvisited_then_first() {
        let root = node_with(3, 0, false);
        root.expand_with(|| vec![node_with(1, 0, true), node_with(0, 0, true), node_with(0, 0, true)]);
        let picked = root.uct_select(1.0).unwrap();
        assert!(std::ptr::eq(picked, &root.children()[1]));
    }
}
