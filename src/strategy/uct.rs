//! Monte-Carlo tree search with UCB1 selection (UCT).
//!
//! Each simulation descends from the root choosing the child with the
//! highest UCB1 value, expands a node the second time it is reached, and
//! scores a node the first time it is reached with a random playout. The
//! outcome is propagated to every node on the path. The recommended move is
//! the root child with the most visits.
//!
//! With more than one worker, simulations run on scoped threads that share
//! the tree. Each worker searches its own copy of the position with its own
//! random number generator, so results are only reproducible with a single
//! worker.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::thread;

use tracing::debug;

use crate::best_moves::BestMoveFinder;
use crate::error::{SearchError, violated};
use crate::moves::Move;
use crate::options::{MonteCarloOptions, SearchOptions};
use crate::searchable::Searchable;
use crate::strategy::uct_node::UctNode;
use crate::strategy::{SearchStats, SearchStrategy, SearchStrategyType};
use crate::weights::Weights;

pub struct UctStrategy<'w> {
    options: SearchOptions,
    weights: &'w Weights,
    finder: BestMoveFinder,
    stats: SearchStats,
}

/// Read-only state shared by all workers of one search.
struct Simulator<'a> {
    options: &'a MonteCarloOptions,
    percent_less_than_best: u32,
    weights: &'a Weights,
    finder: BestMoveFinder,
    /// Simulations started so far.
    started: AtomicU32,
    playouts: AtomicU64,
}

impl<'w> UctStrategy<'w> {
    pub fn new(options: SearchOptions, weights: &'w Weights) -> Result<Self, SearchError> {
        options.validate()?;
        Ok(Self {
            finder: BestMoveFinder::from_options(&options),
            options,
            weights,
            stats: SearchStats::default(),
        })
    }

    /// Run every simulation and return the finished tree.
    pub fn build_tree<S: Searchable>(
        &mut self,
        position: &mut S,
        last: &Move<S::Action>,
    ) -> UctNode<S::Action> {
        let root = UctNode::new(last.clone());
        let simulator = Simulator {
            options: &self.options.monte_carlo,
            percent_less_than_best: self.options.percent_less_than_best_thresh,
            weights: self.weights,
            finder: self.finder,
            started: AtomicU32::new(0),
            playouts: AtomicU64::new(0),
        };
        let seed = simulator.options.seed;
        let workers = simulator.options.workers;

        if workers <= 1 {
            let mut rng = fastrand::Rng::with_seed(seed);
            simulator.run(&root, position, &mut rng);
        } else {
            thread::scope(|scope| {
                for idx in 0..workers {
                    let mut copy = position.copy();
                    let (simulator, root) = (&simulator, &root);
                    scope.spawn(move || {
                        let mut rng = fastrand::Rng::with_seed(seed.wrapping_add(idx as u64));
                        simulator.run(root, &mut copy, &mut rng);
                    });
                }
            });
        }

        let max = simulator.options.max_simulations;
        let done = simulator.started.load(Ordering::Relaxed);
        self.stats = SearchStats {
            moves_considered: simulator.playouts.load(Ordering::Relaxed),
            percent_done: (100 * u64::from(done) / u64::from(max.max(1))) as u32,
        };
        root
    }
}

impl Simulator<'_> {
    fn run<S: Searchable>(&self, root: &UctNode<S::Action>, pos: &mut S, rng: &mut fastrand::Rng) {
        while self.claim_simulation() {
            self.play_simulation(root, pos, rng);
        }
    }

    /// Reserve the next simulation. The counter never passes the maximum.
    fn claim_simulation(&self) -> bool {
        let max = self.options.max_simulations;
        self.started
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| (n < max).then_some(n + 1))
            .is_ok()
    }

    /// One simulation below `node`. Returns true if player one won.
    fn play_simulation<S: Searchable>(
        &self,
        node: &UctNode<S::Action>,
        pos: &mut S,
        rng: &mut fastrand::Rng,
    ) -> bool {
        let player1_won = if node.num_visits() == 0 {
            let mut copy = pos.copy();
            self.playouts.fetch_add(1, Ordering::Relaxed);
            self.play_random_game(&mut copy, &node.mv, rng)
        } else {
            let children = node.expand_with(|| self.create_children(pos, &node.mv));
            if children.is_empty() {
                pos.worth(&node.mv, self.weights) > 0
            } else {
                match node.uct_select(self.options.explore_exploit_ratio) {
                    Some(child) => {
                        pos.make_move(&child.mv);
                        let won = self.play_simulation(child, pos, rng);
                        pos.undo_move(&child.mv);
                        won
                    }
                    None => pos.worth(&node.mv, self.weights) > 0,
                }
            }
        };

        node.increment_visits();
        node.update_win(player1_won);
        if node.has_children() {
            node.set_best_node();
        }
        player1_won
    }

    fn create_children<S: Searchable>(
        &self,
        pos: &mut S,
        last: &Move<S::Action>,
    ) -> Vec<UctNode<S::Action>> {
        if last.is_winning() || pos.done(last, false) {
            return Vec::new();
        }
        let moves = pos.generate_moves(last, self.weights, true);
        if moves.is_empty() {
            violated(&SearchError::NoCandidateMoves(format!("{:?}", last.action)));
            return Vec::new();
        }
        self.finder
            .get_best_moves(!last.player1, moves, true)
            .into_iter()
            .map(UctNode::new)
            .collect()
    }

    /// Play random moves on `pos` until the game ends or the playout limit
    /// is reached. Player one wins if the final worth is positive.
    fn play_random_game<S: Searchable>(
        &self,
        pos: &mut S,
        last: &Move<S::Action>,
        rng: &mut fastrand::Rng,
    ) -> bool {
        let start = pos.num_moves();
        let limit = self.options.random_look_ahead as usize;
        let mut last = last.clone();

        loop {
            let played = pos.num_moves().saturating_sub(start);
            if played >= limit || last.is_winning() || pos.done(&last, false) {
                break;
            }
            let moves = pos.generate_moves(&last, self.weights, true);
            let Some(next) = moves
                .random_move_for_thresh(rng, self.percent_less_than_best, !last.player1)
                .cloned()
            else {
                break;
            };
            pos.make_move(&next);
            last = next;
        }
        pos.worth(&last, self.weights) > 0
    }
}

impl<S: Searchable> SearchStrategy<S> for UctStrategy<'_> {
    fn search(&mut self, position: &mut S, last: &Move<S::Action>) -> Option<Move<S::Action>> {
        let root = self.build_tree(position, last);
        let best = root.best_node().map(|node| {
            let mut mv = node.mv.clone();
            mv.selected = true;
            mv
        });

        debug!(
            strategy = "uct",
            simulations = self.options.monte_carlo.max_simulations,
            workers = self.options.monte_carlo.workers,
            root_visits = root.num_visits(),
            playouts = self.stats.moves_considered,
            best = ?best.as_ref().map(|m| &m.action),
            "search finished"
        );
        best
    }

    fn stats(&self) -> SearchStats {
        self.stats
    }

    fn kind(&self) -> SearchStrategyType {
        SearchStrategyType::Uct
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simulator<'a>(options: &'a MonteCarloOptions, weights: &'a Weights) -> Simulator<'a> {
        Simulator {
            options,
            percent_less_than_best: 0,
            weights,
            finder: BestMoveFinder::new(100, 1),
            started: AtomicU32::new(0),
            playouts: AtomicU64::new(0),
        }
    }

    #[test]
    fn test_claims_stop_at_max_simulations() {
        let options = SearchOptions::default().with_max_simulations(3).monte_carlo;
        let weights = Weights::default();
        let sim = simulator(&options, &weights);
        let claimed = (0..10).filter(|_| sim.claim_simulation()).count();
        assert_eq!(claimed, 3);
        assert_eq!(sim.started.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn test_claims_never_wrap_at_u32_max() {
        let options = SearchOptions::default().with_max_simulations(u32::MAX).monte_carlo;
        let weights = Weights::default();
        let sim = simulator(&options, &weights);
        sim.started.store(u32::MAX - 1, Ordering::Relaxed);

        assert!(sim.claim_simulation());
        for _ in 0..4 {
            assert!(!sim.claim_simulation());
        }
        assert_eq!(sim.started.load(Ordering::Relaxed), u32::MAX);
    }
}
