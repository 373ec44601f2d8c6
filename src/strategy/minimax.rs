//! Fixed-depth MiniMax with optional alpha-beta pruning and quiescence.
//!
//! Values are never negated: player one maximizes and player two minimizes
//! the same player-one score.

use tracing::{debug, trace};

use crate::error::SearchError;
use crate::moves::Move;
use crate::options::{SearchOptions, SearchWindow};
use crate::searchable::Searchable;
use crate::strategy::brute::{BruteCore, improves, take_selected};
use crate::strategy::{SearchStats, SearchStrategy, SearchStrategyType};
use crate::weights::Weights;

pub struct MiniMaxStrategy<'w> {
    core: BruteCore<'w>,
}

impl<'w> MiniMaxStrategy<'w> {
    pub fn new(options: SearchOptions, weights: &'w Weights) -> Result<Self, SearchError> {
        Ok(Self {
            core: BruteCore::new(options, weights)?,
        })
    }

    /// Search below `last`, leaving its backed-up value in `last.inherited_value`.
    fn search_node<S: Searchable>(
        &mut self,
        pos: &mut S,
        last: &mut Move<S::Action>,
        depth: i32,
        mut window: SearchWindow,
        parent_value: i32,
    ) -> Option<Move<S::Action>> {
        if !self.core.check_window(window) {
            last.inherited_value = last.value;
            return None;
        }
        let Some(mut moves) = self.core.frontier(pos, last, depth, parent_value) else {
            last.inherited_value = last.value;
            return None;
        };

        let player1 = !last.player1;
        let mut best: Option<(usize, i32)> = None;

        for (i, mv) in moves.iter_mut().enumerate() {
            self.core.make(pos, mv);
            self.search_node(pos, mv, depth - 1, window, last.value);
            self.core.undo(pos, mv);
            self.core.searched(depth);

            let value = mv.inherited_value;
            if improves(best, value, player1) {
                best = Some((i, value));
            }

            if self.core.pruning() {
                if player1 {
                    window.alpha = window.alpha.max(value);
                } else {
                    window.beta = window.beta.min(value);
                }
                if window.alpha >= window.beta {
                    trace!(depth, %window, "cut-off");
                    break;
                }
            }
        }

        let (index, value) = best?;
        last.inherited_value = value;
        take_selected(moves, index)
    }
}

impl<S: Searchable> SearchStrategy<S> for MiniMaxStrategy<'_> {
    fn search(&mut self, position: &mut S, last: &Move<S::Action>) -> Option<Move<S::Action>> {
        self.core.begin();
        let mut root = last.clone();
        let depth = self.core.look_ahead();
        let window = self.core.options.initial_window;

        let best = self.search_node(position, &mut root, depth, window, last.value);
        self.core.finish();

        debug!(
            strategy = "minimax",
            look_ahead = depth,
            moves_considered = self.core.stats.moves_considered,
            best = ?best.as_ref().map(|m| &m.action),
            value = root.inherited_value,
            "search finished"
        );
        best
    }

    fn stats(&self) -> SearchStats {
        self.core.stats
    }

    fn kind(&self) -> SearchStrategyType {
        SearchStrategyType::MiniMax
    }
}
