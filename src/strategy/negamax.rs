//! NegaMax: MiniMax where every node maximizes from its own mover's view.
//!
//! The backed-up value of a node is the negation of its best child's. The
//! value returned with the chosen move is therefore the negation of the
//! MiniMax value for the same search. The recursion is shared with
//! [`MtdStrategy`](crate::strategy::MtdStrategy). Both can keep value bounds
//! in a transposition table, probed at every node below the root.

use tracing::{debug, trace};

use crate::error::SearchError;
use crate::moves::Move;
use crate::options::{SearchOptions, SearchWindow};
use crate::searchable::Searchable;
use crate::strategy::brute::{BruteCore, improves, take_selected};
use crate::strategy::transposition::{Probe, TranspositionTable};
use crate::strategy::{SearchStats, SearchStrategy, SearchStrategyType};
use crate::weights::Weights;

/// Static value of the position after `last`, seen from the side to move.
pub(crate) fn nega_leaf_value<A>(last: &Move<A>) -> i32 {
    if last.player1 { -last.value } else { last.value }
}

pub(crate) struct NegaSearch<'w> {
    pub core: BruteCore<'w>,
    pub table: Option<TranspositionTable>,
}

impl<'w> NegaSearch<'w> {
    pub fn new(core: BruteCore<'w>) -> Self {
        Self { core, table: None }
    }

    /// Reset the counters and forget the table contents.
    pub fn begin(&mut self) {
        self.core.begin();
        if let Some(table) = self.table.as_mut() {
            table.clear();
        }
    }

    pub fn table_hits(&self) -> u64 {
        self.table.as_ref().map_or(0, TranspositionTable::hits)
    }

    /// Search below `last`, leaving the value for the side to move in
    /// `last.inherited_value`.
    pub fn search_node<S: Searchable>(
        &mut self,
        pos: &mut S,
        last: &mut Move<S::Action>,
        depth: i32,
        window: SearchWindow,
        parent_value: i32,
    ) -> Option<Move<S::Action>> {
        if !self.core.check_window(window) {
            last.inherited_value = nega_leaf_value(last);
            return None;
        }

        let mut window = window;
        let key = match self.table {
            Some(_) if !self.core.at_root() => pos.hash_key(),
            _ => None,
        };
        if let (Some(table), Some(key)) = (self.table.as_mut(), key) {
            match table.probe(key, depth, window) {
                Probe::Cutoff(value) => {
                    last.inherited_value = value;
                    return None;
                }
                Probe::Narrowed(narrowed) => window = narrowed,
                Probe::Miss => {}
            }
        }
        let searched_window = window;

        let best = self.expand(pos, last, depth, window, parent_value);

        if let (Some(table), Some(key)) = (self.table.as_mut(), key) {
            table.store(key, depth, last.inherited_value, searched_window);
        }
        best
    }

    fn expand<S: Searchable>(
        &mut self,
        pos: &mut S,
        last: &mut Move<S::Action>,
        depth: i32,
        mut window: SearchWindow,
        parent_value: i32,
    ) -> Option<Move<S::Action>> {
        let Some(mut moves) = self.core.frontier(pos, last, depth, parent_value) else {
            last.inherited_value = nega_leaf_value(last);
            return None;
        };

        let mut best: Option<(usize, i32)> = None;
        for (i, mv) in moves.iter_mut().enumerate() {
            self.core.make(pos, mv);
            self.search_node(pos, mv, depth - 1, window.negated(), last.value);
            self.core.undo(pos, mv);
            self.core.searched(depth);

            let value = -mv.inherited_value;
            if improves(best, value, true) {
                best = Some((i, value));
            }

            if self.core.pruning() {
                window.alpha = window.alpha.max(value);
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

pub struct NegaMaxStrategy<'w> {
    search: NegaSearch<'w>,
}

impl<'w> NegaMaxStrategy<'w> {
    pub fn new(options: SearchOptions, weights: &'w Weights) -> Result<Self, SearchError> {
        Ok(Self {
            search: NegaSearch::new(BruteCore::new(options, weights)?),
        })
    }

    /// NegaMax with a transposition table cleared at the start of each search.
    pub fn with_memory(options: SearchOptions, weights: &'w Weights) -> Result<Self, SearchError> {
        let mut strategy = Self::new(options, weights)?;
        strategy.search.table = Some(TranspositionTable::new());
        Ok(strategy)
    }

    pub fn uses_memory(&self) -> bool {
        self.search.table.is_some()
    }
}

impl<S: Searchable> SearchStrategy<S> for NegaMaxStrategy<'_> {
    fn search(&mut self, position: &mut S, last: &Move<S::Action>) -> Option<Move<S::Action>> {
        self.search.begin();
        let depth = self.search.core.look_ahead();
        let window = self.search.core.options.initial_window;

        let mut root = last.clone();
        let best = self.search.search_node(position, &mut root, depth, window, last.value);
        self.search.core.finish();

        debug!(
            strategy = "negamax",
            memory = self.uses_memory(),
            look_ahead = depth,
            table_hits = self.search.table_hits(),
            moves_considered = self.search.core.stats.moves_considered,
            best = ?best.as_ref().map(|m| &m.action),
            value = root.inherited_value,
            "search finished"
        );
        best
    }

    fn stats(&self) -> SearchStats {
        self.search.core.stats
    }

    fn kind(&self) -> SearchStrategyType {
        if self.uses_memory() {
            SearchStrategyType::NegaMaxMemory
        } else {
            SearchStrategyType::NegaMax
        }
    }
}
