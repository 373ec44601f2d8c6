//! NegaScout (principal variation search).
//!
//! The first child of every node is searched with the full window. Later
//! children are first tested with a null window just above alpha and only
//! re-searched with the full window when the test shows they might beat the
//! current best. Pruning is always on.
//!
//! The memory variant keeps the bounds found by null-window tests in a
//! transposition table, so a re-search starts from a narrowed window.

use tracing::{debug, trace};

use crate::error::SearchError;
use crate::moves::Move;
use crate::options::{SearchOptions, SearchWindow};
use crate::searchable::Searchable;
use crate::strategy::brute::{BruteCore, improves, take_selected};
use crate::strategy::negamax::nega_leaf_value;
use crate::strategy::transposition::{Probe, TranspositionTable};
use crate::strategy::{SearchStats, SearchStrategy, SearchStrategyType};
use crate::weights::Weights;

pub struct NegaScoutStrategy<'w> {
    core: BruteCore<'w>,
    table: Option<TranspositionTable>,
    re_searches: u64,
}

impl<'w> NegaScoutStrategy<'w> {
    pub fn new(options: SearchOptions, weights: &'w Weights) -> Result<Self, SearchError> {
        Ok(Self {
            core: BruteCore::new(options.with_alpha_beta(true), weights)?,
            table: None,
            re_searches: 0,
        })
    }

    /// NegaScout with a transposition table cleared at the start of each search.
    pub fn with_memory(options: SearchOptions, weights: &'w Weights) -> Result<Self, SearchError> {
        let mut strategy = Self::new(options, weights)?;
        strategy.table = Some(TranspositionTable::new());
        Ok(strategy)
    }

    pub fn uses_memory(&self) -> bool {
        self.table.is_some()
    }

    /// Number of null-window tests that needed a full re-search in the last search.
    pub fn re_searches(&self) -> u64 {
        self.re_searches
    }

    fn search_node<S: Searchable>(
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
            let value = if i == 0 {
                self.search_node(pos, mv, depth - 1, window.negated(), last.value);
                -mv.inherited_value
            } else {
                let test = SearchWindow::new(-window.alpha - 1, -window.alpha);
                self.search_node(pos, mv, depth - 1, test, last.value);
                let tested = -mv.inherited_value;
                if window.alpha < tested && tested < window.beta {
                    self.re_searches += 1;
                    trace!(depth, tested, %window, "null window failed high, re-searching");
                    self.search_node(pos, mv, depth - 1, window.negated(), last.value);
                    -mv.inherited_value
                } else {
                    tested
                }
            };
            self.core.undo(pos, mv);
            self.core.searched(depth);

            if improves(best, value, true) {
                best = Some((i, value));
            }
            window.alpha = window.alpha.max(value);
            if window.alpha >= window.beta {
                trace!(depth, %window, "cut-off");
                break;
            }
        }

        let (index, value) = best?;
        last.inherited_value = value;
        take_selected(moves, index)
    }
}

impl<S: Searchable> SearchStrategy<S> for NegaScoutStrategy<'_> {
    fn search(&mut self, position: &mut S, last: &Move<S::Action>) -> Option<Move<S::Action>> {
        self.core.begin();
        if let Some(table) = self.table.as_mut() {
            table.clear();
        }
        self.re_searches = 0;
        let depth = self.core.look_ahead();
        let window = self.core.options.initial_window;

        let mut root = last.clone();
        let best = self.search_node(position, &mut root, depth, window, last.value);
        self.core.finish();

        debug!(
            strategy = "negascout",
            memory = self.uses_memory(),
            look_ahead = depth,
            moves_considered = self.core.stats.moves_considered,
            re_searches = self.re_searches,
            table_hits = self.table.as_ref().map_or(0, TranspositionTable::hits),
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
        if self.uses_memory() {
            SearchStrategyType::NegaScoutMemory
        } else {
            SearchStrategyType::NegaScout
        }
    }
}
