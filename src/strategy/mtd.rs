//! MTD(f): converging on the NegaMax value with null-window searches.
//!
//! Each pass runs a NegaMax alpha-beta search from the root with a
//! zero-width window just below `beta`. A result below `beta` is a new upper
//! bound, anything else a new lower bound. The next `beta` is chosen from
//! the latest result until the bounds meet. With memory enabled, a
//! transposition table keeps bounds from earlier passes so that later passes
//! revisit fewer nodes.

use tracing::{debug, trace};

use crate::constants::{INFINITY, MAX_MTD_PASSES};
use crate::error::SearchError;
use crate::moves::Move;
use crate::options::{SearchOptions, SearchWindow};
use crate::searchable::Searchable;
use crate::strategy::brute::BruteCore;
use crate::strategy::negamax::NegaSearch;
use crate::strategy::transposition::TranspositionTable;
use crate::strategy::{SearchStats, SearchStrategy, SearchStrategyType};
use crate::weights::Weights;

pub struct MtdStrategy<'w> {
    search: NegaSearch<'w>,
    passes: usize,
}

impl<'w> MtdStrategy<'w> {
    pub fn new(options: SearchOptions, weights: &'w Weights) -> Result<Self, SearchError> {
        let core = BruteCore::new(options.with_alpha_beta(true), weights)?;
        Ok(Self {
            search: NegaSearch::new(core),
            passes: 0,
        })
    }

    /// MTD(f) with a transposition table shared by all passes of a search.
    pub fn with_memory(options: SearchOptions, weights: &'w Weights) -> Result<Self, SearchError> {
        let mut strategy = Self::new(options, weights)?;
        strategy.search.table = Some(TranspositionTable::new());
        Ok(strategy)
    }

    pub fn uses_memory(&self) -> bool {
        self.search.table.is_some()
    }

    /// Number of null-window passes run by the last search.
    pub fn passes(&self) -> usize {
        self.passes
    }
}

impl<S: Searchable> SearchStrategy<S> for MtdStrategy<'_> {
    fn search(&mut self, position: &mut S, last: &Move<S::Action>) -> Option<Move<S::Action>> {
        self.search.begin();
        self.passes = 0;

        let depth = self.search.core.look_ahead();
        let mut guess = self.search.core.options.initial_window.midpoint();
        let (mut lower, mut upper) = (-INFINITY, INFINITY);
        let mut fail_high_best: Option<Move<S::Action>> = None;
        let mut last_best: Option<Move<S::Action>> = None;

        while lower < upper && self.passes < MAX_MTD_PASSES {
            let beta = if guess == lower { guess + 1 } else { guess };
            let mut root = last.clone();
            let found =
                self.search
                    .search_node(position, &mut root, depth, SearchWindow::null(beta), last.value);
            self.passes += 1;
            guess = root.inherited_value;
            trace!(pass = self.passes, beta, guess, "mtd pass");

            let Some(found) = found else {
                break;
            };
            if guess < beta {
                upper = guess;
                last_best = Some(found);
            } else {
                lower = guess;
                fail_high_best = Some(found.clone());
                last_best = Some(found);
            }
        }
        self.search.core.finish();

        let mut best = fail_high_best.or(last_best);
        if let Some(mv) = best.as_mut() {
            mv.inherited_value = -guess;
        }
        debug!(
            strategy = "mtd",
            memory = self.uses_memory(),
            look_ahead = depth,
            passes = self.passes,
            table_hits = self.search.table_hits(),
            moves_considered = self.search.core.stats.moves_considered,
            best = ?best.as_ref().map(|m| &m.action),
            value = guess,
            "search finished"
        );
        best
    }

    fn stats(&self) -> SearchStats {
        self.search.core.stats
    }

    fn kind(&self) -> SearchStrategyType {
        if self.uses_memory() {
            SearchStrategyType::MtdMemory
        } else {
            SearchStrategyType::Mtd
        }
    }
}
