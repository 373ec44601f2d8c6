//! Bookkeeping shared by the fixed-depth strategies.
//!
//! Decides whether a node is a leaf, a quiescence extension or an interior
//! node, and counts every move the search makes.

use tracing::trace;

use crate::best_moves::BestMoveFinder;
use crate::error::{SearchError, violated};
use crate::moves::{Move, MoveList};
use crate::options::{SearchOptions, SearchWindow};
use crate::searchable::Searchable;
use crate::strategy::SearchStats;
use crate::weights::Weights;

pub(crate) struct BruteCore<'w> {
    pub options: SearchOptions,
    pub weights: &'w Weights,
    pub stats: SearchStats,
    finder: BestMoveFinder,
    /// Moves made and not yet undone.
    ply: i32,
    num_top_level_moves: usize,
    top_level_searched: usize,
}

impl<'w> BruteCore<'w> {
    pub fn new(options: SearchOptions, weights: &'w Weights) -> Result<Self, SearchError> {
        options.validate()?;
        Ok(Self {
            finder: BestMoveFinder::from_options(&options),
            options,
            weights,
            stats: SearchStats::default(),
            ply: 0,
            num_top_level_moves: 0,
            top_level_searched: 0,
        })
    }

    pub fn look_ahead(&self) -> i32 {
        self.options.look_ahead as i32
    }

    /// True while no move has been made below the root.
    pub fn at_root(&self) -> bool {
        self.ply == 0
    }

    /// Reset the counters before a new search.
    pub fn begin(&mut self) {
        self.stats = SearchStats::default();
        self.ply = 0;
        self.num_top_level_moves = 0;
        self.top_level_searched = 0;
    }

    /// Check the make/undo balance once a search has returned.
    pub fn finish(&mut self) {
        if self.ply != 0 {
            violated(&SearchError::UnbalancedMoves(self.ply));
            self.ply = 0;
        }
        self.stats.percent_done = 100;
    }

    /// Candidate replies to `last`, or `None` if the node is evaluated statically.
    ///
    /// At the horizon or at a terminal node the search stops, unless
    /// quiescence is on and the position is in jeopardy. Then the urgent
    /// moves are returned, ordered for the side to move but not truncated.
    /// An empty urgent list leaves a quiet leaf.
    pub fn frontier<S: Searchable>(
        &mut self,
        pos: &mut S,
        last: &Move<S::Action>,
        depth: i32,
        parent_value: i32,
    ) -> Option<MoveList<S::Action>> {
        let player1_to_move = !last.player1;
        let done = last.is_winning() || pos.done(last, false);

        if depth <= 0 || done {
            let extend = self.options.quiescence
                && !done
                && depth > -(self.options.max_quiescent_depth as i32)
                && pos.in_jeopardy(last, parent_value, self.weights);
            if !extend {
                return None;
            }
            let mut urgent = pos.generate_urgent_moves(last, self.weights, true);
            if urgent.is_empty() {
                return None;
            }
            if player1_to_move {
                urgent.sort_descending();
            } else {
                urgent.sort_ascending();
            }
            trace!(depth, moves = urgent.len(), after = ?last.action, "quiescence extension");
            return Some(urgent);
        }

        let moves = pos.generate_moves(last, self.weights, true);
        if moves.is_empty() {
            violated(&SearchError::NoCandidateMoves(format!("{:?}", last.action)));
            return None;
        }
        let moves = self.finder.get_best_moves(player1_to_move, moves, true);
        if depth == self.look_ahead() {
            self.num_top_level_moves = moves.len();
            self.top_level_searched = 0;
        }
        Some(moves)
    }

    /// Report an inverted window. Returns false if the node must not be searched.
    pub fn check_window(&self, window: SearchWindow) -> bool {
        if window.is_ordered() {
            return true;
        }
        violated(&SearchError::InvertedWindow {
            alpha: window.alpha,
            beta: window.beta,
        });
        false
    }

    pub fn make<S: Searchable>(&mut self, pos: &mut S, mv: &Move<S::Action>) {
        self.stats.moves_considered += 1;
        self.ply += 1;
        pos.make_move(mv);
    }

    pub fn undo<S: Searchable>(&mut self, pos: &mut S, mv: &Move<S::Action>) {
        pos.undo_move(mv);
        self.ply -= 1;
        if self.ply < 0 {
            violated(&SearchError::UnbalancedMoves(self.ply));
            self.ply = 0;
        }
    }

    /// Advance the progress counter after a top-level move has been searched.
    pub fn searched(&mut self, depth: i32) {
        if depth != self.look_ahead() || self.num_top_level_moves == 0 {
            return;
        }
        self.top_level_searched += 1;
        let percent = 100 * self.top_level_searched / self.num_top_level_moves;
        self.stats.percent_done = percent.min(100) as u32;
    }

    /// Whether alpha-beta cut-offs are applied.
    pub fn pruning(&self) -> bool {
        self.options.alpha_beta
    }
}

/// Take the move at `index` out of `moves` and mark it as the chosen one.
pub(crate) fn take_selected<A>(moves: MoveList<A>, index: usize) -> Option<Move<A>> {
    let mut moves = moves.into_vec();
    if index >= moves.len() {
        return None;
    }
    let mut chosen = moves.swap_remove(index);
    chosen.selected = true;
    Some(chosen)
}

/// Pick the better of a running best and a new candidate value.
///
/// Only strict improvements replace the running best, so the first of
/// several equal moves wins.
pub(crate) fn improves(best: Option<(usize, i32)>, value: i32, maximize: bool) -> bool {
    match best {
        None => true,
        Some((_, best)) if maximize => value > best,
        Some((_, best)) => value < best,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counts made moves and nothing else.
    #[derive(Debug, Clone, Default)]
    struct Counter {
        made: usize,
    }

    impl Searchable for Counter {
        type Action = u8;

        fn generate_moves(&self, _last: &Move<u8>, _weights: &Weights, _p1: bool) -> MoveList<u8> {
            MoveList::from(vec![Move::new(1, true, 0)])
        }

        fn generate_urgent_moves(&self, _last: &Move<u8>, _weights: &Weights, _p1: bool) -> MoveList<u8> {
            MoveList::new()
        }

        fn worth(&self, last: &Move<u8>, _weights: &Weights) -> i32 {
            last.value
        }

        fn done(&mut self, _last: &Move<u8>, _record_win: bool) -> bool {
            false
        }

        fn make_move(&mut self, _mv: &Move<u8>) {
            self.made += 1;
        }

        fn undo_move(&mut self, _mv: &Move<u8>) {
            self.made = self.made.saturating_sub(1);
        }

        fn num_moves(&self) -> usize {
            self.made
        }
    }

    #[test]
    fn test_ordered_windows_pass() {
        let weights = Weights::default();
        let core = BruteCore::new(SearchOptions::default(), &weights).unwrap();
        assert!(core.check_window(SearchWindow::full()));
        assert!(core.check_window(SearchWindow::new(4, 4)));
    }

    #[test]
    #[should_panic(expected = "search window inverted: alpha 5 > beta 1")]
    fn test_inverted_window_is_fatal() {
        let weights = Weights::default();
        let core = BruteCore::new(SearchOptions::default(), &weights).unwrap();
        core.check_window(SearchWindow::new(5, 1));
    }

    #[test]
    #[should_panic(expected = "unbalanced make/undo: 1 moves outstanding")]
    fn test_missing_undo_is_fatal() {
        let weights = Weights::default();
        let mut core = BruteCore::new(SearchOptions::default(), &weights).unwrap();
        let mut position = Counter::default();
        let first = Move::new(1, true, 0);

        core.begin();
        core.make(&mut position, &first);
        core.finish();
    }

    #[test]
    #[should_panic(expected = "unbalanced make/undo: -1 moves outstanding")]
    fn test_extra_undo_is_fatal() {
        let weights = Weights::default();
        let mut core = BruteCore::new(SearchOptions::default(), &weights).unwrap();
        let mut position = Counter::default();
        let first = Move::new(1, true, 0);

        core.begin();
        core.make(&mut position, &first);
        core.undo(&mut position, &first);
        core.undo(&mut position, &first);
    }

    #[test]
    fn test_balanced_moves_finish_cleanly() {
        let weights = Weights::default();
        let mut core = BruteCore::new(SearchOptions::default(), &weights).unwrap();
        let mut position = Counter::default();
        let first = Move::new(1, true, 0);

        core.begin();
        core.make(&mut position, &first);
        assert!(!core.at_root());
        core.undo(&mut position, &first);
        core.finish();
        assert!(core.at_root());
        assert_eq!(core.stats.moves_considered, 1);
        assert_eq!(core.stats.percent_done, 100);
    }

    #[test]
    fn test_improves_is_strict() {
        assert!(improves(None, -5, true));
        assert!(improves(Some((0, 3)), 4, true));
        assert!(!improves(Some((0, 3)), 3, true));
        assert!(improves(Some((0, 3)), 2, false));
        assert!(!improves(Some((0, 3)), 3, false));
    }

    #[test]
    fn test_take_selected_marks_move() {
        let moves: MoveList<u8> = (0..3).map(|i| Move::new(i, true, i as i32)).collect();
        let chosen = take_selected(moves, 1).unwrap();
        assert_eq!(chosen.action, 1);
        assert!(chosen.selected);
    }
}
