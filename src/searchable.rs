//! The position contract consumed by every search strategy.
//!
//! A game implements [`Searchable`] for its board type. The engine drives
//! the position in place through [`Searchable::make_move`] and
//! [`Searchable::undo_move`] with strict LIFO discipline, and branches off
//! independent copies where it needs to (random playouts, worker threads).

use std::fmt::Debug;

use crate::moves::{Move, MoveList};
use crate::weights::Weights;

/// A game position that can be searched.
pub trait Searchable: Clone + Send {
    /// Game specific move payload.
    type Action: Clone + Debug + PartialEq + Send + Sync;

    /// All legal replies to `last`, valued from player one's point of view.
    fn generate_moves(
        &self,
        last: &Move<Self::Action>,
        weights: &Weights,
        player1_perspective: bool,
    ) -> MoveList<Self::Action>;

    /// The replies to `last` that cause a decisive swing in the score.
    ///
    /// Only consulted by quiescence search.
    fn generate_urgent_moves(
        &self,
        last: &Move<Self::Action>,
        weights: &Weights,
        player1_perspective: bool,
    ) -> MoveList<Self::Action>;

    /// Static evaluation of the current position. Positive favours player one.
    fn worth(&self, last: &Move<Self::Action>, weights: &Weights) -> i32;

    /// True if the game is over after `last`.
    ///
    /// `record_win` lets the game note the winner in its own state.
    fn done(&mut self, last: &Move<Self::Action>, record_win: bool) -> bool;

    /// True if the position after `last` is unstable.
    ///
    /// `parent_value` is the value of the move that led to the parent of
    /// `last`. The default compares the static worth against it using the
    /// jeopardy weight.
    fn in_jeopardy(&self, last: &Move<Self::Action>, parent_value: i32, weights: &Weights) -> bool {
        (self.worth(last, weights) - parent_value).abs() > weights.jeopardy_weight()
    }

    fn make_move(&mut self, mv: &Move<Self::Action>);

    /// Take back `mv`, which must be the most recent move made.
    fn undo_move(&mut self, mv: &Move<Self::Action>);

    /// An independent deep copy of the position.
    fn copy(&self) -> Self {
        self.clone()
    }

    /// Number of moves played since the start of the game.
    fn num_moves(&self) -> usize;

    /// Key identifying the current position for transposition lookups.
    ///
    /// Positions returning `None` are never cached.
    fn hash_key(&self) -> Option<u64> {
        None
    }
}
