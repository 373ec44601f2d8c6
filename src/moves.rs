//! Candidate moves and ordered move lists.
//!
//! A [`Move`] is one ply transition produced by a [`Searchable`] position.
//! Values are always signed from player one's point of view: positive
//! favours player one, negative favours player two.
//!
//! [`Searchable`]: crate::searchable::Searchable

use crate::constants::WINNING_VALUE;

/// One ply transition together with its static and backed-up scores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Move<A> {
    /// Game specific payload (board coordinate, tree path, ...).
    pub action: A,
    /// True if player one makes this move.
    pub player1: bool,
    /// Static value of the position after the move.
    pub value: i32,
    /// Value backed up from the descendants searched below this move.
    pub inherited_value: i32,
    /// Set when the move causes a decisive swing in the score.
    pub urgent: bool,
    /// Display hint for the move returned by a search.
    pub selected: bool,
}

impl<A> Move<A> {
    /// Create a move. The inherited value starts out equal to the static value.
    pub fn new(action: A, player1: bool, value: i32) -> Self {
        Self {
            action,
            player1,
            value,
            inherited_value: value,
            urgent: false,
            selected: false,
        }
    }

    /// Builder style setter for the urgent flag.
    pub fn with_urgent(mut self, urgent: bool) -> Self {
        self.urgent = urgent;
        self
    }

    /// True if the static value marks a decided game.
    #[inline]
    pub fn is_winning(&self) -> bool {
        self.value.abs() >= WINNING_VALUE
    }
}

/// Ordered sequence of candidate moves.
///
/// The list is only sorted when a caller asks for it. Both sorts are stable,
/// so moves with equal values keep their generation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveList<A> {
    moves: Vec<Move<A>>,
}

impl<A> Default for MoveList<A> {
    fn default() -> Self {
        Self { moves: Vec::new() }
    }
}

impl<A> MoveList<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, mv: Move<A>) {
        self.moves.push(mv);
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Move<A>> {
        self.moves.get(index)
    }

    pub fn first(&self) -> Option<&Move<A>> {
        self.moves.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move<A>> {
        self.moves.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Move<A>> {
        self.moves.iter_mut()
    }

    /// Best value for player one first.
    pub fn sort_descending(&mut self) {
        self.moves.sort_by(|a, b| b.value.cmp(&a.value));
    }

    /// Best value for player two first.
    pub fn sort_ascending(&mut self) {
        self.moves.sort_by(|a, b| a.value.cmp(&b.value));
    }

    /// Keep at most `len` moves from the front of the list.
    pub fn truncate(&mut self, len: usize) {
        self.moves.truncate(len);
    }

    pub fn into_vec(self) -> Vec<Move<A>> {
        self.moves
    }

    /// Pick a random move among those close to the best one.
    ///
    /// Values are compared from the side to move. A move qualifies when its
    /// value is at least `best - |best| * percent_less_than_best / 100`, so a
    /// threshold of 0 keeps only the best moves. The generator is not
    /// consulted when a single move qualifies.
    pub fn random_move_for_thresh(
        &self,
        rng: &mut fastrand::Rng,
        percent_less_than_best: u32,
        player1_to_move: bool,
    ) -> Option<&Move<A>> {
        let perspective = |mv: &Move<A>| {
            if player1_to_move { mv.value } else { -mv.value }
        };
        let best = self.moves.iter().map(perspective).max()?;
        let slack = (i64::from(best).abs() * i64::from(percent_less_than_best)) / 100;
        let thresh = i64::from(best) - slack;

        let candidates: Vec<&Move<A>> = self
            .moves
            .iter()
            .filter(|mv| i64::from(perspective(*mv)) >= thresh)
            .collect();

        match candidates.len() {
            0 => None,
            1 => Some(candidates[0]),
            n => Some(candidates[rng.usize(0..n)]),
        }
    }
}

impl<A> FromIterator<Move<A>> for MoveList<A> {
    fn from_iter<I: IntoIterator<Item = Move<A>>>(iter: I) -> Self {
        Self {
            moves: iter.into_iter().collect(),
        }
    }
}

impl<A> From<Vec<Move<A>>> for MoveList<A> {
    fn from(moves: Vec<Move<A>>) -> Self {
        Self { moves }
    }
}

impl<A> IntoIterator for MoveList<A> {
    type Item = Move<A>;
    type IntoIter = std::vec::IntoIter<Move<A>>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.into_iter()
    }
}

impl<'a, A> IntoIterator for &'a MoveList<A> {
    type Item = &'a Move<A>;
    type IntoIter = std::slice::Iter<'a, Move<A>>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(values: &[i32]) -> MoveList<usize> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| Move::new(i, true, v))
            .collect()
    }

    fn actions(moves: &MoveList<usize>) -> Vec<usize> {
        moves.iter().map(|m| m.action).collect()
    }

    #[test]
    fn test_new_move_inherits_static_value() {
        let mv = Move::new("a", true, 17);
        assert_eq!(mv.inherited_value, 17);
        assert!(!mv.urgent);
        assert!(!mv.selected);
    }

    #[test]
    fn test_winning_value_is_inclusive() {
        assert!(Move::new((), true, WINNING_VALUE).is_winning());
        assert!(Move::new((), false, -WINNING_VALUE).is_winning());
        assert!(!Move::new((), true, WINNING_VALUE - 1).is_winning());
    }

    #[test]
    fn test_sorts_are_stable() {
        let mut moves = list(&[3, 5, 3, 1, 5]);
        moves.sort_descending();
        assert_eq!(actions(&moves), vec![1, 4, 0, 2, 3]);

        let mut moves = list(&[3, 5, 3, 1, 5]);
        moves.sort_ascending();
        assert_eq!(actions(&moves), vec![3, 0, 2, 1, 4]);
    }

    #[test]
    fn test_random_move_zero_thresh_takes_best() {
        let moves = list(&[4, -9, 12, 7]);
        let mut rng = fastrand::Rng::with_seed(7);

        let best = moves.random_move_for_thresh(&mut rng, 0, true).unwrap();
        assert_eq!(best.action, 2);

        let best = moves.random_move_for_thresh(&mut rng, 0, false).unwrap();
        assert_eq!(best.action, 1, "player two prefers the lowest value");
    }

    #[test]
    fn test_random_move_thresh_limits_candidates() {
        let moves = list(&[100, 95, 40, 91]);
        let mut rng = fastrand::Rng::with_seed(3);
        for _ in 0..50 {
            let mv = moves.random_move_for_thresh(&mut rng, 10, true).unwrap();
            assert!(mv.action != 2, "40 is more than 10% below 100");
        }
    }

    #[test]
    fn test_random_move_empty_list() {
        let moves: MoveList<usize> = MoveList::new();
        let mut rng = fastrand::Rng::with_seed(0);
        assert!(moves.random_move_for_thresh(&mut rng, 50, true).is_none());
    }
}
